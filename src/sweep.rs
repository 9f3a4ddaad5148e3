//! Periodic expired-session cleanup.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::session_store::SessionStore;

/// Spawns a task deleting expired sessions every `period`.
///
/// Store failures are logged and the loop keeps going. Abort the returned
/// handle to stop the task.
pub fn spawn_expired_sweep(store: Arc<dyn SessionStore>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            match store.sweep_expired().await {
                Ok(0) => tracing::trace!("no expired sessions to sweep"),
                Ok(removed) => tracing::info!(removed, "swept expired sessions"),
                Err(e) => tracing::warn!(error = %e, "expired session sweep failed"),
            }
        }
    })
}
