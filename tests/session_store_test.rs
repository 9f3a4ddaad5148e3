//! Integration tests for the Sea-ORM session store.

mod common;

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use dreamswide_auth::entity::session;
use dreamswide_auth::{
    spawn_expired_sweep, AuthError, AuthResult, SeaOrmSessionStore, SessionMetadata,
    SessionStore,
};
use sea_orm::{DbErr, EntityTrait, PaginatorTrait};

async fn store_with_owner() -> (common::TestApp, SeaOrmSessionStore, i32) {
    let app = common::setup().await;
    let owner = app
        .auth
        .principals()
        .find_by_email(common::ADMIN_EMAIL)
        .await
        .unwrap()
        .unwrap();
    let store = SeaOrmSessionStore::new(app.db.clone());
    (app, store, owner.id)
}

#[tokio::test]
async fn create_persists_row_with_ttl_and_metadata() {
    let (_app, store, owner_id) = store_with_owner().await;
    let before = Utc::now();

    let token = store
        .create(
            owner_id,
            Duration::hours(8),
            SessionMetadata {
                user_agent: Some("Mozilla/5.0".into()),
                ip_address: Some("196.188.1.7".into()),
            },
        )
        .await
        .unwrap();

    let row = store.lookup(&token).await.unwrap().expect("session stored");
    assert_eq!(row.owner_id, owner_id);
    assert_eq!(row.expires_at - row.created_at, Duration::hours(8));
    assert!(row.created_at >= before - Duration::seconds(1));
    assert_eq!(row.user_agent.as_deref(), Some("Mozilla/5.0"));
    assert_eq!(row.ip_address.as_deref(), Some("196.188.1.7"));
}

#[tokio::test]
async fn tokens_are_unique_per_session() {
    let (app, store, owner_id) = store_with_owner().await;

    let mut tokens = HashSet::new();
    for _ in 0..20 {
        let token = store
            .create(owner_id, Duration::hours(8), SessionMetadata::default())
            .await
            .unwrap();
        assert!(tokens.insert(token));
    }

    let rows = session::Entity::find().count(&app.db).await.unwrap();
    assert_eq!(rows, 20);
}

#[tokio::test]
async fn lookup_of_unknown_token_is_none() {
    let (_app, store, _) = store_with_owner().await;
    assert!(store.lookup("no-such-token").await.unwrap().is_none());
}

#[tokio::test]
async fn invalidate_is_idempotent() {
    let (_app, store, owner_id) = store_with_owner().await;
    let token = store
        .create(owner_id, Duration::hours(8), SessionMetadata::default())
        .await
        .unwrap();

    store.invalidate(&token).await.unwrap();
    assert!(store.lookup(&token).await.unwrap().is_none());

    store.invalidate(&token).await.unwrap();
    store.invalidate("never-issued").await.unwrap();
}

#[tokio::test]
async fn lookup_returns_expired_rows_unchanged() {
    let (_app, store, owner_id) = store_with_owner().await;
    let token = store
        .create(owner_id, Duration::hours(-1), SessionMetadata::default())
        .await
        .unwrap();

    let row = store.lookup(&token).await.unwrap().expect("expired row still stored");
    assert!(row.is_expired_at(Utc::now()));
}

#[tokio::test]
async fn sweep_removes_exactly_the_expired_sessions() {
    let (_app, store, owner_id) = store_with_owner().await;

    let mut expired = Vec::new();
    for hours in [-1, -5, -48] {
        expired.push(
            store
                .create(owner_id, Duration::hours(hours), SessionMetadata::default())
                .await
                .unwrap(),
        );
    }
    let live = store
        .create(owner_id, Duration::hours(8), SessionMetadata::default())
        .await
        .unwrap();

    assert_eq!(store.sweep_expired().await.unwrap(), 3);

    for token in &expired {
        assert!(store.lookup(token).await.unwrap().is_none());
    }
    assert!(store.lookup(&live).await.unwrap().is_some());

    assert_eq!(store.sweep_expired().await.unwrap(), 0);
}

#[tokio::test]
async fn background_sweep_removes_expired_sessions() {
    let (_app, store, owner_id) = store_with_owner().await;
    let expired = store
        .create(owner_id, Duration::hours(-1), SessionMetadata::default())
        .await
        .unwrap();
    let live = store
        .create(owner_id, Duration::hours(8), SessionMetadata::default())
        .await
        .unwrap();

    let handle = spawn_expired_sweep(
        Arc::new(store.clone()),
        std::time::Duration::from_millis(50),
    );

    let mut swept = false;
    for _ in 0..40 {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        if store.lookup(&expired).await.unwrap().is_none() {
            swept = true;
            break;
        }
    }
    handle.abort();

    assert!(swept, "expired session was not swept");
    assert!(store.lookup(&live).await.unwrap().is_some());
}

/// Store whose sweep always fails, counting attempts.
#[derive(Debug, Default)]
struct FailingSweepStore {
    sweeps: AtomicUsize,
}

#[async_trait]
impl SessionStore for FailingSweepStore {
    async fn create(
        &self,
        _owner_id: i32,
        _ttl: Duration,
        _metadata: SessionMetadata,
    ) -> AuthResult<String> {
        unreachable!("sweeper never creates sessions")
    }

    async fn lookup(&self, _token: &str) -> AuthResult<Option<session::Model>> {
        Ok(None)
    }

    async fn invalidate(&self, _token: &str) -> AuthResult<()> {
        Ok(())
    }

    async fn sweep_expired(&self) -> AuthResult<u64> {
        self.sweeps.fetch_add(1, Ordering::SeqCst);
        Err(AuthError::Database(DbErr::Custom("database is locked".into())))
    }
}

#[tokio::test]
async fn background_sweep_keeps_running_after_store_errors() {
    let store = Arc::new(FailingSweepStore::default());
    let handle = spawn_expired_sweep(store.clone(), std::time::Duration::from_millis(20));

    let mut attempts = 0;
    for _ in 0..50 {
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        attempts = store.sweeps.load(Ordering::SeqCst);
        if attempts >= 3 {
            break;
        }
    }

    assert!(attempts >= 3, "sweeper stopped after {attempts} attempt(s)");
    assert!(!handle.is_finished());
    handle.abort();
}
