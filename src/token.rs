//! Opaque session token generation.

use rand::Rng;

/// Length in characters of a generated token.
pub const TOKEN_LEN: usize = 64;

/// Generate a new session token: 32 CSPRNG bytes, hex encoded.
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; TOKEN_LEN / 2];
    rand::thread_rng().fill(&mut bytes);
    hex::encode(bytes)
}
