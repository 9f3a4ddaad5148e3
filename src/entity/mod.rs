//! Database entity models for dreamswide-auth.
//!
//! This module contains the Sea-ORM entity definitions backing the
//! authentication subsystem. These entities define the database schema
//! and provide the data structures necessary for interacting with the database.

/// Principal entity model: admins and users that can log in.
pub mod principal;

/// Session entity model: opaque tokens bound to a principal and an expiry.
pub mod session;
