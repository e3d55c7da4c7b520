//! Google Drive integration
//!
//! Implements [`crate::adapters::store::DocumentStore`] against the Drive v3
//! REST API for shared drives.

pub mod auth;
pub mod client;
pub mod models;

pub use auth::TokenSource;
pub use client::DriveClient;
