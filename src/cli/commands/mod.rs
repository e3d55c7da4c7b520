//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod check;
pub mod harvest;
pub mod init;
pub mod validate;
