//! Distribution of per-object artifacts

pub mod upsert;

pub use upsert::{RemoteFileUpserter, UpsertAction, UpsertOutcome};
