//! Harvest orchestration
//!
//! - [`HarvestPipeline`] runs the METS and JSON passes end to end
//! - [`HarvestSummary`] accumulates counters, errors and the missing-field report
//! - [`Workspace`] owns the local working folder
//! - [`check_composite`] validates a local composite document offline

pub mod check;
pub mod coordinator;
pub mod summary;
pub mod workspace;

pub use check::{check_composite, CheckOutcome};
pub use coordinator::{HarvestPipeline, HarvestSinks};
pub use summary::{HarvestError, HarvestErrorType, HarvestSummary};
pub use workspace::Workspace;
