//! Domain models and types for Kiosk Export.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`ObjectId`], [`FileId`])
//! - **Error types** ([`KioskError`], [`EmbarkError`], [`DriveError`])
//! - **Record format** ([`RecordFormat`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! ```rust
//! use kiosk_export::domain::{FileId, ObjectId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let object_id = ObjectId::new("1976.057.001")?;
//! let file_id = FileId::new("1F5cgW7ORRGHcpy2fbYiFE528RuDjHnrJ")?;
//!
//! // This won't compile - type safety prevents mixing IDs
//! // let wrong: ObjectId = file_id;
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod format;
pub mod ids;
pub mod result;

pub use errors::{DriveError, EmbarkError, KioskError};
pub use format::RecordFormat;
pub use ids::{FileId, ObjectId};
pub use result::Result;
