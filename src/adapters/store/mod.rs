//! Distribution sink abstraction
//!
//! Trait-based seams for the remote document store, secondary object
//! storage and email, plus a factory wiring the enabled sinks from
//! configuration.

pub mod factory;
pub mod traits;

pub use factory::{create_document_store, create_mailer, create_object_storage};
pub use traits::{DocumentStore, EmailMessage, Mailer, NewFileRequest, ObjectStorage, RemoteFile};
