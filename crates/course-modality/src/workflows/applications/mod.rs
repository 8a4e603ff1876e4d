//! Course-modality application workflow.
//!
//! Applicants look up their course rows by name and flip the applied flag on a single row,
//! identified by its record id, with the PIN stored on that row. The admin PIN is a global
//! read/export override.

pub mod access;
pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use access::{AccessPolicy, AdminPin, Pin, StoredPinPolicy, PIN_LENGTH};
pub use router::application_router;
pub use service::{
    ApplicationWorkflow, ApplyRequest, LookupOutcome, RevokeRequest, TransitionOutcome,
    WorkflowError,
};
pub use views::{AdminRecordView, ApplicationView, CourseView};
