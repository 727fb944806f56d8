//! Attendance wizard module.
//!
//! Drives the multi-step "create attendance" dialog: pick a class, session and
//! term, settle on a date range, mark students, then submit the whole session
//! to the school API.

pub mod controller;
pub mod machine;
pub mod model;
pub mod router;
pub mod service;

pub use machine::{PendingSubmission, SubmissionTicket, SubmitStatus, WizardController};
pub use service::{WizardRegistry, WizardService};
