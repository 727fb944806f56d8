//! Upstream collaborators.
//!
//! The school's main API owns rosters, term calendars and persisted attendance.
//! The wizard only talks to it through these traits so hosts and tests can
//! swap in their own implementations.

pub mod client;

use async_trait::async_trait;
use rollbook_models::{AcademicSessionTerms, ClassId, RosterEntry};
use thiserror::Error;

use crate::modules::wizard::model::AttendanceSubmission;

pub use client::UpstreamClient;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("school API request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("school API responded {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("school API returned an invalid term calendar: {0}")]
    InvalidCalendar(String),
}

/// Read side: class rosters and the academic calendar.
#[async_trait]
pub trait RosterSource: Send + Sync {
    /// Students of `class_id`, in roster order.
    async fn fetch_roster(&self, class_id: ClassId) -> Result<Vec<RosterEntry>, UpstreamError>;

    /// Every academic session with its term boundaries.
    async fn fetch_sessions_and_terms(&self) -> Result<AcademicSessionTerms, UpstreamError>;
}

/// Write side: the single network effect of a finished wizard.
#[async_trait]
pub trait SubmissionAdapter: Send + Sync {
    async fn submit_attendance(&self, submission: &AttendanceSubmission)
    -> Result<(), UpstreamError>;
}
