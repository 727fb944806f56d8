//! # Rollbook Models
//!
//! Domain models and DTOs shared across the Rollbook crates.
//!
//! # Modules
//!
//! - [`ids`]: UUID newtypes for students, classes and wizards
//! - [`terms`]: terms, term dates and academic-session calendars
//! - [`frequency`]: date-range frequency presets
//! - [`attendance`]: attendance statuses, records and roster rows

pub mod attendance;
pub mod frequency;
pub mod ids;
pub mod terms;

pub use attendance::{
    AttendancePatch, AttendanceRecord, AttendanceStatus, AttendanceSummary, RosterEntry,
    StudentAttendance,
};
pub use frequency::{Frequency, ParseFrequencyError};
pub use ids::{ClassId, StudentId, WizardId};
pub use terms::{
    AcademicSessionTerms, ParseTermError, SessionTerms, Term, TermDateRange, TermDates,
    TermOrderError,
};
