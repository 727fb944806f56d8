//! Attendance module.
//!
//! Holds the per-student attendance marks for the session a wizard is building.

pub mod store;

pub use store::{AttendanceError, AttendanceRecordStore};
