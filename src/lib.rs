//! # Rollbook API
//!
//! Attendance-session scheduling for a school management system, served over
//! axum.
//!
//! A teacher opens a "create attendance" wizard, picks a class, academic
//! session and term, settles on a date range (a preset such as `business-week`
//! or `term`, or a custom pick), marks each student and submits. Ranges are
//! always reduced to school days before they are shown or sent.
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── rollbook-core/      # AppError, serde helpers
//! ├── rollbook-config/    # environment-driven config
//! ├── rollbook-models/    # ids, terms, frequencies, attendance types
//! ├── rollbook-calendar/  # business days, term calendar, range presets
//! └── rollbook-cli/       # offline range resolution tool
//! src/
//! ├── modules/
//! │   ├── attendance/     # per-wizard record store
//! │   ├── calendar/       # read-only calendar endpoints
//! │   ├── upstream/       # school API traits and HTTP client
//! │   └── wizard/         # state machine, registry, endpoints
//! ├── logging.rs
//! ├── router.rs
//! └── state.rs
//! ```
//!
//! ## Environment Variables
//!
//! ```bash
//! APP_HOST=0.0.0.0
//! APP_PORT=3000
//! SCHOOL_API_URL=https://school.example/api
//! SCHOOL_API_TOKEN=secret
//! ATTENDANCE_REFERENCE_DATE=2025-09-15   # optional, pins "today"
//! ```
//!
//! API documentation is served at `/swagger-ui` and `/scalar`.

pub mod docs;
pub mod logging;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

pub use rollbook_calendar;
pub use rollbook_config;
pub use rollbook_core;
pub use rollbook_models;
