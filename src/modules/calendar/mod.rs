//! Calendar module.
//!
//! Read-only views over the term calendar: the session list, the term in
//! progress, and ad-hoc range resolution for date pickers.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
