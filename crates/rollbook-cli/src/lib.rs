//! Offline helpers behind the `rollbook-cli` binary.
//!
//! - [`calendar_file`]: load a term calendar from the school API's JSON shape
//! - [`roster`]: fake class rosters for demos and local testing

pub mod calendar_file;
pub mod roster;
