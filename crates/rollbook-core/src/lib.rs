//! # Rollbook Core
//!
//! Foundational types shared by every Rollbook crate:
//!
//! - [`errors`]: the HTTP-mappable [`AppError`]
//! - [`serde`]: lenient deserializers for query-string and form input
//!
//! # Example
//!
//! ```ignore
//! use rollbook_core::AppError;
//!
//! let error = AppError::not_found(anyhow::anyhow!("Wizard not found"));
//! ```

pub mod errors;
pub mod serde;

pub use errors::AppError;
