//! Core types shared by every cmscore module
//!
//! The core module currently carries the error system:
//! - [`CmsError`] - Enumerated error types covering all failure modes
//! - [`ErrorContext`] - User-friendly error wrapper with suggestions and details
//! - [`user_friendly_error`] - Convert any error to a user-friendly format
//!
//! # Error Handling Pattern
//!
//! ```rust
//! use cmscore::core::{CmsError, user_friendly_error};
//! use anyhow::Result;
//!
//! fn load() -> Result<()> {
//!     Err(CmsError::ConfigError { message: "missing module_dirs".into() }.into())
//! }
//!
//! if let Err(e) = load() {
//!     let friendly = user_friendly_error(e);
//!     assert!(friendly.suggestion.is_some());
//! }
//! ```

pub mod error;

pub use error::{CmsError, ErrorContext, user_friendly_error};
