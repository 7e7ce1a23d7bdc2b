//! Error handling for cmscore
//!
//! This module provides the error types and user-friendly error reporting used
//! throughout the crate. The error system follows two principles:
//! 1. **Strongly-typed errors** for precise handling in library code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`CmsError`] - Enumerated error types for every failure case
//! - [`ErrorContext`] - Wrapper that adds suggestions and details for display
//!
//! # Error Categories
//!
//! - **Plugin definitions**: [`CmsError::InvalidDefinition`], [`CmsError::UnknownPlugin`],
//!   [`CmsError::UnknownDeriver`], [`CmsError::DiscoveryFailed`]
//! - **Routing**: [`CmsError::RouteNotFound`]
//! - **Configuration**: [`CmsError::ConfigError`], [`CmsError::TomlError`]
//! - **Cache**: [`CmsError::CacheDecodeError`]
//! - **Forms**: [`CmsError::InvalidFormState`]
//!
//! Access denial and unresolvable routes during tab rendering are *not* errors:
//! they are plain data (a `false` access result, a missing map entry).
//!
//! # Examples
//!
//! ```rust,no_run
//! use cmscore::core::{CmsError, user_friendly_error};
//!
//! let error = CmsError::InvalidDefinition {
//!     plugin_id: "node.view".to_string(),
//!     reason: "definition must include \"route_name\"".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for cmscore operations
///
/// # Error Categories
///
/// ## Plugin definitions
/// - [`InvalidDefinition`] - A local task definition failed validation
/// - [`UnknownPlugin`] - An instance was requested for an undefined plugin id
/// - [`UnknownDeriver`] - A definition names a deriver that is not registered
/// - [`DiscoveryFailed`] - A definition file could not be read or parsed
///
/// ## Collaborators
/// - [`RouteNotFound`] - A single-route lookup missed
/// - [`CacheDecodeError`] - A cached entry could not be decoded
///
/// [`InvalidDefinition`]: CmsError::InvalidDefinition
/// [`UnknownPlugin`]: CmsError::UnknownPlugin
/// [`UnknownDeriver`]: CmsError::UnknownDeriver
/// [`DiscoveryFailed`]: CmsError::DiscoveryFailed
/// [`RouteNotFound`]: CmsError::RouteNotFound
/// [`CacheDecodeError`]: CmsError::CacheDecodeError
#[derive(Error, Debug)]
pub enum CmsError {
    /// A plugin definition is broken and must never enter the registry
    ///
    /// Raised while processing discovered definitions, for example when a
    /// local task has no `route_name`. Only the offending definition is
    /// rejected; loading of the remaining definitions continues.
    #[error("Plugin ({plugin_id}) {reason}")]
    InvalidDefinition {
        /// The plugin id of the rejected definition
        plugin_id: String,
        /// Why the definition was rejected
        reason: String,
    },

    /// No definition exists for the requested plugin id
    #[error("Plugin '{plugin_id}' does not exist")]
    UnknownPlugin {
        /// The plugin id that was requested
        plugin_id: String,
    },

    /// A definition names a deriver that was never registered
    #[error("Plugin ({plugin_id}) uses unknown deriver '{deriver}'")]
    UnknownDeriver {
        /// The base plugin id
        plugin_id: String,
        /// The deriver name from the definition
        deriver: String,
    },

    /// A definition source could not be read or parsed
    #[error("Failed to discover definitions in {path}: {reason}")]
    DiscoveryFailed {
        /// Path of the definition file or directory
        path: String,
        /// Reason for the failure
        reason: String,
    },

    /// A route name could not be resolved by the route provider
    #[error("Route \"{name}\" does not exist")]
    RouteNotFound {
        /// The route name that was looked up
        name: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// A cache entry exists but does not decode into the expected shape
    #[error("Cache entry '{cid}' could not be decoded: {reason}")]
    CacheDecodeError {
        /// Cache id of the entry
        cid: String,
        /// Decoder message
        reason: String,
    },

    /// The form state is missing something the form controller needs
    #[error("Invalid form state: {reason}")]
    InvalidFormState {
        /// What is wrong with the form state
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Generic error for cases not covered by specific variants
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl Clone for CmsError {
    fn clone(&self) -> Self {
        match self {
            Self::InvalidDefinition {
                plugin_id,
                reason,
            } => Self::InvalidDefinition {
                plugin_id: plugin_id.clone(),
                reason: reason.clone(),
            },
            Self::UnknownPlugin {
                plugin_id,
            } => Self::UnknownPlugin {
                plugin_id: plugin_id.clone(),
            },
            Self::UnknownDeriver {
                plugin_id,
                deriver,
            } => Self::UnknownDeriver {
                plugin_id: plugin_id.clone(),
                deriver: deriver.clone(),
            },
            Self::DiscoveryFailed {
                path,
                reason,
            } => Self::DiscoveryFailed {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::RouteNotFound {
                name,
            } => Self::RouteNotFound {
                name: name.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::CacheDecodeError {
                cid,
                reason,
            } => Self::CacheDecodeError {
                cid: cid.clone(),
                reason: reason.clone(),
            },
            Self::InvalidFormState {
                reason,
            } => Self::InvalidFormState {
                reason: reason.clone(),
            },
            // For errors that don't implement Clone, convert to Other
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::YamlError(e) => Self::Other {
                message: format!("YAML error: {e}"),
            },
            Self::JsonError(e) => Self::Other {
                message: format!("JSON error: {e}"),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// When displayed, errors show:
/// 1. **Error**: The main error message in red
/// 2. **Details**: Additional context in yellow (optional)
/// 3. **Suggestion**: Actionable steps in green (optional)
///
/// ```rust,no_run
/// use cmscore::core::{CmsError, ErrorContext};
///
/// let context = ErrorContext::new(CmsError::RouteNotFound { name: "node.edit".into() })
///     .with_suggestion("Check the routes file")
///     .with_details("Routes are loaded from the configured routes file");
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: CmsError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: CmsError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`CmsError`] variants (including ones wrapped in an existing
/// [`ErrorContext`]), [`std::io::Error`], and falls back to the plain message
/// for anything else.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(ctx) = error.downcast_ref::<ErrorContext>() {
        return ErrorContext {
            error: ctx.error.clone(),
            suggestion: ctx.suggestion.clone(),
            details: ctx.details.clone(),
        };
    }

    if let Some(cms_error) = error.downcast_ref::<CmsError>() {
        return create_error_context(cms_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        // Keep any context naming the file, e.g. "Failed to read routes file: ..."
        let message = format!("{error:#}");
        return match io_error.kind() {
            std::io::ErrorKind::NotFound => ErrorContext::new(CmsError::Other {
                message,
            })
            .with_suggestion("Check that the file or directory exists and the path is correct"),
            std::io::ErrorKind::PermissionDenied => ErrorContext::new(CmsError::Other {
                message,
            })
            .with_suggestion("Check file ownership and permissions"),
            _ => ErrorContext::new(CmsError::Other {
                message,
            }),
        };
    }

    // Preserve the full anyhow chain so file context is not lost
    ErrorContext::new(CmsError::Other {
        message: format!("{error:#}"),
    })
}

fn create_error_context(error: CmsError) -> ErrorContext {
    let (suggestion, details): (Option<String>, Option<&str>) = match &error {
        CmsError::InvalidDefinition {
            ..
        } => (
            Some("Every local task needs a non-empty 'route_name'".to_string()),
            Some("Invalid definitions are skipped; the remaining definitions still load"),
        ),
        CmsError::UnknownDeriver {
            deriver,
            ..
        } => (Some(format!("Register a deriver named '{deriver}' before loading definitions")), None),
        CmsError::RouteNotFound {
            ..
        } => (Some("Check the route name against the routes file (--routes)".to_string()), None),
        CmsError::DiscoveryFailed {
            ..
        } => (
            Some("Definition files must be YAML maps of plugin id to definition".to_string()),
            Some("Files are discovered as <module>.local_tasks.yml under each module directory"),
        ),
        CmsError::ConfigError {
            ..
        }
        | CmsError::TomlError(_) => (
            Some("Check the configuration file syntax (--config or CMSCORE_CONFIG)".to_string()),
            None,
        ),
        _ => (None, None),
    };

    let details = details.map(str::to_string);
    let mut ctx = ErrorContext::new(error);
    ctx.suggestion = suggestion;
    ctx.details = details;
    ctx
}
