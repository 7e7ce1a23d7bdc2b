//! Test utilities for cmscore
//!
//! Helpers shared by the unit tests inside the crate and the `tests/`
//! targets (enabled there through the `test-utils` feature):
//! - Logging initialisation for tests
//! - Definition and route fixtures, on disk or in memory
//! - Collaborator doubles: a call-counting route provider and a
//!   list-driven access checker
//!
//! # Example
//!
//! ```rust,no_run
//! use cmscore::test_utils::{StaticAccess, definitions};
//!
//! let access = StaticAccess::allow_all().deny("node.delete");
//! let set = definitions::scenario_root_and_child();
//! assert_eq!(set.len(), 2);
//! ```

pub mod doubles;
pub mod fixtures;

pub use doubles::{CountingRouteProvider, StaticAccess};
pub use fixtures::{ModuleFixture, ROUTES_YAML, definitions};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. With `level` set, that level is used;
/// otherwise logging is enabled only when `RUST_LOG` is set.
///
/// ```rust,no_run
/// cmscore::test_utils::init_test_logging(Some(tracing::Level::DEBUG));
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
