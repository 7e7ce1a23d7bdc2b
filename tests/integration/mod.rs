//! Integration test suite for cmscore
//!
//! End-to-end tests running the `cmscore` binary against module directories
//! and routes files written to temporary directories.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **common**: `TestSite` helper writing fixtures and running the binary
//! - **tasks**: `tasks` command text and JSON output
//! - **hierarchy**: `hierarchy` command output
//! - **validate**: `validate` command, including `--strict`
//! - **errors**: configuration and discovery failures

mod common;
mod errors;
mod hierarchy;
mod tasks;
mod validate;
