//! Unit test suite for cmscore
//!
//! Exercises the library through its public API, with definitions read from
//! module directories on disk where that matters.
//!
//! # Running Unit Tests
//!
//! ```bash
//! cargo test --test unit
//! ```
//!
//! # Test Organization
//!
//! - **local_tasks**: Rendering tabs from YAML modules with permission checks
//! - **discovery**: YAML and derivative discovery feeding the manager
//! - **validation**: Definition validation across modules
//! - **entity_forms**: Entity form controller over blocks and custom blocks
//! - **fields**: Option widgets and taxonomy formatters together

mod discovery;
mod entity_forms;
mod fields;
mod local_tasks;
mod validation;
