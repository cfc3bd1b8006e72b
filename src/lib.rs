//! Peek at newer image tags for local containers
//!
//! # Modules
//!
//! - [`version`]: Generic tag ordering and upgrade candidate selection
//! - [`image`]: Image references, registries and container runtimes
//! - [`peek`]: Checks containers against their registries
//! - [`config`]: Configuration file and defaults
//! - [`logging`]: Tracing subscriber setup

pub mod config;
pub mod image;
pub mod logging;
pub mod peek;
pub mod version;
