//! Version ordering for loosely formatted image tags
//!
//! Registry tags rarely follow semver, so versions here are nothing more than
//! the digit runs of a tag compared element-wise.
//!
//! # Flow
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  TagFilter  │────▶│   Version   │────▶│ VersionSet  │────▶│ upper_bound │
//! │   (regex)   │     │   (parse)   │     │   (sort)    │     │ (candidate) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`generic`]: `Version` parsing and ordering
//! - [`set`]: `VersionSet` sorting and upper-bound lookup
//! - [`filter`]: Regular expression filter for registry tags
//! - [`error`]: Error types for parsing, lookup and filtering

pub mod error;
pub mod filter;
pub mod generic;
pub mod set;

pub use error::{FilterError, VersionError, VersionSetError};
pub use filter::TagFilter;
pub use generic::Version;
pub use set::VersionSet;
