//! Local containers and remote registries
//!
//! Everything that talks to the outside world lives here: parsing image names,
//! listing tags and digests in a registry, and asking the local runtime which
//! containers exist and which digests their images carry.
//!
//! # Modules
//!
//! - [`reference`]: Docker style image name parsing and normalization
//! - [`registry`]: `TagRegistry` trait for tag and digest lookups
//! - [`registries`]: OCI Distribution API implementation
//! - [`runtime`]: `ContainerRuntime` trait for local containers and images
//! - [`runtimes`]: Docker CLI implementation
//! - [`error`]: Error types for references, registries and runtimes

pub mod error;
pub mod reference;
pub mod registries;
pub mod registry;
pub mod runtime;
pub mod runtimes;

pub use error::{ReferenceError, RegistryError, RuntimeError};
pub use reference::ImageReference;
pub use registry::TagRegistry;
pub use runtime::{ContainerRuntime, ContainerSummary};
