//! Comparing local containers with their registries
//!
//! [`ImagePeeker`] lists containers through a [`ContainerRuntime`], picks an
//! upgrade tag for each from a [`TagRegistry`] using the generic version
//! ordering, and compares the tag's digest with the digests of the local image.
//!
//! [`ContainerRuntime`]: crate::image::ContainerRuntime
//! [`TagRegistry`]: crate::image::TagRegistry

pub mod error;
pub mod peeker;

pub use error::PeekError;
pub use peeker::{ImagePeeker, ImageTag, PeekOptions, PeekReport, equal_digest};
