use thiserror::Error;

use crate::image::error::{ReferenceError, RegistryError, RuntimeError};
use crate::version::error::{VersionError, VersionSetError};

#[derive(Debug, Error)]
pub enum PeekError {
    #[error("Invalid version: {0}")]
    Version(#[from] VersionError),

    #[error("Version lookup failed: {0}")]
    VersionSet(#[from] VersionSetError),

    #[error("Invalid image reference: {0}")]
    Reference(#[from] ReferenceError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Container runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("No available versions for {0}")]
    NoAvailableVersions(String),
}
