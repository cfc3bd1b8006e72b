//! Registry trait for looking up tags and digests of remote images

#[cfg(test)]
use mockall::automock;

use crate::image::error::RegistryError;
use crate::image::reference::ImageReference;

/// Trait for querying an image registry
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait TagRegistry: Send + Sync {
    /// Lists every tag of the reference's repository
    ///
    /// The tag of `image` itself is ignored. Order is whatever the registry
    /// returns.
    async fn list_tags(&self, image: &ImageReference) -> Result<Vec<String>, RegistryError>;

    /// Fetches the content digest of the manifest `image` points at
    ///
    /// # Returns
    /// * `Ok(String)` - Digest such as `sha256:0d17...`
    /// * `Err(RegistryError)` - If the manifest doesn't exist or the fetch fails
    async fn manifest_digest(&self, image: &ImageReference) -> Result<String, RegistryError>;
}
