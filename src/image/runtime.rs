//! Container runtime trait for inspecting local containers and images

#[cfg(test)]
use mockall::automock;

use crate::image::error::RuntimeError;

/// A container known to the local runtime, running or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSummary {
    pub id: String,
    /// Image name the container was created from (e.g., "nginx:1.25")
    pub image: String,
    /// Local ID of the image (e.g., "sha256:...")
    pub image_id: String,
}

/// Trait for querying the local container runtime
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Lists all containers, including stopped ones
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>, RuntimeError>;

    /// Returns the `repository@digest` entries recorded for a local image
    async fn image_repo_digests(&self, image_id: &str) -> Result<Vec<String>, RuntimeError>;
}
