//! Registry and runtime test utilities

use std::collections::HashMap;

use async_trait::async_trait;

use image_peek::image::error::{RegistryError, RuntimeError};
use image_peek::image::{ContainerRuntime, ContainerSummary, ImageReference, TagRegistry};

/// In-memory registry keyed by repository
#[derive(Default)]
pub struct FakeRegistry {
    tags: HashMap<String, Vec<String>>,
    digests: HashMap<String, String>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a repository with `(tag, digest)` pairs
    pub fn with_repository(mut self, repository: &str, tags: Vec<(&str, &str)>) -> Self {
        for (tag, digest) in &tags {
            self.digests
                .insert(format!("{}:{}", repository, tag), digest.to_string());
        }
        self.tags.insert(
            repository.to_string(),
            tags.into_iter().map(|(tag, _)| tag.to_string()).collect(),
        );
        self
    }
}

#[async_trait]
impl TagRegistry for FakeRegistry {
    async fn list_tags(&self, image: &ImageReference) -> Result<Vec<String>, RegistryError> {
        self.tags
            .get(image.repository())
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(image.repository().to_string()))
    }

    async fn manifest_digest(&self, image: &ImageReference) -> Result<String, RegistryError> {
        let key = format!("{}:{}", image.repository(), image.tag());
        match self.digests.get(&key) {
            Some(digest) => Ok(digest.clone()),
            None => Err(RegistryError::NotFound(key)),
        }
    }
}

/// In-memory container runtime
#[derive(Default)]
pub struct FakeRuntime {
    containers: Vec<ContainerSummary>,
    repo_digests: HashMap<String, Vec<String>>,
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a container whose image carries `repo_digests`
    pub fn with_container(mut self, image: &str, image_id: &str, repo_digests: Vec<&str>) -> Self {
        self.containers.push(ContainerSummary {
            id: format!("container-{}", self.containers.len()),
            image: image.to_string(),
            image_id: image_id.to_string(),
        });
        self.repo_digests.insert(
            image_id.to_string(),
            repo_digests.into_iter().map(str::to_string).collect(),
        );
        self
    }
}

#[async_trait]
impl ContainerRuntime for FakeRuntime {
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>, RuntimeError> {
        Ok(self.containers.clone())
    }

    async fn image_repo_digests(&self, image_id: &str) -> Result<Vec<String>, RuntimeError> {
        Ok(self.repo_digests.get(image_id).cloned().unwrap_or_default())
    }
}
