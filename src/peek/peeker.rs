//! Finding newer image tags for local containers

use futures::future::try_join_all;
use tracing::{debug, error, warn};

use crate::image::reference::ImageReference;
use crate::image::registry::TagRegistry;
use crate::image::runtime::{ContainerRuntime, ContainerSummary};
use crate::peek::error::PeekError;
use crate::version::filter::TagFilter;
use crate::version::generic::Version;
use crate::version::set::VersionSet;

/// Knobs for choosing upgrade candidates
#[derive(Debug, Clone, Default)]
pub struct PeekOptions {
    /// Only tags matching this filter are considered
    pub tag_filter: TagFilter,
    /// Skip remote tags that fail to parse instead of aborting the lookup
    pub skip_invalid_tags: bool,
}

/// A remote tag and the digest of its manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTag {
    pub name: String,
    pub digest: String,
}

/// Outcome of checking one container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeekReport {
    pub container_id: String,
    /// Image name the container was created from
    pub container_image: String,
    /// Upgrade candidate chosen from the registry
    pub latest: ImageTag,
    /// True if the local image already has the candidate's digest
    pub up_to_date: bool,
}

impl PeekReport {
    /// Line printed for containers with a newer image available
    pub fn message(&self) -> String {
        format!(
            "Container {} newer tag \"{}:{}\"",
            self.container_image, self.latest.name, self.latest.digest
        )
    }
}

/// Returns true if any `repository@digest` entry carries `digest`
pub fn equal_digest(digest: &str, repo_digests: &[String]) -> bool {
    repo_digests
        .iter()
        .filter_map(|repo_digest| repo_digest.split_once('@'))
        .any(|(_, d)| d == digest)
}

/// Checks local containers against their registries
pub struct ImagePeeker<R, C> {
    registry: R,
    runtime: C,
    options: PeekOptions,
}

impl<R: TagRegistry, C: ContainerRuntime> ImagePeeker<R, C> {
    pub fn new(registry: R, runtime: C, options: PeekOptions) -> Self {
        Self {
            registry,
            runtime,
            options,
        }
    }

    /// Choose the tag a container running `local` should move to.
    ///
    /// A container on `latest` stays on `latest`. Otherwise the remote tags
    /// that pass the filter are sorted by their digit runs and the first one
    /// newer than the local tag wins; if none is newer, the greatest tag is
    /// returned and the caller must tell it apart from the local tag.
    pub async fn latest_tag_name(&self, local: &ImageReference) -> Result<String, PeekError> {
        if local.is_default_tag() {
            return Ok(local.tag().to_string());
        }

        let local_version = Version::parse(local.tag())?;

        let tags = self.registry.list_tags(local).await.inspect_err(|e| {
            error!("Failed to list tags of {}: {}", local.repository(), e);
        })?;

        let mut versions = VersionSet::new();
        for tag in tags {
            if !self.options.tag_filter.matches(&tag) {
                debug!("Tag {} does not match filter", tag);
                continue;
            }

            match Version::parse(&tag) {
                Ok(version) => versions.push(version),
                Err(e) if self.options.skip_invalid_tags => {
                    warn!("Skipping tag {}: {}", tag, e);
                }
                Err(e) => {
                    error!("Failed to parse tag {}: {}", tag, e);
                    return Err(e.into());
                }
            }
        }

        if versions.is_empty() {
            return Err(PeekError::NoAvailableVersions(local.to_string()));
        }

        versions.sort();
        let found = versions.upper_bound(&local_version)?;
        Ok(found.raw().to_string())
    }

    /// Choose the upgrade tag for `local` and resolve its digest
    pub async fn latest_image_tag(&self, local: &ImageReference) -> Result<ImageTag, PeekError> {
        let name = self.latest_tag_name(local).await?;

        let digest = self
            .registry
            .manifest_digest(&local.with_tag(&name))
            .await
            .inspect_err(|e| error!("Failed to get digest of {}:{}: {}", local.repository(), name, e))?;

        Ok(ImageTag { name, digest })
    }

    async fn peek_container(&self, container: ContainerSummary) -> Result<PeekReport, PeekError> {
        debug!("image={} id={}", container.image, container.image_id);

        let reference = ImageReference::parse(&container.image)
            .inspect_err(|e| error!("Invalid image reference {}: {}", container.image, e))?;

        let latest = self.latest_image_tag(&reference).await?;
        let repo_digests = self.runtime.image_repo_digests(&container.image_id).await?;
        let up_to_date = equal_digest(&latest.digest, &repo_digests);

        if up_to_date {
            debug!("Container {} is using the latest image", container.image);
        }

        Ok(PeekReport {
            container_id: container.id,
            container_image: container.image,
            latest,
            up_to_date,
        })
    }

    /// Check every local container.
    ///
    /// Containers are checked concurrently; the first failure aborts the run.
    /// Reports keep the runtime's container order.
    pub async fn peek(&self) -> Result<Vec<PeekReport>, PeekError> {
        let containers = self
            .runtime
            .list_containers()
            .await
            .inspect_err(|e| error!("Failed to list containers: {}", e))?;

        try_join_all(
            containers
                .into_iter()
                .map(|container| self.peek_container(container)),
        )
        .await
    }
}
