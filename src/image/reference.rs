//! Tagged image references
//!
//! Container runtimes report the image a container was created from as the
//! user typed it (`nginx:1.25`, `ghcr.io/org/app`, `localhost:5000/app:v2`).
//! [`ImageReference`] normalizes those names the way Docker does so they can
//! be looked up in a registry.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::image::error::ReferenceError;

/// Registry host used for names without an explicit registry
pub const DOCKER_HUB_REGISTRY: &str = "index.docker.io";

/// Host serving the Docker Hub registry API
const DOCKER_HUB_API: &str = "registry-1.docker.io";

/// Tag used when a reference doesn't name one
pub const DEFAULT_TAG: &str = "latest";

static PATH_COMPONENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]+(?:(?:[._]|__|-+)[a-z0-9]+)*$").expect("valid path component regex")
});

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}$").expect("valid tag regex"));

/// A fully qualified `registry/repository:tag` reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageReference {
    registry: String,
    repository: String,
    tag: String,
}

impl ImageReference {
    /// Parse an image name into a tagged reference.
    ///
    /// Examples:
    /// - "nginx" -> index.docker.io/library/nginx:latest
    /// - "bitnami/redis:7.2" -> index.docker.io/bitnami/redis:7.2
    /// - "ghcr.io/org/app:v1" -> ghcr.io/org/app:v1
    /// - "localhost:5000/app" -> localhost:5000/app:latest
    pub fn parse(name: &str) -> Result<Self, ReferenceError> {
        if name.is_empty() {
            return Err(ReferenceError::Empty);
        }
        if name.contains('@') {
            return Err(ReferenceError::DigestPinned(name.to_string()));
        }

        let (path, tag) = split_tag(name);
        let tag = tag.unwrap_or(DEFAULT_TAG);
        if !TAG.is_match(tag) {
            return Err(ReferenceError::InvalidTag(name.to_string()));
        }

        let (registry, repository) = match path.split_once('/') {
            Some((host, rest)) if is_registry_host(host) => (normalize_registry(host), rest),
            _ => (DOCKER_HUB_REGISTRY, path),
        };

        let repository = if registry == DOCKER_HUB_REGISTRY && !repository.contains('/') {
            format!("library/{}", repository)
        } else {
            repository.to_string()
        };

        if !repository
            .split('/')
            .all(|component| PATH_COMPONENT.is_match(component))
        {
            return Err(ReferenceError::InvalidRepository(name.to_string()));
        }

        Ok(Self {
            registry: registry.to_string(),
            repository,
            tag: tag.to_string(),
        })
    }

    pub fn registry(&self) -> &str {
        &self.registry
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns true if the reference uses the implicit `latest` tag
    pub fn is_default_tag(&self) -> bool {
        self.tag == DEFAULT_TAG
    }

    /// Same repository, different tag
    pub fn with_tag(&self, tag: &str) -> Self {
        Self {
            registry: self.registry.clone(),
            repository: self.repository.clone(),
            tag: tag.to_string(),
        }
    }

    /// Base URL of the registry's distribution API
    pub fn api_base(&self) -> String {
        let host = if self.registry == DOCKER_HUB_REGISTRY {
            DOCKER_HUB_API
        } else {
            self.registry.as_str()
        };
        let scheme = if is_loopback(host) { "http" } else { "https" };
        format!("{}://{}", scheme, host)
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.registry, self.repository, self.tag)
    }
}

impl FromStr for ImageReference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Split `name[:tag]`, ignoring colons that belong to a registry port.
fn split_tag(name: &str) -> (&str, Option<&str>) {
    let last_slash = name.rfind('/').map_or(0, |i| i + 1);
    match name[last_slash..].rfind(':') {
        Some(i) => {
            let colon = last_slash + i;
            (&name[..colon], Some(&name[colon + 1..]))
        }
        None => (name, None),
    }
}

fn is_registry_host(component: &str) -> bool {
    component.contains('.') || component.contains(':') || component == "localhost"
}

fn normalize_registry(host: &str) -> &str {
    match host {
        "docker.io" | "registry-1.docker.io" => DOCKER_HUB_REGISTRY,
        other => other,
    }
}

fn is_loopback(host: &str) -> bool {
    // IPv6 literals are bracketed: [::1]:5000
    let name = match host.strip_prefix('[') {
        Some(rest) => rest.split_once(']').map_or(rest, |(addr, _)| addr),
        None => host.split_once(':').map_or(host, |(name, _)| name),
    };
    matches!(name, "localhost" | "127.0.0.1" | "::1")
}
