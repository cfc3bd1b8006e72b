//! OCI Distribution API registry implementation
//!
//! Works against Docker Hub, GHCR and any registry speaking the distribution
//! API. Public repositories usually still demand a bearer token; the client
//! negotiates an anonymous one when challenged and reuses it per repository.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, MutexGuard};

use regex::Regex;
use reqwest::header::{
    ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, LINK, RETRY_AFTER, WWW_AUTHENTICATE,
};
use reqwest::{Method, Response, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::image::error::RegistryError;
use crate::image::reference::ImageReference;
use crate::image::registry::TagRegistry;

/// Manifest media types we accept when resolving a digest, newest first
const MANIFEST_MEDIA_TYPES: &[&str] = &[
    "application/vnd.oci.image.index.v1+json",
    "application/vnd.oci.image.manifest.v1+json",
    "application/vnd.docker.distribution.manifest.list.v2+json",
    "application/vnd.docker.distribution.manifest.v2+json",
];

const CONTENT_DIGEST_HEADER: &str = "docker-content-digest";

static CHALLENGE_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\w+)="([^"]*)""#).expect("valid challenge regex"));

static NEXT_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<([^>]+)>\s*;\s*rel="?next"?"#).expect("valid link regex"));

/// Response from `/v2/<name>/tags/list`
#[derive(Debug, Deserialize)]
struct TagList {
    // Some registries send `null` for repositories without tags
    tags: Option<Vec<String>>,
}

/// Response from a token endpoint
#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: Option<String>,
    access_token: Option<String>,
}

/// Parameters of a `WWW-Authenticate: Bearer ...` challenge
#[derive(Debug, Clone, PartialEq, Eq)]
struct BearerChallenge {
    realm: String,
    service: Option<String>,
    scope: Option<String>,
}

impl BearerChallenge {
    fn parse(header: &str) -> Option<Self> {
        let (scheme, params) = header.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return None;
        }

        let params: HashMap<String, String> = CHALLENGE_PARAM
            .captures_iter(params)
            .map(|caps| (caps[1].to_ascii_lowercase(), caps[2].to_string()))
            .collect();

        Some(Self {
            realm: params.get("realm")?.clone(),
            service: params.get("service").cloned(),
            scope: params.get("scope").cloned(),
        })
    }
}

/// Registry implementation for the OCI Distribution API
pub struct OciRegistry {
    client: reqwest::Client,
    base_url: Option<String>,
    tokens: Mutex<HashMap<String, String>>,
}

impl OciRegistry {
    pub fn new(user_agent: &str) -> Result<Self, RegistryError> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;

        Ok(Self {
            client,
            base_url: None,
            tokens: Mutex::new(HashMap::new()),
        })
    }

    /// Sends every request to `base_url` instead of the reference's registry
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.trim_end_matches('/').to_string());
        self
    }

    fn base_url(&self, image: &ImageReference) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| image.api_base())
    }

    fn token_key(image: &ImageReference) -> String {
        format!("{}/{}", image.registry(), image.repository())
    }

    fn lock_tokens(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, RegistryError> {
        self.tokens.lock().map_err(|_| RegistryError::LockPoisoned)
    }

    fn cached_token(&self, image: &ImageReference) -> Result<Option<String>, RegistryError> {
        Ok(self.lock_tokens()?.get(&Self::token_key(image)).cloned())
    }

    fn store_token(&self, image: &ImageReference, token: String) -> Result<(), RegistryError> {
        self.lock_tokens()?.insert(Self::token_key(image), token);
        Ok(())
    }

    async fn send_once(
        &self,
        method: Method,
        url: &str,
        accept: Option<&str>,
        token: Option<&str>,
    ) -> Result<Response, RegistryError> {
        let mut headers = HeaderMap::new();
        if let Some(accept) = accept.and_then(|a| HeaderValue::from_str(a).ok()) {
            headers.insert(ACCEPT, accept);
        }
        if let Some(value) = token.and_then(|t| HeaderValue::from_str(&format!("Bearer {}", t)).ok()) {
            headers.insert(AUTHORIZATION, value);
        }

        let response = self
            .client
            .request(method, url)
            .headers(headers)
            .send()
            .await?;
        Ok(response)
    }

    /// Send a request, answering a bearer challenge with an anonymous token once
    async fn send(
        &self,
        image: &ImageReference,
        method: Method,
        url: &str,
        accept: Option<&str>,
    ) -> Result<Response, RegistryError> {
        let cached = self.cached_token(image)?;
        let response = self
            .send_once(method.clone(), url, accept, cached.as_deref())
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let Some(challenge) = response
            .headers()
            .get(WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok())
            .and_then(BearerChallenge::parse)
        else {
            return Err(RegistryError::Unauthorized(url.to_string()));
        };

        let token = self.fetch_token(&challenge, image).await?;
        self.store_token(image, token.clone())?;

        let response = self.send_once(method, url, accept, Some(&token)).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(RegistryError::Unauthorized(url.to_string()));
        }
        Ok(response)
    }

    async fn fetch_token(
        &self,
        challenge: &BearerChallenge,
        image: &ImageReference,
    ) -> Result<String, RegistryError> {
        let scope = challenge
            .scope
            .clone()
            .unwrap_or_else(|| format!("repository:{}:pull", image.repository()));
        let mut params = vec![("scope", scope)];
        if let Some(service) = &challenge.service {
            params.push(("service", service.clone()));
        }

        let url = Url::parse_with_params(&challenge.realm, &params).map_err(|e| {
            RegistryError::InvalidResponse(format!("Invalid token realm '{}': {}", challenge.realm, e))
        })?;
        debug!("Requesting anonymous token from {}", challenge.realm);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(RegistryError::Unauthorized(format!(
                "Token endpoint returned status {}",
                response.status()
            )));
        }

        let body: TokenResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse token response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        body.token
            .or(body.access_token)
            .ok_or_else(|| RegistryError::InvalidResponse("Token response has no token".to_string()))
    }
}

/// Map error statuses to `RegistryError`, passing successful responses through
fn check_status(response: Response, what: &str) -> Result<Response, RegistryError> {
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Err(RegistryError::NotFound(what.to_string()));
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        return Err(RegistryError::RateLimited {
            retry_after_secs: retry_after,
        });
    }

    if !status.is_success() {
        warn!("Registry returned status {} for {}", status, what);
        return Err(RegistryError::InvalidResponse(format!(
            "Unexpected status: {}",
            status
        )));
    }

    Ok(response)
}

/// Extract the `rel="next"` target of a `Link` header, resolved against `base`
fn next_page(headers: &HeaderMap, base: &str) -> Option<String> {
    let link = headers.get(LINK)?.to_str().ok()?;
    let target = NEXT_LINK.captures(link)?.get(1)?.as_str();

    if target.starts_with("http://") || target.starts_with("https://") {
        Some(target.to_string())
    } else {
        Some(format!("{}{}", base, target))
    }
}

#[async_trait::async_trait]
impl TagRegistry for OciRegistry {
    async fn list_tags(&self, image: &ImageReference) -> Result<Vec<String>, RegistryError> {
        let base = self.base_url(image);
        let mut url = format!("{}/v2/{}/tags/list", base, image.repository());
        let mut tags = Vec::new();

        loop {
            let response = self.send(image, Method::GET, &url, None).await?;
            let response = check_status(response, image.repository())?;
            let next = next_page(response.headers(), &base);

            let page: TagList = response.json().await.map_err(|e| {
                warn!("Failed to parse tag list for {}: {}", image.repository(), e);
                RegistryError::InvalidResponse(e.to_string())
            })?;
            tags.extend(page.tags.unwrap_or_default());

            match next {
                Some(next) if next != url => url = next,
                _ => break,
            }
        }

        debug!("Listed {} tags for {}", tags.len(), image.repository());
        Ok(tags)
    }

    async fn manifest_digest(&self, image: &ImageReference) -> Result<String, RegistryError> {
        let url = format!(
            "{}/v2/{}/manifests/{}",
            self.base_url(image),
            image.repository(),
            image.tag()
        );
        let accept = MANIFEST_MEDIA_TYPES.join(", ");

        let response = self.send(image, Method::HEAD, &url, Some(&accept)).await?;
        let response = check_status(response, &image.to_string())?;

        response
            .headers()
            .get(CONTENT_DIGEST_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                RegistryError::InvalidResponse(format!(
                    "No {} header for {}",
                    CONTENT_DIGEST_HEADER, image
                ))
            })
    }
}
