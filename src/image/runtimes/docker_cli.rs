//! Container runtime backed by the `docker` command line client

use std::path::PathBuf;

use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::image::error::RuntimeError;
use crate::image::runtime::{ContainerRuntime, ContainerSummary};

pub const DEFAULT_DOCKER_BINARY: &str = "docker";

/// Subset of `docker container inspect` output
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ContainerInspect {
    id: String,
    image: String,
    config: ContainerConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ContainerConfig {
    image: String,
}

/// Runtime implementation that shells out to the Docker CLI
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: PathBuf,
}

impl DockerCli {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Run the binary with `args` and return its stdout
    async fn run(&self, args: &[&str]) -> Result<String, RuntimeError> {
        let command = format!("{} {}", self.binary.display(), args.join(" "));
        debug!("Running {}", command);

        let output = Command::new(&self.binary)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| RuntimeError::Io {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(RuntimeError::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| RuntimeError::InvalidOutput {
            command,
            message: e.to_string(),
        })
    }
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new(DEFAULT_DOCKER_BINARY)
    }
}

fn parse_container_ids(stdout: &str) -> Vec<&str> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

fn parse_containers(command: &str, stdout: &str) -> Result<Vec<ContainerSummary>, RuntimeError> {
    let inspected: Vec<ContainerInspect> =
        serde_json::from_str(stdout).map_err(|e| RuntimeError::InvalidOutput {
            command: command.to_string(),
            message: e.to_string(),
        })?;

    Ok(inspected
        .into_iter()
        .map(|c| ContainerSummary {
            id: c.id,
            image: c.config.image,
            image_id: c.image,
        })
        .collect())
}

fn parse_repo_digests(command: &str, stdout: &str) -> Result<Vec<String>, RuntimeError> {
    // Images that were never pulled or pushed report `null`
    let digests: Option<Vec<String>> =
        serde_json::from_str(stdout.trim()).map_err(|e| RuntimeError::InvalidOutput {
            command: command.to_string(),
            message: e.to_string(),
        })?;

    Ok(digests.unwrap_or_default())
}

#[async_trait::async_trait]
impl ContainerRuntime for DockerCli {
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>, RuntimeError> {
        let stdout = self
            .run(&["container", "ls", "--all", "--quiet", "--no-trunc"])
            .await?;
        let ids = parse_container_ids(&stdout);
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut args = vec!["container", "inspect"];
        args.extend(ids);
        let stdout = self.run(&args).await?;

        parse_containers("docker container inspect", &stdout)
    }

    async fn image_repo_digests(&self, image_id: &str) -> Result<Vec<String>, RuntimeError> {
        let stdout = self
            .run(&["image", "inspect", "--format", "{{json .RepoDigests}}", image_id])
            .await?;

        parse_repo_digests("docker image inspect", &stdout)
    }
}
