use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use image_peek::config::{Config, PeekConfig, USER_AGENT};
use image_peek::image::registries::OciRegistry;
use image_peek::image::runtimes::DockerCli;
use image_peek::logging::{LogLevel, init_logging};
use image_peek::peek::{ImagePeeker, PeekOptions};
use image_peek::version::TagFilter;

#[derive(Parser)]
#[command(name = "image-peek")]
#[command(version, about = "Check local containers for newer image tags")]
struct Cli {
    /// Config file (default is $XDG_CONFIG_HOME/image-peek/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(short = 'L', long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check all containers' latest image
    PeekLatestImage(PeekArgs),
}

#[derive(Args)]
struct PeekArgs {
    /// Timeout in seconds for the whole check
    #[arg(long)]
    timeout: Option<u64>,

    /// Regular expression for registry tag filtering
    #[arg(short = 'f', long)]
    tag_filter: Option<TagFilter>,

    /// Skip registry tags that can't be parsed instead of failing
    #[arg(long)]
    skip_invalid_tags: bool,

    /// Path to the docker client
    #[arg(long)]
    docker: Option<PathBuf>,
}

impl PeekArgs {
    fn apply(self, config: &mut PeekConfig) {
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(tag_filter) = self.tag_filter {
            config.tag_filter = tag_filter;
        }
        if self.skip_invalid_tags {
            config.skip_invalid_tags = true;
        }
        if let Some(docker) = self.docker {
            config.docker_binary = docker;
        }
    }
}

async fn peek_latest_image(config: PeekConfig) -> anyhow::Result<()> {
    let options = PeekOptions {
        tag_filter: config.tag_filter,
        skip_invalid_tags: config.skip_invalid_tags,
    };
    let registry = OciRegistry::new(USER_AGENT)?;
    let runtime = DockerCli::new(&config.docker_binary);
    let peeker = ImagePeeker::new(registry, runtime, options);

    let reports = tokio::time::timeout(Duration::from_secs(config.timeout_secs), peeker.peek())
        .await
        .with_context(|| format!("Timed out after {}s", config.timeout_secs))??;

    for report in &reports {
        if report.up_to_date {
            continue;
        }
        println!("{}", report.message());
    }
    info!("Checked {} containers", reports.len());

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    init_logging(config.log_level)?;

    match cli.command {
        Command::PeekLatestImage(args) => {
            args.apply(&mut config.peek);
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?
                .block_on(peek_latest_image(config.peek))
        }
    }
}
