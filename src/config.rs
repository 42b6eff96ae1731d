use std::path::PathBuf;

use clap::Parser;
use clap_complete::ArgValueCompleter;

use crate::docker::container_name_completer;

pub const DOCKER_ENV: &str = "CONTAINER_SELECTOR_DOCKER";

/// Select and connect to a Docker container
///
/// A simple tool to interactively select a running Docker container and
/// execute a command in it.
#[derive(Parser, Debug, Clone)]
#[command(name = "container-selector", version)]
pub struct Cli {
    /// Command to run in the container
    #[arg(short = 'c', long, allow_hyphen_values = true)]
    pub command: Option<String>,

    /// Skip command prompt and use default bash
    #[arg(long)]
    pub no_prompt: bool,

    /// Auto-select container matching this pattern (skips fuzzy finder)
    #[arg(
        short = 'f',
        long,
        allow_hyphen_values = true,
        add = ArgValueCompleter::new(container_name_completer)
    )]
    pub filter: Option<String>,

    /// Docker CLI used to list containers and run exec
    #[arg(long, env = DOCKER_ENV, default_value = "docker")]
    pub docker: PathBuf,
}

/// Settings for a single invocation, threaded through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub command: Option<String>,
    pub no_prompt: bool,
    pub filter: Option<String>,
    pub docker: PathBuf,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            command: cli.command.filter(|c| !c.is_empty()),
            no_prompt: cli.no_prompt,
            filter: cli.filter.filter(|f| !f.is_empty()),
            docker: cli.docker,
        }
    }
}
