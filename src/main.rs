use std::{
    io::{self, IsTerminal},
    process::ExitCode,
};

use clap::{CommandFactory, Parser};
use crossterm::style::Stylize;
use tracing_subscriber::EnvFilter;

use crate::{
    config::{Cli, Config},
    docker::{Container, DockerCli, list_containers},
    error::SelectorError,
    exec::{execute, plan_exec},
    prompt::resolve_command,
    select::{FuzzyPicker, select_container},
};

mod config;
mod docker;
mod error;
mod exec;
mod prompt;
mod select;

const LOG_ENV: &str = "CONTAINER_SELECTOR_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run(config: &Config) -> anyhow::Result<()> {
    let docker = DockerCli::new(&config.docker);

    let containers = list_containers(&docker).await?;

    // picker, prompt and the exec child all block until the operator is done
    tokio::task::block_in_place(|| attach(config, &docker, &containers))
}

fn attach(
    config: &Config,
    docker: &DockerCli,
    containers: &[Container],
) -> anyhow::Result<()> {
    let container = select_container(
        containers,
        config.filter.as_deref(),
        &FuzzyPicker,
        &mut io::stdout(),
        &mut io::stderr(),
    )?;
    let container_name = container.display_name();
    tracing::debug!(container = container_name, id = %container.id, "selected");

    let command =
        resolve_command(config, &mut io::stdin().lock(), &mut io::stdout())?;
    tracing::debug!(command, "resolved command");

    let plan = plan_exec(&command, container_name, io::stdin().is_terminal());
    execute(&plan, docker)?;

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    clap_complete::CompleteEnv::with_factory(Cli::command).complete();

    init_logging();

    let config = Config::from(Cli::parse());

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            let code = e
                .downcast_ref::<SelectorError>()
                .map_or(1, SelectorError::exit_code);
            ExitCode::from(code)
        }
    }
}
