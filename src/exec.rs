use std::{io, process::Command as ProcCommand};

use crate::{docker::DockerCli, error::SelectorError};

/// Commands that get a pseudo-TTY when stdin is a terminal.
pub const INTERACTIVE_SHELLS: &[&str] = &["bash", "sh", "zsh"];

/// Characters that require the command to go through `sh -c`.
pub const SHELL_METACHARACTERS: &[char] =
    &['|', '&', ';', '<', '>', '(', ')', '$', '`', '\\', '"', '\''];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtyMode {
    /// `-it`: keep stdin open and allocate a pseudo-TTY
    Interactive,
    /// `-i`: keep stdin open only
    InputOnly,
}

impl TtyMode {
    pub fn flag(self) -> &'static str {
        match self {
            TtyMode::Interactive => "-it",
            TtyMode::InputOnly => "-i",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecPlan {
    pub tty: TtyMode,
    pub container: String,
    pub command: Vec<String>,
}

impl ExecPlan {
    /// Arguments for the docker CLI, starting with the `exec` subcommand.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "exec".to_string(),
            self.tty.flag().to_string(),
            self.container.clone(),
        ];
        args.extend(self.command.iter().cloned());
        args
    }
}

pub fn is_interactive_shell(words: &[&str]) -> bool {
    matches!(words, [word] if INTERACTIVE_SHELLS.contains(word))
}

pub fn needs_shell(command: &str) -> bool {
    command.contains(SHELL_METACHARACTERS) || command.contains(' ')
}

pub fn plan_exec(
    command: &str,
    container: &str,
    stdin_is_terminal: bool,
) -> ExecPlan {
    let words: Vec<&str> = command.split_whitespace().collect();

    let tty = if is_interactive_shell(&words) && stdin_is_terminal {
        TtyMode::Interactive
    } else {
        TtyMode::InputOnly
    };

    let command = if needs_shell(command) {
        vec!["sh".to_string(), "-c".to_string(), command.to_string()]
    } else {
        words.into_iter().map(str::to_string).collect()
    };

    ExecPlan {
        tty,
        container: container.to_string(),
        command,
    }
}

pub trait ProcessRunner {
    /// Runs to completion with inherited stdio; `None` means no exit code,
    /// e.g. killed by a signal.
    fn run(&self, args: &[String]) -> io::Result<Option<i32>>;
}

impl ProcessRunner for DockerCli {
    fn run(&self, args: &[String]) -> io::Result<Option<i32>> {
        let status = ProcCommand::new(&self.binary).args(args).status()?;
        Ok(status.code())
    }
}

pub fn execute(
    plan: &ExecPlan,
    runner: &impl ProcessRunner,
) -> Result<(), SelectorError> {
    let args = plan.args();
    tracing::debug!(?args, "running docker");

    let code = runner
        .run(&args)
        .map_err(SelectorError::ExecLaunch)?;
    tracing::debug!(?code, "docker exec finished");

    match code {
        Some(0) => Ok(()),
        Some(code) => Err(SelectorError::CommandFailed(code)),
        None => Err(SelectorError::CommandFailed(-1)),
    }
}
