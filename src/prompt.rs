use std::io::{self, BufRead, Write};

use crate::{config::Config, error::SelectorError};

/// Shell started when no command is given.
pub const DEFAULT_COMMAND: &str = "bash";

pub const COMMAND_PROMPT: &str =
    "Enter command to run inside container [default: bash]: ";

/// Determines the command to run: the `--command` value, the default shell
/// under `--no-prompt`, or a line read from `input` after prompting.
pub fn resolve_command(
    config: &Config,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<String, SelectorError> {
    if let Some(command) = &config.command {
        return Ok(command.clone());
    }

    if config.no_prompt {
        return Ok(DEFAULT_COMMAND.to_string());
    }

    write!(output, "{COMMAND_PROMPT}")
        .and_then(|_| output.flush())
        .map_err(SelectorError::InputRead)?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(SelectorError::InputRead)?;
    if read == 0 {
        return Err(SelectorError::InputRead(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "standard input closed before a command was entered",
        )));
    }

    let command = line.trim();
    if command.is_empty() {
        Ok(DEFAULT_COMMAND.to_string())
    } else {
        Ok(command.to_string())
    }
}
