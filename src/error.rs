use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SelectorError {
    #[error("failed to list containers: {0}")]
    RuntimeUnavailable(String),

    #[error("no running containers found")]
    NoContainers,

    #[error("no containers found matching filter: {0}")]
    NoMatch(String),

    /// Carries the `name (image)` labels of every candidate.
    #[error("please use a more specific filter")]
    AmbiguousMatch(Vec<String>),

    #[error("container selection cancelled")]
    SelectionCancelled,

    #[error("failed to write to the terminal")]
    Output(#[source] io::Error),

    #[error("failed to read command")]
    InputRead(#[source] io::Error),

    #[error("command exited with status {0}")]
    CommandFailed(i32),

    #[error("failed to execute docker exec")]
    ExecLaunch(#[source] io::Error),
}

impl SelectorError {
    /// Exit status the CLI should terminate with for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            SelectorError::CommandFailed(code) => u8::try_from(*code)
                .ok()
                .filter(|c| *c != 0)
                .unwrap_or(1),
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failed_message_names_status() {
        let err = SelectorError::CommandFailed(7);
        assert_eq!(err.to_string(), "command exited with status 7");
        assert_eq!(err.exit_code(), 7);
    }

    #[test]
    fn out_of_range_status_exits_with_one() {
        assert_eq!(SelectorError::CommandFailed(-1).exit_code(), 1);
        assert_eq!(SelectorError::CommandFailed(300).exit_code(), 1);
        assert_eq!(SelectorError::NoContainers.exit_code(), 1);
    }

    #[test]
    fn no_match_message_names_filter() {
        let err = SelectorError::NoMatch("redis".to_string());
        assert_eq!(
            err.to_string(),
            "no containers found matching filter: redis"
        );
    }
}
