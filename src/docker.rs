use std::{ffi::OsStr, path::PathBuf};

use clap_complete::CompletionCandidate;
use serde::Deserialize;
use tokio::process::Command;

use crate::{config::DOCKER_ENV, error::SelectorError};

/// A running container as reported by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub id: String,
    pub names: Vec<String>,
    pub image: String,
}

impl Container {
    /// First alias without its leading `/`, or the short id if unnamed.
    pub fn display_name(&self) -> &str {
        match self.names.first() {
            Some(name) => name.strip_prefix('/').unwrap_or(name),
            None => self.id.get(..12).unwrap_or(&self.id),
        }
    }
}

pub trait ContainerRuntime {
    async fn running_containers(&self)
    -> Result<Vec<Container>, SelectorError>;
}

/// Lists running containers, failing when there are none.
pub async fn list_containers(
    runtime: &impl ContainerRuntime,
) -> Result<Vec<Container>, SelectorError> {
    let containers = runtime.running_containers().await?;
    tracing::debug!(count = containers.len(), "listed running containers");

    if containers.is_empty() {
        return Err(SelectorError::NoContainers);
    }

    Ok(containers)
}

/// The docker CLI, used both as container runtime and exec launcher.
#[derive(Debug, Clone)]
pub struct DockerCli {
    pub binary: PathBuf,
}

impl DockerCli {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl ContainerRuntime for DockerCli {
    async fn running_containers(
        &self,
    ) -> Result<Vec<Container>, SelectorError> {
        let output = Command::new(&self.binary)
            .args(["ps", "--no-trunc", "--format", "{{json .}}"])
            .output()
            .await
            .map_err(|e| {
                SelectorError::RuntimeUnavailable(format!(
                    "could not run {}: {}",
                    self.binary.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SelectorError::RuntimeUnavailable(format!(
                "docker ps exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        parse_ps_output(&String::from_utf8_lossy(&output.stdout))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PsEntry {
    #[serde(rename = "ID")]
    id: String,
    #[serde(default)]
    names: String,
    #[serde(default)]
    image: String,
}

impl From<PsEntry> for Container {
    fn from(entry: PsEntry) -> Self {
        Self {
            id: entry.id,
            names: entry
                .names
                .split(',')
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .collect(),
            image: entry.image,
        }
    }
}

/// Parses `docker ps` JSON output, either a JSON array or one object per line.
pub fn parse_ps_output(json: &str) -> Result<Vec<Container>, SelectorError> {
    let json = json.trim();
    if json.is_empty() {
        return Ok(vec![]);
    }

    let entries: Vec<PsEntry> = if json.starts_with('[') {
        serde_json::from_str::<Vec<PsEntry>>(json)
            .map_err(unexpected_output)?
    } else {
        json.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(serde_json::from_str::<PsEntry>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(unexpected_output)?
    };

    Ok(entries
        .into_iter()
        .map(Container::from)
        .collect())
}

fn unexpected_output(e: serde_json::Error) -> SelectorError {
    SelectorError::RuntimeUnavailable(format!(
        "unexpected output from docker ps: {e}"
    ))
}

pub fn container_name_completer(current: &OsStr) -> Vec<CompletionCandidate> {
    let Some(current) = current.to_str() else {
        return vec![];
    };

    let binary =
        std::env::var(DOCKER_ENV).unwrap_or_else(|_| "docker".to_string());
    let docker = DockerCli::new(binary);

    let containers = tokio::task::block_in_place(|| {
        tokio::runtime::Handle::current().block_on(docker.running_containers())
    })
    .unwrap_or_default();

    containers
        .iter()
        .map(Container::display_name)
        .filter(|name| name.starts_with(current))
        .map(CompletionCandidate::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeRuntime(Result<Vec<Container>, String>);

    impl ContainerRuntime for FakeRuntime {
        async fn running_containers(
            &self,
        ) -> Result<Vec<Container>, SelectorError> {
            self.0
                .clone()
                .map_err(SelectorError::RuntimeUnavailable)
        }
    }

    fn container(id: &str, names: &[&str], image: &str) -> Container {
        Container {
            id: id.to_string(),
            names: names.iter().map(|n| n.to_string()).collect(),
            image: image.to_string(),
        }
    }

    #[test]
    fn display_name_strips_leading_slash() {
        let c = container("abc", &["/web-1", "/alias"], "nginx");
        assert_eq!(c.display_name(), "web-1");

        let c = container("abc", &["db-1"], "postgres");
        assert_eq!(c.display_name(), "db-1");
    }

    #[test]
    fn unnamed_container_displays_short_id() {
        let c = container("0123456789abcdef0123", &[], "alpine");
        assert_eq!(c.display_name(), "0123456789ab");

        let c = container("beef", &[], "alpine");
        assert_eq!(c.display_name(), "beef");
    }

    #[test]
    fn parses_json_lines() {
        let out = concat!(
            r#"{"ID":"a1","Names":"web-1","Image":"nginx","State":"running"}"#,
            "\n",
            r#"{"ID":"b2","Names":"db-1,db-alias","Image":"postgres:16"}"#,
            "\n\n",
        );
        let containers = parse_ps_output(out).unwrap();
        assert_eq!(
            containers,
            vec![
                container("a1", &["web-1"], "nginx"),
                container("b2", &["db-1", "db-alias"], "postgres:16"),
            ]
        );
    }

    #[test]
    fn parses_json_array() {
        let out = r#"[{"ID":"a1","Names":"web-1","Image":"nginx"}]"#;
        let containers = parse_ps_output(out).unwrap();
        assert_eq!(containers, vec![container("a1", &["web-1"], "nginx")]);
    }

    #[test]
    fn blank_output_parses_to_nothing() {
        assert!(parse_ps_output("  \n").unwrap().is_empty());
    }

    #[test]
    fn garbage_output_is_runtime_unavailable() {
        let err = parse_ps_output("Cannot connect to the Docker daemon")
            .unwrap_err();
        assert!(matches!(err, SelectorError::RuntimeUnavailable(_)));
    }

    #[tokio::test]
    async fn empty_listing_fails_with_no_containers() {
        let err = list_containers(&FakeRuntime(Ok(vec![])))
            .await
            .unwrap_err();
        assert!(matches!(err, SelectorError::NoContainers));
    }

    #[tokio::test]
    async fn runtime_failure_is_propagated() {
        let err = list_containers(&FakeRuntime(Err("socket".to_string())))
            .await
            .unwrap_err();
        assert!(matches!(err, SelectorError::RuntimeUnavailable(_)));
    }

    #[tokio::test]
    async fn listing_returns_all_containers() {
        let all = vec![
            container("a1", &["web-1"], "nginx"),
            container("b2", &["db-1"], "postgres"),
        ];
        let listed = list_containers(&FakeRuntime(Ok(all.clone())))
            .await
            .unwrap();
        assert_eq!(listed, all);
    }
}
