use std::io::Write;

use dialoguer::{FuzzySelect, theme::ColorfulTheme};

use crate::{docker::Container, error::SelectorError};

pub const PICKER_PROMPT: &str = "Select a container";

/// Interactive chooser over a list of labels.
pub trait Picker {
    /// Returns the chosen index, or `None` when the operator backs out.
    fn pick(&self, prompt: &str, labels: &[String])
    -> anyhow::Result<Option<usize>>;
}

pub struct FuzzyPicker;

impl Picker for FuzzyPicker {
    fn pick(
        &self,
        prompt: &str,
        labels: &[String],
    ) -> anyhow::Result<Option<usize>> {
        let choice = FuzzySelect::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .items(labels)
            .default(0)
            .interact_opt()?;
        Ok(choice)
    }
}

/// Containers whose display name or image contains `filter`, ignoring case.
pub fn filter_containers<'a>(
    containers: &'a [Container],
    filter: &str,
) -> Vec<&'a Container> {
    let filter = filter.to_lowercase();
    containers
        .iter()
        .filter(|c| {
            c.display_name()
                .to_lowercase()
                .contains(&filter)
                || c.image.to_lowercase().contains(&filter)
        })
        .collect()
}

/// Narrows `containers` to exactly one, by filter or by asking the operator.
///
/// Confirmation of an auto-selection goes to `out`; the candidate listing of
/// an ambiguous filter goes to `diag`.
pub fn select_container<'a>(
    containers: &'a [Container],
    filter: Option<&str>,
    picker: &impl Picker,
    out: &mut impl Write,
    diag: &mut impl Write,
) -> Result<&'a Container, SelectorError> {
    match filter {
        Some(filter) => select_by_filter(containers, filter, out, diag),
        None => select_interactive(containers, picker),
    }
}

fn select_by_filter<'a>(
    containers: &'a [Container],
    filter: &str,
    out: &mut impl Write,
    diag: &mut impl Write,
) -> Result<&'a Container, SelectorError> {
    let matches = filter_containers(containers, filter);
    tracing::debug!(filter, matches = matches.len(), "applied filter");

    match matches.as_slice() {
        [] => Err(SelectorError::NoMatch(filter.to_string())),
        [container] => {
            let name = container.display_name();
            writeln!(out, "Auto-selected container: {name}")
                .map_err(SelectorError::Output)?;
            Ok(*container)
        }
        candidates => {
            let labels: Vec<String> = candidates
                .iter()
                .map(|c| format!("{} ({})", c.display_name(), c.image))
                .collect();

            writeln!(diag, "Multiple containers match filter '{filter}':")
                .map_err(SelectorError::Output)?;
            for label in &labels {
                writeln!(diag, "  - {label}").map_err(SelectorError::Output)?;
            }

            Err(SelectorError::AmbiguousMatch(labels))
        }
    }
}

fn select_interactive<'a>(
    containers: &'a [Container],
    picker: &impl Picker,
) -> Result<&'a Container, SelectorError> {
    let labels: Vec<String> = containers
        .iter()
        .map(|c| c.display_name().to_string())
        .collect();

    match picker.pick(PICKER_PROMPT, &labels) {
        Ok(Some(idx)) => containers
            .get(idx)
            .ok_or(SelectorError::SelectionCancelled),
        Ok(None) => Err(SelectorError::SelectionCancelled),
        Err(e) => {
            tracing::debug!("picker failed: {e:#}");
            Err(SelectorError::SelectionCancelled)
        }
    }
}
