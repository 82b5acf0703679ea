//! Selection of the sub-projects a release run operates on.
//!
//! Arguments name projects by full or short name. Selected projects are
//! reported in configuration order.

use std::collections::BTreeSet;

use tracing::debug;

use crate::config::{Project, ReleaseConfig};
use crate::error::{ReleaseError, Result};

/// Width of the `project` column in the usage table.
const PROJECT_COLUMN_WIDTH: usize = 27;

/// Set of selected project names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSelection {
    selected: BTreeSet<String>,
}

impl ProjectSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, name: impl Into<String>) {
        self.selected.insert(name.into());
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Selected projects in configuration order.
    pub fn projects<'a>(&'a self, config: &'a ReleaseConfig) -> impl Iterator<Item = &'a Project> {
        config
            .projects
            .iter()
            .filter(move |p| self.is_selected(&p.name))
    }
}

/// Finds the project whose full or short name equals `arg`.
///
/// When several projects match, the last configured one wins.
pub fn match_project<'a>(config: &'a ReleaseConfig, arg: &str) -> Option<&'a Project> {
    config
        .projects
        .iter()
        .rev()
        .find(|p| p.name == arg || p.short_name == arg)
}

/// Builds a selection from command-line words (program name excluded).
///
/// The all-option selects every project and stops reading. The auto flag is skipped.
///
/// # Errors
/// * `ReleaseError::NoProjects` - `args` is empty
/// * `ReleaseError::UnknownProject` - one or more words matched no project;
///   every unmatched word is reported
pub fn read_projects<S: AsRef<str>>(config: &ReleaseConfig, args: &[S]) -> Result<ProjectSelection> {
    if args.is_empty() {
        return Err(ReleaseError::NoProjects);
    }

    let mut selection = ProjectSelection::new();
    let mut unmatched = Vec::new();

    for arg in args.iter().map(|a| a.as_ref()) {
        if arg == config.all_option {
            for project in &config.projects {
                selection.select(project.name.clone());
            }
            return Ok(selection);
        }

        if arg == config.auto_flag {
            continue;
        }

        match match_project(config, arg) {
            Some(project) => selection.select(project.name.clone()),
            None => unmatched.push(arg.to_string()),
        }
    }

    if !unmatched.is_empty() {
        return Err(ReleaseError::UnknownProject(unmatched));
    }

    if selection.is_empty() {
        return Err(ReleaseError::NoProjects);
    }

    debug!(count = selection.len(), "projects selected");
    Ok(selection)
}

/// Adds every project transitively required by the current selection.
pub fn add_project_dependencies(config: &ReleaseConfig, selection: &mut ProjectSelection) {
    let mut pending: Vec<String> = selection.selected.iter().cloned().collect();

    while let Some(name) = pending.pop() {
        let Some(project) = config.project(&name) else {
            continue;
        };
        for required in &project.requires {
            if !selection.is_selected(required) {
                debug!(project = %name, required = %required, "adding required project");
                selection.select(required.clone());
                pending.push(required.clone());
            }
        }
    }
}

/// Returns true if the auto flag appears among `args`.
pub fn read_auto<S: AsRef<str>>(config: &ReleaseConfig, args: &[S]) -> bool {
    args.iter().any(|a| a.as_ref() == config.auto_flag)
}

/// Pads `text` on the right with `filler` up to `size` characters. Never truncates.
pub fn pad_to(text: &str, filler: char, size: usize) -> String {
    let missing = size.saturating_sub(text.chars().count());
    let mut padded = String::with_capacity(text.len() + missing);
    padded.push_str(text);
    padded.extend(std::iter::repeat(filler).take(missing));
    padded
}

/// Renders the table of selectable projects.
pub fn format_projects(
    config: &ReleaseConfig,
    print_error_label: bool,
    indent_level: usize,
    indent_size: usize,
) -> String {
    let indentation = " ".repeat(indent_size * indent_level);
    let mut lines = Vec::new();

    if print_error_label {
        lines.push(format!(
            "projects:   You must specify at least one of the following projects or \"{}\"",
            config.all_option
        ));
    }

    lines.push(format!(
        "{}{}short-name",
        indentation,
        pad_to("project", ' ', PROJECT_COLUMN_WIDTH)
    ));

    for project in &config.projects {
        lines.push(format!(
            "{}{}{}",
            indentation,
            pad_to(&project.name, ' ', PROJECT_COLUMN_WIDTH),
            project.short_name
        ));
    }

    lines.push(format!("{}{}", indentation, config.all_option));

    let mut table = lines.join("\n");
    table.push('\n');
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(config: &ReleaseConfig, selection: &ProjectSelection) -> Vec<String> {
        selection.projects(config).map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_match_by_name_and_short_name() {
        let config = ReleaseConfig::default();
        assert_eq!(
            match_project(&config, "cf").map(|p| p.name.as_str()),
            Some("checker-framework")
        );
        assert_eq!(
            match_project(&config, "langtools").map(|p| p.short_name.as_str()),
            Some("lt")
        );
        assert!(match_project(&config, "nope").is_none());
    }

    #[test]
    fn test_read_projects_empty_args() {
        let config = ReleaseConfig::default();
        let args: [&str; 0] = [];
        assert!(matches!(
            read_projects(&config, &args),
            Err(ReleaseError::NoProjects)
        ));
    }

    #[test]
    fn test_read_projects_all() {
        let config = ReleaseConfig::default();
        // the all-option wins over earlier unmatched words
        let selection = read_projects(&config, &["bogus", "all"]).unwrap();
        assert_eq!(selection.len(), 3);
    }

    #[test]
    fn test_read_projects_reports_every_unmatched() {
        let config = ReleaseConfig::default();
        let err = read_projects(&config, &["foo", "lt", "bar"]).unwrap_err();
        match err {
            ReleaseError::UnknownProject(words) => assert_eq!(words, vec!["foo", "bar"]),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_read_projects_skips_auto_flag() {
        let config = ReleaseConfig::default();
        let selection = read_projects(&config, &["--auto", "afu"]).unwrap();
        assert_eq!(names(&config, &selection), vec!["annotation-file-utilities"]);
    }

    #[test]
    fn test_read_projects_only_auto_flag() {
        let config = ReleaseConfig::default();
        assert!(matches!(
            read_projects(&config, &["--auto"]),
            Err(ReleaseError::NoProjects)
        ));
    }

    #[test]
    fn test_dependencies_of_checker_framework() {
        let config = ReleaseConfig::default();
        let mut selection = read_projects(&config, &["cf"]).unwrap();
        add_project_dependencies(&config, &mut selection);
        assert_eq!(
            names(&config, &selection),
            vec!["langtools", "annotation-file-utilities", "checker-framework"]
        );
    }

    #[test]
    fn test_dependencies_of_afu() {
        let config = ReleaseConfig::default();
        let mut selection = read_projects(&config, &["afu"]).unwrap();
        add_project_dependencies(&config, &mut selection);
        assert_eq!(
            names(&config, &selection),
            vec!["langtools", "annotation-file-utilities"]
        );
    }

    #[test]
    fn test_dependencies_of_langtools_only() {
        let config = ReleaseConfig::default();
        let mut selection = read_projects(&config, &["lt"]).unwrap();
        add_project_dependencies(&config, &mut selection);
        assert_eq!(names(&config, &selection), vec!["langtools"]);
    }

    #[test]
    fn test_read_auto() {
        let config = ReleaseConfig::default();
        assert!(read_auto(&config, &["cf", "--auto"]));
        assert!(!read_auto(&config, &["cf"]));
    }

    #[test]
    fn test_pad_to() {
        assert_eq!(pad_to("ab", '.', 5), "ab...");
        assert_eq!(pad_to("abcdef", '.', 3), "abcdef");
    }

    #[test]
    fn test_format_projects() {
        let config = ReleaseConfig::default();
        let table = format_projects(&config, false, 1, 2);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], format!("  {:<27}short-name", "project"));
        assert_eq!(lines[1], format!("  {:<27}lt", "langtools"));
        assert_eq!(lines[4], "  all");
    }

    #[test]
    fn test_format_projects_with_error_label() {
        let config = ReleaseConfig::default();
        let table = format_projects(&config, true, 0, 4);
        assert!(table.starts_with("projects:   You must specify"));
        assert!(table.contains("checker-framework"));
    }
}
