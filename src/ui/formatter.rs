//! Formatting functions for UI output.
//!
//! Status and error lines go to stderr so that command results printed on
//! stdout stay usable in scripts.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::config::ReleaseConfig;
use crate::projects::{format_projects, ProjectSelection};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Print the table of selectable projects.
///
/// With `print_error_label` the table is a usage error and goes to stderr.
pub fn display_project_table(config: &ReleaseConfig, print_error_label: bool) {
    let table = format_projects(config, print_error_label, 1, 2);
    if print_error_label {
        eprint!("{}", table);
    } else {
        print!("{}", table);
    }
}

/// Print selected project names, one per line, in configuration order.
pub fn display_selected_projects(config: &ReleaseConfig, selection: &ProjectSelection) {
    for project in selection.projects(config) {
        println!("{}", project.name);
    }
}
