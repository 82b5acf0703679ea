use release_tools::boundary::BoundaryWarning;
use release_tools::ui;
use release_tools::version::radix_warnings;

// ============================================================================
// BoundaryWarning Display Tests
// ============================================================================

#[test]
fn test_boundary_warning_no_version_candidates_display() {
    let warning = BoundaryWarning::NoVersionCandidates { inspected: 4 };
    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("None of the 4 candidate(s)"),
        "Message should report the candidate count, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_component_out_of_range_display() {
    let warning = BoundaryWarning::ComponentOutOfRange {
        version: "1.2.12".to_string(),
        component: "patch".to_string(),
        value: 12,
    };
    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("'1.2.12'"),
        "Message should contain the version, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("patch component 12"),
        "Message should name the component, got: {}",
        display_msg
    );
}

// ============================================================================
// Warnings derived from versions
// ============================================================================

#[test]
fn test_radix_warnings_for_every_wide_component() {
    let warnings = radix_warnings("10.10.10.10").unwrap();
    let components: Vec<String> = warnings
        .iter()
        .map(|w| match w {
            BoundaryWarning::ComponentOutOfRange { component, .. } => component.clone(),
            other => panic!("unexpected warning: {:?}", other),
        })
        .collect();
    assert_eq!(components, vec!["major", "minor", "patch", "build"]);
}

#[test]
fn test_radix_warnings_rejects_malformed_version() {
    assert!(radix_warnings("not-a-version").is_err());
}

#[test]
fn test_display_boundary_warning_does_not_panic() {
    ui::display_boundary_warning(&BoundaryWarning::NotIncreased {
        old: "1.0.0".to_string(),
        new: "0.9.0".to_string(),
    });
}
