use std::fmt;

/// Warnings that occur at the edges of the version scheme.
/// These are non-fatal issues that should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// A component does not fit in one decimal digit, so the integer encoding collides
    ComponentOutOfRange {
        version: String,
        component: String,
        value: u64,
    },
    /// None of the inspected candidates looked like a version
    NoVersionCandidates { inspected: usize },
    /// The proposed version does not encode higher than the previous one
    NotIncreased { old: String, new: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::ComponentOutOfRange {
                version,
                component,
                value,
            } => {
                write!(
                    f,
                    "Version '{}' has {} component {} (> 9); its encoding overlaps other versions",
                    version, component, value
                )
            }
            BoundaryWarning::NoVersionCandidates { inspected } => {
                write!(
                    f,
                    "None of the {} candidate(s) looks like a version",
                    inspected
                )
            }
            BoundaryWarning::NotIncreased { old, new } => {
                write!(f, "Version '{}' is not an increase over '{}'", new, old)
            }
        }
    }
}
