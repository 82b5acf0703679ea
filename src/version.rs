use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use regex::Regex;
use tracing::debug;

use crate::boundary::BoundaryWarning;
use crate::error::{ReleaseError, Result};

/// Pattern a string must match (as a prefix) to be considered a version candidate.
///
/// Digits are ASCII only, the same set [`Version::parse`] accepts.
pub const VERSION_PATTERN: &str = r"^[0-9]+\.[0-9]+(\.[0-9]+)?(\.[0-9]+)?";

/// Positional weights of major, minor, patch and build in the integer encoding.
const WEIGHTS: [u64; 4] = [1000, 100, 10, 1];

const COMPONENT_NAMES: [&str; 4] = ["major", "minor", "patch", "build"];

/// Step added to the encoded integer by [`increment`]: one patch unit.
const INCREMENT_STEP: u64 = 10;

/// A dotted release version with up to four numeric components.
///
/// The integer encoding is fixed-radix: every component is expected to be a
/// single decimal digit. Larger components are accepted but bleed into the
/// neighbouring position when encoded (`1.10.0` encodes like `2.0.0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub build: u64,
}

impl Version {
    /// Creates a three-component version with a zero build number.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            build: 0,
        }
    }

    /// Returns a copy with the build component replaced.
    pub fn with_build(self, build: u64) -> Self {
        Version { build, ..self }
    }

    /// Parses a dotted version string.
    ///
    /// At least major and minor must be present; patch and build default to 0.
    /// Components past the fourth are ignored.
    ///
    /// # Errors
    /// * `ReleaseError::Format` - fewer than two components, or a component
    ///   that is not a non-negative decimal integer
    pub fn parse(version: &str) -> Result<Self> {
        let parts: Vec<&str> = version.split('.').collect();
        if parts.len() < 2 {
            return Err(ReleaseError::format(format!(
                "Invalid version '{}' - expected at least MAJOR.MINOR",
                version
            )));
        }

        let mut components = [0u64; 4];
        for (index, part) in parts.iter().take(4).enumerate() {
            components[index] = parse_component(version, COMPONENT_NAMES[index], part)?;
        }

        let [major, minor, patch, build] = components;
        Ok(Version {
            major,
            minor,
            patch,
            build,
        })
    }

    /// Components in positional order: major, minor, patch, build.
    pub fn components(&self) -> [u64; 4] {
        [self.major, self.minor, self.patch, self.build]
    }

    /// Encodes the version as `major*1000 + minor*100 + patch*10 + build`.
    pub fn to_integer(&self) -> Result<u64> {
        self.components()
            .iter()
            .zip(WEIGHTS)
            .try_fold(0u64, |acc, (component, weight)| {
                component
                    .checked_mul(weight)
                    .and_then(|weighted| acc.checked_add(weighted))
            })
            .ok_or_else(|| ReleaseError::format(format!("Version '{}' is too large to encode", self)))
    }

    /// Decodes an integer produced by [`Version::to_integer`].
    pub fn from_integer(value: u64) -> Self {
        Version {
            major: value / 1000,
            minor: (value % 1000) / 100,
            patch: (value % 100) / 10,
            build: value % 10,
        }
    }

    /// Lists the components that do not fit in a single decimal digit.
    pub fn out_of_range_components(&self) -> Vec<(&'static str, u64)> {
        COMPONENT_NAMES
            .iter()
            .zip(self.components())
            .filter(|(_, value)| *value > 9)
            .map(|(name, value)| (*name, value))
            .collect()
    }
}

/// Renders `major.minor.patch`, appending `.build` only when it is non-zero.
impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if self.build != 0 {
            write!(f, ".{}", self.build)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

fn parse_component(version: &str, name: &str, part: &str) -> Result<u64> {
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
        return Err(ReleaseError::format(format!(
            "Invalid {} component '{}' in version '{}'",
            name, part, version
        )));
    }

    part.parse::<u64>().map_err(|_| {
        ReleaseError::format(format!(
            "{} component '{}' in version '{}' is too large",
            name, part, version
        ))
    })
}

/// Encodes a dotted version string into its comparable integer form.
///
/// # Example
/// ```
/// assert_eq!(release_tools::version::encode("1.0").unwrap(), 1000);
/// assert_eq!(release_tools::version::encode("1.2.3.4").unwrap(), 1234);
/// ```
pub fn encode(version: &str) -> Result<u64> {
    let parsed = Version::parse(version)?;
    for (component, value) in parsed.out_of_range_components() {
        debug!(
            version,
            component, value, "version component exceeds a single digit; encoding is lossy"
        );
    }

    let value = parsed.to_integer()?;
    debug!(version, value, "encoded version");
    Ok(value)
}

/// Decodes an integer back into dotted form, dropping a zero build component.
pub fn decode(value: u64) -> String {
    let version = Version::from_integer(value).to_string();
    debug!(value, %version, "decoded version");
    version
}

/// Suggests the next release after `version`.
///
/// Adds one patch unit to the encoded integer and decodes the sum, so a
/// patch of 9 carries into the minor position (`1.0.9` -> `1.1.0`). A build
/// component is preserved through the addition.
pub fn increment(version: &str) -> Result<String> {
    let value = encode(version)?;
    let next = value.checked_add(INCREMENT_STEP).ok_or_else(|| {
        ReleaseError::format(format!("Version '{}' is too large to increment", version))
    })?;
    Ok(decode(next))
}

/// Returns true iff `new_version` encodes strictly greater than `old_version`.
pub fn is_increase(old_version: &str, new_version: &str) -> Result<bool> {
    Ok(encode(new_version)? > encode(old_version)?)
}

/// Picks the candidate with the greatest encoded value.
///
/// Candidates not starting with a version (see [`VERSION_PATTERN`]) are skipped.
/// Returns `Ok(None)` when nothing matches. On ties the earliest candidate wins.
///
/// # Errors
/// A candidate that matches the pattern only as a prefix (e.g. `1.2.3-beta`)
/// still has to encode, so it fails with `ReleaseError::Format`.
pub fn max_version<I, S>(candidates: I) -> Result<Option<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let pattern = Regex::new(VERSION_PATTERN)?;
    let mut best: Option<(String, u64)> = None;

    for candidate in candidates {
        let candidate = candidate.as_ref();
        if !pattern.is_match(candidate) {
            debug!(candidate, "skipping non-version candidate");
            continue;
        }

        let value = encode(candidate)?;
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((candidate.to_string(), value)),
        }
    }

    Ok(best.map(|(version, _)| version))
}

/// Picks the greatest version among the names of the subdirectories of `dir`.
///
/// Plain files and names that are not valid UTF-8 are ignored.
///
/// # Errors
/// * `ReleaseError::Io` - `dir` cannot be read
/// * `ReleaseError::Format` - as for [`max_version`]
pub fn latest_version_in(dir: &Path) -> Result<Option<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }

    debug!(dir = %dir.display(), count = names.len(), "inspecting release directories");
    max_version(&names)
}

/// Collects a warning for every component that breaks the fixed-radix encoding.
pub fn radix_warnings(version: &str) -> Result<Vec<BoundaryWarning>> {
    let parsed = Version::parse(version)?;
    Ok(parsed
        .out_of_range_components()
        .into_iter()
        .map(|(component, value)| BoundaryWarning::ComponentOutOfRange {
            version: version.to_string(),
            component: component.to_string(),
            value,
        })
        .collect())
}
