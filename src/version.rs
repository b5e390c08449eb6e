use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("empty version string")]
    Empty,
    #[error("invalid version component {component:?} in {version:?}")]
    Component { version: String, component: String },
}

/// Dotted version such as `3.6` or `4.0.3-rc1`.
///
/// Each component contributes its leading digits, so `0-rc1` reads as `0`.
/// Missing trailing components compare as zero: `3.6 == 3.6.0 < 3.6.1`.
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    parts: Vec<u64>,
}

impl Version {
    pub fn parse(s: &str) -> Result<Self, VersionError> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(VersionError::Empty);
        }

        let parts = raw
            .split('.')
            .map(|component| {
                let digits = component
                    .find(|c: char| !c.is_ascii_digit())
                    .map_or(component, |end| &component[..end]);

                digits.parse::<u64>().map_err(|_| VersionError::Component {
                    version: raw.to_owned(),
                    component: component.to_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: raw.to_owned(),
            parts,
        })
    }

    pub fn from_parts(parts: &[u64]) -> Self {
        let raw = parts
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(".");

        Self {
            raw,
            parts: parts.to_vec(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn parts(&self) -> &[u64] {
        &self.parts
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        (0..len)
            .map(|i| {
                let a = self.parts.get(i).copied().unwrap_or(0);
                let b = other.parts.get(i).copied().unwrap_or(0);
                a.cmp(&b)
            })
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}
