//! Target compiler versions and the gate that decides whether a rule fires.

use crate::constants::VERSION_RE;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A three-component compiler version, ordered by semantic-version
/// precedence (major, then minor, then patch). Pre-release qualifiers are
/// out of scope; parsing coerces them away by rejecting them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetVersion {
    /// Major component.
    pub major: u32,
    /// Minor component.
    pub minor: u32,
    /// Patch component.
    pub patch: u32,
}

impl TargetVersion {
    /// The oldest compiler baseline the tool downlevels to by default.
    pub const BASELINE: Self = Self::new(3, 4, 0);

    /// Builds a version from its components.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl serde::Serialize for TargetVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl fmt::Display for TargetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Error for malformed version strings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid target version `{0}` (expected e.g. \"3.4\" or \"3.6.1\")")]
pub struct VersionError(pub String);

impl FromStr for TargetVersion {
    type Err = VersionError;

    /// Accepts `"3"`, `"3.4"`, or `"3.4.1"`; missing components default to
    /// zero. Anything else is rejected rather than silently coerced.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = VERSION_RE()
            .captures(s.trim())
            .ok_or_else(|| VersionError(s.to_owned()))?;
        let component = |i: usize| -> u32 {
            caps.get(i)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0)
        };
        Ok(Self::new(component(1), component(2), component(3)))
    }
}

/// Wraps the run's target version and answers whether a rule gated at some
/// minimum version applies.
#[derive(Debug, Clone, Copy)]
pub struct VersionGate {
    target: TargetVersion,
}

impl VersionGate {
    /// Builds a gate for the given target.
    #[must_use]
    pub const fn new(target: TargetVersion) -> Self {
        Self { target }
    }

    /// The wrapped target version.
    #[must_use]
    pub const fn target(&self) -> TargetVersion {
        self.target
    }

    /// True iff the target predates the rule's minimum version, i.e. the
    /// construct the rule recognizes does not exist yet and must be lowered.
    #[must_use]
    pub fn applies(&self, rule_min: TargetVersion) -> bool {
        self.target < rule_min
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_ordering_is_semver_precedence() {
        assert!(TargetVersion::new(3, 4, 0) < TargetVersion::new(3, 5, 0));
        assert!(TargetVersion::new(3, 10, 0) > TargetVersion::new(3, 9, 9));
        assert!(TargetVersion::new(4, 0, 0) > TargetVersion::new(3, 9, 0));
        assert!(TargetVersion::new(3, 6, 1) > TargetVersion::new(3, 6, 0));
    }

    #[test]
    fn test_parse_accepts_partial_versions() {
        assert_eq!("3".parse::<TargetVersion>().unwrap(), TargetVersion::new(3, 0, 0));
        assert_eq!("3.4".parse::<TargetVersion>().unwrap(), TargetVersion::new(3, 4, 0));
        assert_eq!(
            "3.6.1".parse::<TargetVersion>().unwrap(),
            TargetVersion::new(3, 6, 1)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<TargetVersion>().is_err());
        assert!("three".parse::<TargetVersion>().is_err());
        assert!("3.4-beta".parse::<TargetVersion>().is_err());
        assert!("3..4".parse::<TargetVersion>().is_err());
    }

    #[test]
    fn test_gate_is_strict_less_than() {
        let gate = VersionGate::new(TargetVersion::new(3, 6, 0));
        assert!(gate.applies(TargetVersion::new(3, 7, 0)));
        assert!(!gate.applies(TargetVersion::new(3, 6, 0)));
        assert!(!gate.applies(TargetVersion::new(3, 5, 0)));
    }
}
