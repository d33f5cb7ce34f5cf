//! Helpers shared by the test suites.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::downlevel::downlevel_source;
use crate::syntax::tree::SourceTree;
use crate::syntax::parse;
use crate::version::TargetVersion;
use std::path::Path;

/// Parses a source string as a file called `test.d.ts`.
///
/// # Panics
///
/// Panics on parse errors; tests feed known-good input.
#[must_use]
pub fn parse_str(source: &str) -> SourceTree {
    parse(source, Path::new("test.d.ts")).expect("test source should parse")
}

/// Runs the whole single-file pipeline at the given target version string.
///
/// # Panics
///
/// Panics on parse errors, malformed versions, or broken invariants; tests
/// feed known-good input.
#[must_use]
pub fn downlevel_str(source: &str, target: &str) -> String {
    let target: TargetVersion = target.parse().expect("test version should parse");
    downlevel_source(source, Path::new("test.d.ts"), target)
        .expect("test source should downlevel")
}
