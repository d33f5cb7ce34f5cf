//! Shared constants and compiled patterns.

use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::OnceLock;

/// Configuration file name looked up at the source root.
pub const CONFIG_FILENAME: &str = ".dtsdown.toml";

/// Suffix identifying declaration files.
pub const DECLARATION_SUFFIX: &str = ".d.ts";

/// Prefix of triple-slash directive lines; the output deduper collapses
/// duplicate lines with this prefix at the top of a printed file.
pub const REFERENCE_DIRECTIVE_PREFIX: &str = "/// <reference ";

/// Regex validating target version strings: one to three dot-separated
/// numeric components, nothing else.
///
/// # Panics
///
/// Panics if the regex pattern is invalid.
pub fn get_version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| {
        Regex::new(r"^(\d+)(?:\.(\d+))?(?:\.(\d+))?$").expect("Invalid version regex pattern")
    })
}
pub use get_version_re as VERSION_RE;

/// Folder names never descended into when collecting declaration files.
pub fn get_default_exclude_folders() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        let mut s = FxHashSet::default();
        s.insert("node_modules");
        s.insert("bower_components");
        s.insert("jspm_packages");
        s.insert(".git");
        s
    })
}
pub use get_default_exclude_folders as DEFAULT_EXCLUDE_FOLDERS;

/// Names of utility types shipped with the compiler's standard library.
/// A reference to one of these only resolves to the library definition when
/// the referencing file neither declares nor imports the same name.
pub fn get_lib_utility_types() -> &'static FxHashSet<&'static str> {
    static SET: OnceLock<FxHashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| {
        let mut s = FxHashSet::default();
        s.insert("Partial");
        s.insert("Required");
        s.insert("Readonly");
        s.insert("Pick");
        s.insert("Record");
        s.insert("Exclude");
        s.insert("Extract");
        s.insert("Omit");
        s.insert("NonNullable");
        s.insert("ReturnType");
        s.insert("InstanceType");
        s
    })
}
pub use get_lib_utility_types as LIB_UTILITY_TYPES;
