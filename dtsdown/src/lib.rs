//! Core library for the `dtsdown` declaration downleveler.
//!
//! The tool rewrites TypeScript declaration (`.d.ts`) syntax so the output
//! is accepted by older compiler versions: a version gate decides which
//! rewrite rules fire, a single top-down tree walk applies them, and the
//! printer plus a directive deduper turn the rewritten tree back into text.

// Allow common complexity warnings - these are intentional design choices
#![allow(clippy::type_complexity, clippy::items_after_statements)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

/// Module defining the command-line interface arguments.
pub mod cli;

/// Module containing shared constants and compiled patterns.
pub mod constants;

/// Module for loading configuration.
pub mod config;

/// Module removing duplicated triple-slash directives from printed output.
pub mod dedup;

/// Module containing the run driver: discovery, parsing, rewriting, output.
pub mod downlevel;

/// Module defining the shared entry point used by the binaries.
pub mod entry_point;

/// Module for rich CLI output formatting with colored text.
pub mod output;

/// Module answering the narrow "is this name the compiler's own library
/// type?" resolution question.
pub mod resolver;

/// Module containing the ordered, version-gated rewrite rules.
pub mod rules;

/// Module containing the declaration-file front end (tree, parser, printer).
pub mod syntax;

/// Module containing test utilities.
pub mod test_utils;

/// Module preserving comments across rewrites.
pub mod trivia;

/// Module containing path helpers (discovery, output mirroring).
pub mod utils;

/// Module defining target versions and the version gate.
pub mod version;

/// Module containing the tree-walking rule dispatcher.
pub mod walker;
