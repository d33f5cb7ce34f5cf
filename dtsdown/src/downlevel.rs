//! The per-run driver: discover files, parse, rewrite, print, write.
//!
//! Each file's transformation is a pure function of its tree and the target
//! version; the only cross-file state is the read-only symbol tables built
//! once before rewriting starts. Files are processed one at a time in a
//! stable order.

use crate::config::Config;
use crate::dedup::dedupe_references;
use crate::output;
use crate::resolver::SymbolResolver;
use crate::rules::{RewriteContext, RuleSet};
use crate::syntax::{self, tree::SourceTree};
use crate::utils::{collect_declaration_files, mirrored_path};
use crate::version::{TargetVersion, VersionGate};
use crate::walker::TreeWalker;
use anyhow::{Context, Result};
use colored::Colorize;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One file the run could not process, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct FileError {
    /// The offending file.
    pub file: PathBuf,
    /// Human-readable reason.
    pub message: String,
}

/// Machine-readable result of one run.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    /// The target version the run downleveled to.
    pub target: TargetVersion,
    /// Declaration files found under the source root.
    pub files_discovered: usize,
    /// Files successfully rewritten and written out.
    pub files_written: usize,
    /// Files skipped because of parse errors or broken structural
    /// invariants.
    pub errors: Vec<FileError>,
    /// How often each rule fired across the run, by rule id.
    pub rule_fires: FxHashMap<&'static str, usize>,
}

/// The downlevel run driver. Options are stored here; one instance handles
/// one `run` invocation.
pub struct Downleveler {
    /// Target compiler version.
    pub target: TargetVersion,
    /// Folder names to skip during discovery (on top of the defaults).
    pub exclude_folders: Vec<String>,
    /// Whether to print each file as it is processed.
    pub verbose: bool,
}

impl Downleveler {
    /// Builds a driver from CLI options plus loaded configuration.
    #[must_use]
    pub fn new(target: TargetVersion, config: &Config, extra_excludes: Vec<String>) -> Self {
        let mut exclude_folders = config.dtsdown.exclude_folders.clone().unwrap_or_default();
        exclude_folders.extend(extra_excludes);
        Self {
            target,
            exclude_folders,
            verbose: false,
        }
    }

    /// Downlevels every declaration file under `src` into the mirrored
    /// layout under `dst`.
    pub fn run(&self, src: &Path, dst: &Path) -> Result<RunSummary> {
        let files = collect_declaration_files(src, &self.exclude_folders);
        let mut errors = Vec::new();

        // Parse everything first so symbol resolution sees the whole program.
        let mut trees: Vec<SourceTree> = Vec::with_capacity(files.len());
        for file in &files {
            let text = match fs::read_to_string(file) {
                Ok(text) => text,
                Err(err) => {
                    errors.push(FileError {
                        file: file.clone(),
                        message: err.to_string(),
                    });
                    continue;
                }
            };
            match syntax::parse(&text, file) {
                Ok(tree) => trees.push(tree),
                Err(err) => errors.push(FileError {
                    file: file.clone(),
                    message: err.to_string(),
                }),
            }
        }

        let resolver = SymbolResolver::build(&trees);
        let rules = RuleSet::standard();
        let walker = TreeWalker::new(&rules);
        let gate = VersionGate::new(self.target);

        let progress = output::create_progress_bar(u64::try_from(trees.len()).unwrap_or(u64::MAX));
        let mut rule_fires: FxHashMap<&'static str, usize> = FxHashMap::default();
        let mut files_written = 0usize;
        for tree in &mut trees {
            if self.verbose {
                println!("{}", tree.file_name().display().to_string().dimmed());
            }
            let ctx = RewriteContext {
                gate,
                resolver: &resolver,
            };
            let outcome = match walker.walk_file(tree, &ctx) {
                Ok(outcome) => outcome,
                Err(err) => {
                    // A broken structural invariant: abort this file rather
                    // than write invalid output, keep going with the rest.
                    errors.push(FileError {
                        file: tree.file_name().to_path_buf(),
                        message: err.to_string(),
                    });
                    progress.inc(1);
                    continue;
                }
            };
            for (&id, &count) in &outcome.fired {
                *rule_fires.entry(id).or_insert(0) += count;
            }
            tree.set_root(outcome.root);
            let printed = dedupe_references(&syntax::print(tree));

            let out_path = mirrored_path(src, tree.file_name(), dst);
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            fs::write(&out_path, printed)
                .with_context(|| format!("writing {}", out_path.display()))?;
            files_written += 1;
            progress.inc(1);
        }
        progress.finish_and_clear();

        Ok(RunSummary {
            target: self.target,
            files_discovered: files.len(),
            files_written,
            errors,
            rule_fires,
        })
    }
}

/// Downlevels a single source string. This is the whole per-file pipeline
/// (parse, rewrite, print, dedupe) without the file system around it.
pub fn downlevel_source(
    source: &str,
    file_name: &Path,
    target: TargetVersion,
) -> Result<String> {
    let mut tree = syntax::parse(source, file_name)?;
    let resolver = SymbolResolver::build(std::slice::from_ref(&tree));
    let rules = RuleSet::standard();
    let walker = TreeWalker::new(&rules);
    let ctx = RewriteContext {
        gate: VersionGate::new(target),
        resolver: &resolver,
    };
    let outcome = walker.walk_file(&mut tree, &ctx)?;
    tree.set_root(outcome.root);
    Ok(dedupe_references(&syntax::print(&tree)))
}
