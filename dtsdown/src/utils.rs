//! Path helpers: declaration-file discovery and output mirroring.

use crate::constants::{DECLARATION_SUFFIX, DEFAULT_EXCLUDE_FOLDERS};
use std::path::{Path, PathBuf};

/// Checks if a folder name matches any exclusion entry.
#[must_use]
pub fn is_excluded(name: &str, excludes: &[String]) -> bool {
    excludes.iter().any(|ex| ex == name)
}

/// Collects every declaration file under `root`, skipping excluded and
/// gitignored directories. Returns the files in a stable sorted order so
/// runs are deterministic.
#[must_use]
pub fn collect_declaration_files(root: &Path, exclude: &[String]) -> Vec<PathBuf> {
    use ignore::WalkBuilder;

    // Merge user excludes with default excludes
    let default_excludes: Vec<String> = DEFAULT_EXCLUDE_FOLDERS()
        .iter()
        .map(|&s| s.to_owned())
        .collect();
    let excludes_for_filter: Vec<String> =
        exclude.iter().cloned().chain(default_excludes).collect();
    let root_for_filter = root.to_path_buf();

    // Use ignore crate's WalkBuilder for gitignore support.
    // filter_entry skips excluded directories at traversal time, preventing
    // descent into node_modules and friends.
    let walker = WalkBuilder::new(root)
        .hidden(false) // Don't skip hidden files (we handle that with defaults)
        .git_ignore(true) // Respect .gitignore files
        .git_global(true) // Respect global gitignore
        .git_exclude(true) // Respect .git/info/exclude
        .filter_entry(move |entry| {
            // Always allow the root directory
            if entry.path() == root_for_filter {
                return true;
            }

            // Only filter directories - files are filtered by suffix below
            if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                return true;
            }

            if let Some(name) = entry.file_name().to_str() {
                if is_excluded(name, &excludes_for_filter) {
                    return false;
                }
            }

            true
        })
        .build();

    let mut files: Vec<PathBuf> = walker
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(DECLARATION_SUFFIX))
        })
        .collect();
    files.sort();
    files
}

/// Maps an input file under `src_root` to its mirrored path under
/// `target_root`. Files outside the source root (which discovery never
/// yields) fall back to their bare file name.
#[must_use]
pub fn mirrored_path(src_root: &Path, file: &Path, target_root: &Path) -> PathBuf {
    let relative = file
        .strip_prefix(src_root)
        .ok()
        .map_or_else(|| PathBuf::from(file.file_name().unwrap_or_default()), Path::to_path_buf);
    target_root.join(relative)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::fs;

    #[test]
    fn test_collects_only_declaration_files_and_skips_node_modules() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::create_dir_all(dir.path().join("node_modules/dep")).unwrap();
        fs::write(dir.path().join("a.d.ts"), "export {};\n").unwrap();
        fs::write(dir.path().join("src/b.d.ts"), "export {};\n").unwrap();
        fs::write(dir.path().join("src/c.ts"), "export {};\n").unwrap();
        fs::write(dir.path().join("node_modules/dep/d.d.ts"), "export {};\n").unwrap();

        let files = collect_declaration_files(dir.path(), &[]);
        let names: Vec<String> = files
            .iter()
            .map(|f| {
                f.strip_prefix(dir.path())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        assert_eq!(names, vec!["a.d.ts", "src/b.d.ts"]);
    }

    #[test]
    fn test_user_excludes_are_honored() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("vendor")).unwrap();
        fs::write(dir.path().join("vendor/v.d.ts"), "export {};\n").unwrap();
        fs::write(dir.path().join("keep.d.ts"), "export {};\n").unwrap();

        let files = collect_declaration_files(dir.path(), &["vendor".to_owned()]);
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("keep.d.ts"));
    }

    #[test]
    fn test_mirrored_path_preserves_relative_structure() {
        let out = mirrored_path(
            Path::new("/in"),
            Path::new("/in/sub/x.d.ts"),
            Path::new("/out"),
        );
        assert_eq!(out, PathBuf::from("/out/sub/x.d.ts"));
    }
}
