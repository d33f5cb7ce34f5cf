//! Post-print cleanup of duplicated triple-slash directives.
//!
//! Several input files can contribute identical `/// <reference ... />`
//! lines to one printed output. Within the leading run of directive lines,
//! duplicates collapse to their first occurrence; everything from the first
//! ordinary line onward passes through untouched.

use crate::constants::REFERENCE_DIRECTIVE_PREFIX;
use rustc_hash::FxHashSet;

/// Removes duplicate directive lines from the top of one printed file.
#[must_use]
pub fn dedupe_references(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let boundary = lines
        .iter()
        .position(|line| !line.starts_with(REFERENCE_DIRECTIVE_PREFIX))
        .unwrap_or(lines.len());
    let mut seen = FxHashSet::default();
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    for &line in &lines[..boundary] {
        if seen.insert(line) {
            out.push(line);
        }
    }
    out.extend_from_slice(&lines[boundary..]);
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_directives_collapse() {
        let text = "/// <reference types=\"node\" />\n/// <reference types=\"node\" />\nexport {};\n";
        assert_eq!(
            dedupe_references(text),
            "/// <reference types=\"node\" />\nexport {};\n"
        );
    }

    #[test]
    fn test_order_and_distinct_lines_preserved() {
        let text = "/// <reference path=\"./a.d.ts\" />\n/// <reference types=\"node\" />\n/// <reference path=\"./a.d.ts\" />\nclass C {\n}\n";
        assert_eq!(
            dedupe_references(text),
            "/// <reference path=\"./a.d.ts\" />\n/// <reference types=\"node\" />\nclass C {\n}\n"
        );
    }

    #[test]
    fn test_directives_below_first_ordinary_line_are_untouched() {
        let text = "export {};\n/// <reference types=\"node\" />\n/// <reference types=\"node\" />\n";
        assert_eq!(dedupe_references(text), text);
    }

    #[test]
    fn test_no_directives_is_identity() {
        let text = "export declare const x: number;\n";
        assert_eq!(dedupe_references(text), text);
    }
}
