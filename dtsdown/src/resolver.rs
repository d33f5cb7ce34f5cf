//! Narrow symbol resolution: does a type-reference name denote the
//! compiler's own standard library?
//!
//! The original question is "does this identifier's declaration live in the
//! library files shipped with the compiler?". Without a full checker the
//! equivalent observable answer is: the name is one of the known library
//! utility types AND the referencing file has no declaration or import of
//! its own for that name. A user-defined `Omit` therefore shadows the
//! library one and is never rewritten.

use crate::constants::LIB_UTILITY_TYPES;
use crate::syntax::tree::SourceTree;
use compact_str::CompactString;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::PathBuf;

/// Program-wide, read-only name tables built once per run.
#[derive(Debug, Default)]
pub struct SymbolResolver {
    /// Per file: every name bound by a declaration or import binding.
    bound: FxHashMap<PathBuf, FxHashSet<CompactString>>,
}

impl SymbolResolver {
    /// Builds the resolver over every parsed file of the run.
    #[must_use]
    pub fn build(trees: &[SourceTree]) -> Self {
        let mut bound = FxHashMap::default();
        for tree in trees {
            bound.insert(tree.file_name().to_path_buf(), tree.bound_names());
        }
        Self { bound }
    }

    /// Whether `name`, referenced from `tree`, resolves to the standard
    /// library rather than a user declaration. Unknown names resolve to
    /// "no", so callers treat them as "rule does not apply".
    #[must_use]
    pub fn is_lib_reference(&self, tree: &SourceTree, name: &str) -> bool {
        if !LIB_UTILITY_TYPES().contains(name) {
            return false;
        }
        !self
            .bound
            .get(tree.file_name())
            .is_some_and(|names| names.contains(name))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::syntax::parse;
    use std::path::Path;

    fn tree_of(src: &str) -> SourceTree {
        parse(src, Path::new("test.d.ts")).unwrap()
    }

    #[test]
    fn test_lib_omit_resolves_to_lib() {
        let tree = tree_of("export type F = Omit<E, 'a'>;\n");
        let resolver = SymbolResolver::build(std::slice::from_ref(&tree));
        assert!(resolver.is_lib_reference(&tree, "Omit"));
    }

    #[test]
    fn test_local_omit_shadows_lib() {
        let tree = tree_of("type Omit<T, K> = T;\nexport type F = Omit<E, 'a'>;\n");
        let resolver = SymbolResolver::build(std::slice::from_ref(&tree));
        assert!(!resolver.is_lib_reference(&tree, "Omit"));
    }

    #[test]
    fn test_imported_omit_shadows_lib() {
        let tree = tree_of("import { Omit } from \"./other\";\nexport type F = Omit<E, 'a'>;\n");
        let resolver = SymbolResolver::build(std::slice::from_ref(&tree));
        assert!(!resolver.is_lib_reference(&tree, "Omit"));
    }

    #[test]
    fn test_unknown_names_never_resolve_to_lib() {
        let tree = tree_of("export type F = Foo<E, 'a'>;\n");
        let resolver = SymbolResolver::build(std::slice::from_ref(&tree));
        assert!(!resolver.is_lib_reference(&tree, "Foo"));
    }
}
