//! Single top-down rewrite pass over one file's tree.
//!
//! At every node the walker asks the rule set for the first applicable rule.
//! If one fires, its output replaces the node and the walker does not
//! descend into the replacement (transforms produce final-form nodes). If
//! none fires, the node is recreated with each child replaced by the walked
//! result, splicing lists where one node became several or none.

use crate::rules::{NodeList, RewriteContext, RuleSet};
use crate::syntax::tree::{NodeId, NodeKind, SourceTree};
use anyhow::{bail, Result};
use rustc_hash::FxHashMap;
use smallvec::smallvec;

/// Result of walking one file: the new root plus per-rule firing counts for
/// the run summary.
#[derive(Debug)]
pub struct WalkOutcome {
    /// Root of the rewritten tree (always exactly one node).
    pub root: NodeId,
    /// How often each rule fired, by rule id.
    pub fired: FxHashMap<&'static str, usize>,
}

/// The tree-walking dispatcher.
pub struct TreeWalker<'a> {
    rules: &'a RuleSet,
}

impl<'a> TreeWalker<'a> {
    /// Builds a walker over the given rule set.
    #[must_use]
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Rewrites a whole file. The file node itself is never deleted, so the
    /// walk of the root must come back as exactly one node.
    pub fn walk_file(
        &self,
        tree: &mut SourceTree,
        ctx: &RewriteContext<'_>,
    ) -> Result<WalkOutcome> {
        let mut fired = FxHashMap::default();
        let root = tree.root();
        let result = self.walk(tree, root, ctx, &mut fired)?;
        if result.len() != 1 {
            bail!("walking a file root produced {} nodes, expected 1", result.len());
        }
        Ok(WalkOutcome {
            root: result[0],
            fired,
        })
    }

    fn walk(
        &self,
        tree: &mut SourceTree,
        id: NodeId,
        ctx: &RewriteContext<'_>,
        fired: &mut FxHashMap<&'static str, usize>,
    ) -> Result<NodeList> {
        if let Some(rule) = self.rules.first_match(tree, id, ctx) {
            let (rule_id, transform) = (rule.id, rule.transform);
            *fired.entry(rule_id).or_insert(0) += 1;
            return transform(tree, id, ctx);
        }
        let rebuilt = self.rebuild(tree, id, ctx, fired)?;
        let leading = tree.leading(id).to_vec();
        Ok(smallvec![tree.alloc(rebuilt, leading)])
    }

    /// Walks a list position, splicing however many nodes each child became.
    fn walk_list(
        &self,
        tree: &mut SourceTree,
        ids: &[NodeId],
        ctx: &RewriteContext<'_>,
        fired: &mut FxHashMap<&'static str, usize>,
    ) -> Result<Vec<NodeId>> {
        let mut out = Vec::with_capacity(ids.len());
        for &id in ids {
            out.extend(self.walk(tree, id, ctx, fired)?);
        }
        Ok(out)
    }

    /// Walks a position that must stay exactly one node.
    fn walk_one(
        &self,
        tree: &mut SourceTree,
        id: NodeId,
        ctx: &RewriteContext<'_>,
        fired: &mut FxHashMap<&'static str, usize>,
    ) -> Result<NodeId> {
        let result = self.walk(tree, id, ctx, fired)?;
        if result.len() != 1 {
            bail!(
                "a rewrite produced {} nodes at a position that holds exactly one",
                result.len()
            );
        }
        Ok(result[0])
    }

    fn walk_opt(
        &self,
        tree: &mut SourceTree,
        id: Option<NodeId>,
        ctx: &RewriteContext<'_>,
        fired: &mut FxHashMap<&'static str, usize>,
    ) -> Result<Option<NodeId>> {
        match id {
            Some(id) => Ok(Some(self.walk_one(tree, id, ctx, fired)?)),
            None => Ok(None),
        }
    }

    /// Recreates an unmatched node's payload with walked children, keeping
    /// kind, names, and modifiers as they were.
    #[allow(clippy::too_many_lines)]
    fn rebuild(
        &self,
        tree: &mut SourceTree,
        id: NodeId,
        ctx: &RewriteContext<'_>,
        fired: &mut FxHashMap<&'static str, usize>,
    ) -> Result<NodeKind> {
        let kind = tree.kind(id).clone();
        Ok(match kind {
            NodeKind::SourceFile {
                statements,
                trailing,
            } => NodeKind::SourceFile {
                statements: self.walk_list(tree, &statements, ctx, fired)?,
                trailing,
            },
            NodeKind::ClassDecl {
                name,
                modifiers,
                type_params,
                extends,
                implements,
                members,
            } => NodeKind::ClassDecl {
                name,
                modifiers,
                type_params: self.walk_list(tree, &type_params, ctx, fired)?,
                extends: self.walk_opt(tree, extends, ctx, fired)?,
                implements: self.walk_list(tree, &implements, ctx, fired)?,
                members: self.walk_list(tree, &members, ctx, fired)?,
            },
            NodeKind::InterfaceDecl {
                name,
                modifiers,
                type_params,
                extends,
                members,
            } => NodeKind::InterfaceDecl {
                name,
                modifiers,
                type_params: self.walk_list(tree, &type_params, ctx, fired)?,
                extends: self.walk_list(tree, &extends, ctx, fired)?,
                members: self.walk_list(tree, &members, ctx, fired)?,
            },
            NodeKind::TypeAliasDecl {
                name,
                modifiers,
                type_params,
                ty,
            } => NodeKind::TypeAliasDecl {
                name,
                modifiers,
                type_params: self.walk_list(tree, &type_params, ctx, fired)?,
                ty: self.walk_one(tree, ty, ctx, fired)?,
            },
            NodeKind::FunctionDecl {
                name,
                modifiers,
                type_params,
                params,
                return_ty,
            } => NodeKind::FunctionDecl {
                name,
                modifiers,
                type_params: self.walk_list(tree, &type_params, ctx, fired)?,
                params: self.walk_list(tree, &params, ctx, fired)?,
                return_ty: self.walk_opt(tree, return_ty, ctx, fired)?,
            },
            NodeKind::VariableDecl {
                modifiers,
                keyword,
                name,
                ty,
            } => NodeKind::VariableDecl {
                modifiers,
                keyword,
                name,
                ty: self.walk_opt(tree, ty, ctx, fired)?,
            },
            NodeKind::ModuleDecl {
                name,
                modifiers,
                keyword,
                body,
            } => NodeKind::ModuleDecl {
                name,
                modifiers,
                keyword,
                body: self.walk_list(tree, &body, ctx, fired)?,
            },
            NodeKind::PropertyDecl {
                name,
                modifiers,
                optional,
                ty,
            } => NodeKind::PropertyDecl {
                name,
                modifiers,
                optional,
                ty: self.walk_opt(tree, ty, ctx, fired)?,
            },
            NodeKind::GetAccessor {
                name,
                modifiers,
                return_ty,
            } => NodeKind::GetAccessor {
                name,
                modifiers,
                return_ty: self.walk_opt(tree, return_ty, ctx, fired)?,
            },
            NodeKind::SetAccessor {
                name,
                modifiers,
                params,
            } => NodeKind::SetAccessor {
                name,
                modifiers,
                params: self.walk_list(tree, &params, ctx, fired)?,
            },
            NodeKind::MethodDecl {
                name,
                modifiers,
                optional,
                type_params,
                params,
                return_ty,
            } => NodeKind::MethodDecl {
                name,
                modifiers,
                optional,
                type_params: self.walk_list(tree, &type_params, ctx, fired)?,
                params: self.walk_list(tree, &params, ctx, fired)?,
                return_ty: self.walk_opt(tree, return_ty, ctx, fired)?,
            },
            NodeKind::ConstructorDecl { modifiers, params } => NodeKind::ConstructorDecl {
                modifiers,
                params: self.walk_list(tree, &params, ctx, fired)?,
            },
            NodeKind::IndexSignature {
                modifiers,
                param,
                ty,
            } => NodeKind::IndexSignature {
                modifiers,
                param: self.walk_one(tree, param, ctx, fired)?,
                ty: self.walk_one(tree, ty, ctx, fired)?,
            },
            NodeKind::CallSignature {
                type_params,
                params,
                return_ty,
            } => NodeKind::CallSignature {
                type_params: self.walk_list(tree, &type_params, ctx, fired)?,
                params: self.walk_list(tree, &params, ctx, fired)?,
                return_ty: self.walk_opt(tree, return_ty, ctx, fired)?,
            },
            NodeKind::Param {
                name,
                rest,
                optional,
                ty,
            } => NodeKind::Param {
                name,
                rest,
                optional,
                ty: self.walk_opt(tree, ty, ctx, fired)?,
            },
            NodeKind::TypeParam {
                name,
                constraint,
                default,
            } => NodeKind::TypeParam {
                name,
                constraint: self.walk_opt(tree, constraint, ctx, fired)?,
                default: self.walk_opt(tree, default, ctx, fired)?,
            },
            NodeKind::TypeRef { name, args } => NodeKind::TypeRef {
                name,
                args: self.walk_list(tree, &args, ctx, fired)?,
            },
            NodeKind::UnionType { members } => NodeKind::UnionType {
                members: self.walk_list(tree, &members, ctx, fired)?,
            },
            NodeKind::IntersectionType { members } => NodeKind::IntersectionType {
                members: self.walk_list(tree, &members, ctx, fired)?,
            },
            NodeKind::TypeLiteral { members } => NodeKind::TypeLiteral {
                members: self.walk_list(tree, &members, ctx, fired)?,
            },
            NodeKind::ArrayType { elem } => NodeKind::ArrayType {
                elem: self.walk_one(tree, elem, ctx, fired)?,
            },
            NodeKind::TupleType { elements } => NodeKind::TupleType {
                elements: self.walk_list(tree, &elements, ctx, fired)?,
            },
            NodeKind::NamedTupleMember {
                label,
                rest,
                optional,
                ty,
            } => NodeKind::NamedTupleMember {
                label,
                rest,
                optional,
                ty: self.walk_one(tree, ty, ctx, fired)?,
            },
            NodeKind::RestType { ty } => NodeKind::RestType {
                ty: self.walk_one(tree, ty, ctx, fired)?,
            },
            NodeKind::OptionalType { ty } => NodeKind::OptionalType {
                ty: self.walk_one(tree, ty, ctx, fired)?,
            },
            NodeKind::TypeOperator { op, ty } => NodeKind::TypeOperator {
                op,
                ty: self.walk_one(tree, ty, ctx, fired)?,
            },
            NodeKind::ParenType { ty } => NodeKind::ParenType {
                ty: self.walk_one(tree, ty, ctx, fired)?,
            },
            NodeKind::FunctionType {
                type_params,
                params,
                return_ty,
            } => NodeKind::FunctionType {
                type_params: self.walk_list(tree, &type_params, ctx, fired)?,
                params: self.walk_list(tree, &params, ctx, fired)?,
                return_ty: self.walk_one(tree, return_ty, ctx, fired)?,
            },
            NodeKind::TypePredicate {
                asserts,
                param,
                ty,
            } => NodeKind::TypePredicate {
                asserts,
                param,
                ty: self.walk_opt(tree, ty, ctx, fired)?,
            },
            NodeKind::IndexedAccessType { obj, index } => NodeKind::IndexedAccessType {
                obj: self.walk_one(tree, obj, ctx, fired)?,
                index: self.walk_one(tree, index, ctx, fired)?,
            },
            leaf @ (NodeKind::ImportDecl { .. }
            | NodeKind::ExportNamed { .. }
            | NodeKind::ExportStar { .. }
            | NodeKind::ExportStarAs { .. }
            | NodeKind::EnumDecl { .. }
            | NodeKind::KeywordType { .. }
            | NodeKind::LiteralType { .. }
            | NodeKind::TypeQuery { .. }) => leaf,
        })
    }
}
