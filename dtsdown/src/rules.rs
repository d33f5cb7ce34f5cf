//! The ordered set of version-gated rewrite rules.
//!
//! Each rule pairs a structural predicate with a transform that produces
//! zero, one, or many replacement nodes. Rules are stateless; the first rule
//! whose gate and predicate both pass wins, and predicates are kept disjoint
//! by node kind so declaration order never actually decides between two
//! candidates. Transform errors mean the upstream parser broke a structural
//! invariant and abort the current file.

use crate::resolver::SymbolResolver;
use crate::syntax::tree::{
    Accessibility, ExportSpecifier, ImportBindings, MemberName, Modifiers, NodeId, NodeKind,
    SourceTree,
};
use crate::trivia::{self, CommentBlock};
use crate::version::{TargetVersion, VersionGate};
use anyhow::{anyhow, bail, Result};
use compact_str::{CompactString, ToCompactString};
use smallvec::{smallvec, SmallVec};

/// Replacement nodes produced by a transform. Most transforms yield one
/// node; accessor removal yields none and namespace re-export lowering two.
pub type NodeList = SmallVec<[NodeId; 2]>;

/// Per-walk context handed to predicates and transforms. Nothing in here is
/// mutable: the walk is a pure tree-to-tree map.
pub struct RewriteContext<'a> {
    /// Gate for the run's target version.
    pub gate: VersionGate,
    /// Program-wide symbol tables.
    pub resolver: &'a SymbolResolver,
}

/// One rewrite rule.
pub struct Rule {
    /// Stable identifier, used for run statistics.
    pub id: &'static str,
    /// The rule fires only when the target version is below this.
    pub min_version: TargetVersion,
    /// Structural predicate deciding whether the rule applies to a node.
    pub predicate: fn(&SourceTree, NodeId, &RewriteContext) -> bool,
    /// Produces the replacement nodes. New nodes are allocated into the same
    /// arena; the originals are never mutated.
    pub transform: fn(&mut SourceTree, NodeId, &RewriteContext) -> Result<NodeList>,
}

/// The ordered rule collection.
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// The standard downlevel rules in their fixed priority order.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            rules: vec![
                Rule {
                    id: "accessor-get",
                    min_version: TargetVersion::new(3, 6, 0),
                    predicate: is_get_accessor,
                    transform: lower_get_accessor,
                },
                Rule {
                    id: "accessor-set",
                    min_version: TargetVersion::new(3, 6, 0),
                    predicate: is_set_accessor,
                    transform: lower_set_accessor,
                },
                Rule {
                    id: "private-field",
                    min_version: TargetVersion::new(3, 8, 0),
                    predicate: is_private_marker,
                    transform: desugar_private_field,
                },
                Rule {
                    id: "namespace-reexport",
                    min_version: TargetVersion::new(3, 8, 0),
                    predicate: is_namespace_reexport,
                    transform: lower_namespace_reexport,
                },
                Rule {
                    id: "type-only-import",
                    min_version: TargetVersion::new(3, 8, 0),
                    predicate: is_type_only_import,
                    transform: strip_type_only_import,
                },
                Rule {
                    id: "type-only-export",
                    min_version: TargetVersion::new(3, 8, 0),
                    predicate: is_type_only_export,
                    transform: strip_type_only_export,
                },
                Rule {
                    id: "utility-type",
                    min_version: TargetVersion::new(3, 5, 0),
                    predicate: is_lib_omit_reference,
                    transform: expand_omit,
                },
                Rule {
                    id: "named-tuple",
                    min_version: TargetVersion::new(4, 0, 0),
                    predicate: is_named_tuple_member,
                    transform: lower_named_tuple_member,
                },
                Rule {
                    id: "asserts-return",
                    min_version: TargetVersion::new(3, 7, 0),
                    predicate: has_asserts_return,
                    transform: erase_asserts_return,
                },
            ],
        }
    }

    /// The rules in declared order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// First rule whose version gate and predicate both pass for `id`.
    #[must_use]
    pub fn first_match(
        &self,
        tree: &SourceTree,
        id: NodeId,
        ctx: &RewriteContext,
    ) -> Option<&Rule> {
        self.rules
            .iter()
            .find(|rule| ctx.gate.applies(rule.min_version) && (rule.predicate)(tree, id, ctx))
    }
}

fn is_get_accessor(tree: &SourceTree, id: NodeId, _ctx: &RewriteContext) -> bool {
    matches!(tree.kind(id), NodeKind::GetAccessor { .. })
}

fn is_set_accessor(tree: &SourceTree, id: NodeId, _ctx: &RewriteContext) -> bool {
    matches!(tree.kind(id), NodeKind::SetAccessor { .. })
}

fn is_private_marker(tree: &SourceTree, id: NodeId, _ctx: &RewriteContext) -> bool {
    matches!(
        tree.kind(id),
        NodeKind::PropertyDecl {
            name: MemberName::Private(p),
            ..
        } if p == "#private"
    )
}

fn is_namespace_reexport(tree: &SourceTree, id: NodeId, _ctx: &RewriteContext) -> bool {
    matches!(tree.kind(id), NodeKind::ExportStarAs { .. })
}

fn is_type_only_import(tree: &SourceTree, id: NodeId, _ctx: &RewriteContext) -> bool {
    matches!(tree.kind(id), NodeKind::ImportDecl { type_only: true, .. })
}

fn is_type_only_export(tree: &SourceTree, id: NodeId, _ctx: &RewriteContext) -> bool {
    matches!(tree.kind(id), NodeKind::ExportNamed { type_only: true, .. })
}

/// `Omit` with exactly two type arguments, resolving to the compiler's own
/// library definition rather than a same-named user type.
fn is_lib_omit_reference(tree: &SourceTree, id: NodeId, ctx: &RewriteContext) -> bool {
    match tree.kind(id) {
        NodeKind::TypeRef { name, args } => {
            name == "Omit" && args.len() == 2 && ctx.resolver.is_lib_reference(tree, name)
        }
        _ => false,
    }
}

fn is_named_tuple_member(tree: &SourceTree, id: NodeId, _ctx: &RewriteContext) -> bool {
    matches!(tree.kind(id), NodeKind::NamedTupleMember { .. })
}

/// Which accessor kind a sibling lookup is searching for.
#[derive(Clone, Copy, PartialEq, Eq)]
enum AccessorKind {
    Get,
    Set,
}

/// The class body an accessor lives in. Anything else is an upstream parser
/// contract violation.
fn accessor_class(tree: &SourceTree, id: NodeId) -> Result<NodeId> {
    tree.parent(id)
        .filter(|&p| matches!(tree.kind(p), NodeKind::ClassDecl { .. }))
        .ok_or_else(|| anyhow!("accessor outside a class body; the parser broke its contract"))
}

/// Finds the sibling accessor of the other kind with the same member name
/// (exact text match) in the same class body.
fn find_sibling_accessor(
    tree: &SourceTree,
    class: NodeId,
    name: &str,
    which: AccessorKind,
) -> Option<NodeId> {
    let NodeKind::ClassDecl { members, .. } = tree.kind(class) else {
        return None;
    };
    members.iter().copied().find(|&m| match tree.kind(m) {
        NodeKind::GetAccessor { name: n, .. } => {
            which == AccessorKind::Get && n.text() == name
        }
        NodeKind::SetAccessor { name: n, .. } => {
            which == AccessorKind::Set && n.text() == name
        }
        _ => false,
    })
}

fn any_type(tree: &mut SourceTree) -> NodeId {
    tree.alloc(
        NodeKind::KeywordType {
            name: CompactString::const_new("any"),
        },
        Vec::new(),
    )
}

/// `get p(): T` becomes a plain property `p: T`. With no sibling setter the
/// property is additionally `readonly`; with one, the setter's rule emits
/// nothing and this single property stands in for the pair. Comments from
/// both accessors merge onto the property.
fn lower_get_accessor(
    tree: &mut SourceTree,
    id: NodeId,
    _ctx: &RewriteContext,
) -> Result<NodeList> {
    let NodeKind::GetAccessor {
        name,
        mut modifiers,
        return_ty,
    } = tree.kind(id).clone()
    else {
        bail!("accessor-get fired on a non-accessor node");
    };
    let class = accessor_class(tree, id)?;
    let setter = find_sibling_accessor(tree, class, name.text(), AccessorKind::Set);
    if setter.is_none() {
        modifiers.is_readonly = true;
    }
    let ty = match return_ty {
        Some(t) => t,
        None => any_type(tree),
    };
    let mut sources = vec![id];
    sources.extend(setter);
    let block = trivia::merge(tree, &sources);
    let prop = tree.alloc(
        NodeKind::PropertyDecl {
            name,
            modifiers,
            optional: false,
            ty: Some(ty),
        },
        Vec::new(),
    );
    Ok(smallvec![trivia::attach(tree, &block, prop)])
}

/// `set p(v: T)` vanishes when a matching getter exists (the getter's rule
/// already produced the merged property) and otherwise becomes a writable
/// property typed by the setter's sole parameter.
fn lower_set_accessor(
    tree: &mut SourceTree,
    id: NodeId,
    _ctx: &RewriteContext,
) -> Result<NodeList> {
    let NodeKind::SetAccessor {
        name,
        modifiers,
        params,
    } = tree.kind(id).clone()
    else {
        bail!("accessor-set fired on a non-accessor node");
    };
    let class = accessor_class(tree, id)?;
    if find_sibling_accessor(tree, class, name.text(), AccessorKind::Get).is_some() {
        return Ok(SmallVec::new());
    }
    let param = params.first().copied().ok_or_else(|| {
        anyhow!(
            "set accessor `{}` has no parameter; the parser broke its contract",
            name.text()
        )
    })?;
    let NodeKind::Param { ty, .. } = tree.kind(param).clone() else {
        bail!("set accessor parameter is not a parameter node");
    };
    let ty = match ty {
        Some(t) => t,
        None => any_type(tree),
    };
    let block = trivia::merge(tree, &[id]);
    let prop = tree.alloc(
        NodeKind::PropertyDecl {
            name,
            modifiers,
            optional: false,
            ty: Some(ty),
        },
        Vec::new(),
    );
    Ok(smallvec![trivia::attach(tree, &block, prop)])
}

/// The opaque `#private` marker becomes `private "<ClassName>.#private";`.
/// Namespacing by class name keeps a derived class's own marker from
/// colliding with its base's.
fn desugar_private_field(
    tree: &mut SourceTree,
    id: NodeId,
    _ctx: &RewriteContext,
) -> Result<NodeList> {
    let class = tree
        .parent(id)
        .filter(|&p| matches!(tree.kind(p), NodeKind::ClassDecl { .. }))
        .ok_or_else(|| {
            anyhow!("private field outside a class body; the parser broke its contract")
        })?;
    let class_name = match tree.kind(class) {
        NodeKind::ClassDecl { name: Some(n), .. } => n.as_str().to_owned(),
        _ => "(anonymous)".to_owned(),
    };
    let literal = format!("\"{class_name}.#private\"");
    let modifiers = Modifiers {
        accessibility: Some(Accessibility::Private),
        ..Modifiers::default()
    };
    let leading = tree.leading(id).to_vec();
    let prop = tree.alloc(
        NodeKind::PropertyDecl {
            name: MemberName::StringLit(literal.to_compact_string()),
            modifiers,
            optional: false,
            ty: None,
        },
        leading,
    );
    Ok(smallvec![prop])
}

/// `export * as ns from "m";` has no single-statement equivalent in the old
/// grammar; it becomes a uniquely named namespace import followed by a named
/// re-export of that alias. Comments move to the export statement.
fn lower_namespace_reexport(
    tree: &mut SourceTree,
    id: NodeId,
    _ctx: &RewriteContext,
) -> Result<NodeList> {
    let NodeKind::ExportStarAs { name, module } = tree.kind(id).clone() else {
        bail!("namespace-reexport fired on a non-export node");
    };
    let unique = unique_name(tree, &name);
    let import = tree.alloc(
        NodeKind::ImportDecl {
            type_only: false,
            default_name: None,
            bindings: Some(ImportBindings::Namespace(unique.clone())),
            module,
        },
        Vec::new(),
    );
    let block = trivia::merge(tree, &[id]);
    let export = tree.alloc(
        NodeKind::ExportNamed {
            type_only: false,
            specifiers: vec![ExportSpecifier {
                name: unique,
                alias: Some(name),
            }],
            module: None,
        },
        Vec::new(),
    );
    let export = trivia::attach(tree, &block, export);
    Ok(smallvec![import, export])
}

/// Smallest `<base>_<n>` not bound anywhere in the file.
fn unique_name(tree: &SourceTree, base: &str) -> CompactString {
    let used = tree.bound_names();
    let mut n = 1u32;
    loop {
        let candidate = format!("{base}_{n}");
        if !used.contains(candidate.as_str()) {
            return candidate.to_compact_string();
        }
        n += 1;
    }
}

/// `import type ...` minus the qualifier; bindings and specifier unchanged.
fn strip_type_only_import(
    tree: &mut SourceTree,
    id: NodeId,
    _ctx: &RewriteContext,
) -> Result<NodeList> {
    let NodeKind::ImportDecl {
        default_name,
        bindings,
        module,
        ..
    } = tree.kind(id).clone()
    else {
        bail!("type-only-import fired on a non-import node");
    };
    let leading = tree.leading(id).to_vec();
    Ok(smallvec![tree.alloc(
        NodeKind::ImportDecl {
            type_only: false,
            default_name,
            bindings,
            module,
        },
        leading,
    )])
}

/// `export type { ... }` minus the qualifier.
fn strip_type_only_export(
    tree: &mut SourceTree,
    id: NodeId,
    _ctx: &RewriteContext,
) -> Result<NodeList> {
    let NodeKind::ExportNamed {
        specifiers, module, ..
    } = tree.kind(id).clone()
    else {
        bail!("type-only-export fired on a non-export node");
    };
    let leading = tree.leading(id).to_vec();
    Ok(smallvec![tree.alloc(
        NodeKind::ExportNamed {
            type_only: false,
            specifiers,
            module,
        },
        leading,
    )])
}

/// Library `Omit<T, K>` becomes the `Pick<T, Exclude<keyof T, K>>` expansion
/// older library versions already understand. The predicate has verified the
/// reference resolves to the library, not a user type.
fn expand_omit(tree: &mut SourceTree, id: NodeId, _ctx: &RewriteContext) -> Result<NodeList> {
    let NodeKind::TypeRef { args, .. } = tree.kind(id).clone() else {
        bail!("utility-type fired on a non-reference node");
    };
    let (t, k) = (args[0], args[1]);
    let keyof = tree.alloc(
        NodeKind::TypeOperator {
            op: crate::syntax::tree::TypeOp::KeyOf,
            ty: t,
        },
        Vec::new(),
    );
    let exclude = tree.alloc(
        NodeKind::TypeRef {
            name: CompactString::const_new("Exclude"),
            args: vec![keyof, k],
        },
        Vec::new(),
    );
    let leading = tree.leading(id).to_vec();
    let pick = tree.alloc(
        NodeKind::TypeRef {
            name: CompactString::const_new("Pick"),
            args: vec![t, exclude],
        },
        leading,
    );
    Ok(smallvec![pick])
}

/// A labeled tuple member becomes its bare type (rest labels unwrap into the
/// plain rest form) with the label preserved as an inline comment so the
/// hint survives as documentation.
fn lower_named_tuple_member(
    tree: &mut SourceTree,
    id: NodeId,
    _ctx: &RewriteContext,
) -> Result<NodeList> {
    let NodeKind::NamedTupleMember {
        label,
        rest,
        optional,
        ty,
    } = tree.kind(id).clone()
    else {
        bail!("named-tuple fired on a non-tuple-member node");
    };
    let inner = if rest {
        tree.alloc(NodeKind::RestType { ty }, Vec::new())
    } else if optional {
        tree.alloc(NodeKind::OptionalType { ty }, Vec::new())
    } else {
        ty
    };
    let replaced = trivia::attach(tree, &CommentBlock::inline(&label), inner);
    let original = tree.leading(id).to_vec();
    if !original.is_empty() {
        let mut all = original;
        all.extend(tree.leading(replaced).to_vec());
        tree.set_leading(replaced, all);
    }
    Ok(smallvec![replaced])
}

fn asserts_return_of(tree: &SourceTree, id: NodeId) -> Option<NodeId> {
    let ret = match tree.kind(id) {
        NodeKind::FunctionDecl { return_ty, .. }
        | NodeKind::MethodDecl { return_ty, .. }
        | NodeKind::CallSignature { return_ty, .. } => (*return_ty)?,
        NodeKind::FunctionType { return_ty, .. } => *return_ty,
        _ => return None,
    };
    matches!(tree.kind(ret), NodeKind::TypePredicate { asserts: true, .. }).then_some(ret)
}

fn has_asserts_return(tree: &SourceTree, id: NodeId, _ctx: &RewriteContext) -> bool {
    asserts_return_of(tree, id).is_some()
}

/// An `asserts` predicate return type downgrades to `void`: declaration
/// files never execute, so only the signature shape must stay legal.
fn erase_asserts_return(
    tree: &mut SourceTree,
    id: NodeId,
    _ctx: &RewriteContext,
) -> Result<NodeList> {
    let void_ty = tree.alloc(
        NodeKind::KeywordType {
            name: CompactString::const_new("void"),
        },
        Vec::new(),
    );
    let leading = tree.leading(id).to_vec();
    let replaced = match tree.kind(id).clone() {
        NodeKind::FunctionDecl {
            name,
            modifiers,
            type_params,
            params,
            ..
        } => tree.alloc(
            NodeKind::FunctionDecl {
                name,
                modifiers,
                type_params,
                params,
                return_ty: Some(void_ty),
            },
            leading,
        ),
        NodeKind::MethodDecl {
            name,
            modifiers,
            optional,
            type_params,
            params,
            ..
        } => tree.alloc(
            NodeKind::MethodDecl {
                name,
                modifiers,
                optional,
                type_params,
                params,
                return_ty: Some(void_ty),
            },
            leading,
        ),
        NodeKind::CallSignature {
            type_params, params, ..
        } => tree.alloc(
            NodeKind::CallSignature {
                type_params,
                params,
                return_ty: Some(void_ty),
            },
            leading,
        ),
        NodeKind::FunctionType {
            type_params, params, ..
        } => tree.alloc(
            NodeKind::FunctionType {
                type_params,
                params,
                return_ty: void_ty,
            },
            leading,
        ),
        _ => bail!("asserts-return fired on a non-function node"),
    };
    Ok(smallvec![replaced])
}
