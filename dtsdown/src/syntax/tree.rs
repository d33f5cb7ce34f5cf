//! Arena-based syntax tree for declaration files.
//!
//! The tree is an arena of [`Node`]s indexed by [`NodeId`]. Every node stores
//! its kind payload, a back-reference to its parent, and a list of leading
//! comments. Rewrite rules never mutate existing nodes; they allocate new
//! ones into the same arena and splice the new ids into a rebuilt parent.

use compact_str::CompactString;
use std::path::{Path, PathBuf};

/// Index of a node inside a [`SourceTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Raw arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Comment delimiter style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `// ...` (including `/// ...` directives).
    Line,
    /// `/* ... */` (including `/** ... */` doc comments).
    Block,
}

/// A single comment attached to a node.
///
/// `text` is the full comment text including delimiters. Comments lifted from
/// source keep their original text so untouched nodes reprint byte-for-byte;
/// comments synthesized by trivia merging carry normalized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Delimiter style.
    pub style: CommentStyle,
    /// Full comment text, delimiters included.
    pub text: String,
    /// Whether the comment was followed by a line break in the source.
    /// Inline comments (`/*label*/ type`) carry `false`.
    pub trailing_newline: bool,
}

/// Accessibility modifier on a class member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessibility {
    /// `public`
    Public,
    /// `private`
    Private,
    /// `protected`
    Protected,
}

impl Accessibility {
    /// Keyword text for printing.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Protected => "protected",
        }
    }
}

/// Modifier flags carried by declarations and members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// `export`
    pub is_export: bool,
    /// `default` (only meaningful together with `is_export`)
    pub is_default: bool,
    /// `declare`
    pub is_declare: bool,
    /// `public` / `private` / `protected`
    pub accessibility: Option<Accessibility>,
    /// `static`
    pub is_static: bool,
    /// `abstract`
    pub is_abstract: bool,
    /// `readonly`
    pub is_readonly: bool,
}

/// Name of a class or interface member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberName {
    /// Plain identifier: `p`
    Ident(CompactString),
    /// String literal, quotes included: `"G.#private"`
    StringLit(CompactString),
    /// Private identifier, `#` included: `#private`
    Private(CompactString),
}

impl MemberName {
    /// Source text of the name, used for sibling-accessor matching.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Ident(s) | Self::StringLit(s) | Self::Private(s) => s.as_str(),
        }
    }
}

/// Binding list of an import declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportBindings {
    /// `* as ns`
    Namespace(CompactString),
    /// `{ a, b as c }`
    Named(Vec<ImportSpecifier>),
}

/// One `a` or `a as b` entry in a named import clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpecifier {
    /// Imported name.
    pub name: CompactString,
    /// Local alias, if any.
    pub alias: Option<CompactString>,
}

/// One `a` or `a as b` entry in a named export clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSpecifier {
    /// Local name being exported.
    pub name: CompactString,
    /// Exported alias, if any.
    pub alias: Option<CompactString>,
}

/// Variable statement keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKeyword {
    /// `const`
    Const,
    /// `let`
    Let,
    /// `var`
    Var,
}

impl VarKeyword {
    /// Keyword text for printing.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Const => "const",
            Self::Let => "let",
            Self::Var => "var",
        }
    }
}

/// `namespace` vs `module` introduction keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKeyword {
    /// `namespace N`
    Namespace,
    /// `module "m"` / `module N`
    Module,
}

/// Unary type operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeOp {
    /// `keyof T`
    KeyOf,
    /// `readonly T` (array/tuple operand position)
    ReadOnly,
}

impl TypeOp {
    /// Keyword text for printing.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::KeyOf => "keyof",
            Self::ReadOnly => "readonly",
        }
    }
}

/// Closed kind discriminant with per-kind payload. Child node ids live in the
/// payload; [`NodeKind::child_ids`] exposes them generically for parent fixup,
/// and the walker rebuilds payloads kind by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// One declaration file. `trailing` holds end-of-file comments that had no
    /// following statement to attach to.
    SourceFile {
        /// Top-level statements in source order.
        statements: Vec<NodeId>,
        /// Comments after the last statement.
        trailing: Vec<Comment>,
    },

    /// `import [type] clause from "m";` or bare `import "m";`
    ImportDecl {
        /// `import type` qualifier present.
        type_only: bool,
        /// Default import binding.
        default_name: Option<CompactString>,
        /// Namespace or named bindings.
        bindings: Option<ImportBindings>,
        /// Module specifier, quotes included.
        module: CompactString,
    },
    /// `export [type] { a as b } [from "m"];`
    ExportNamed {
        /// `export type` qualifier present.
        type_only: bool,
        /// Export clause entries.
        specifiers: Vec<ExportSpecifier>,
        /// Optional module specifier, quotes included.
        module: Option<CompactString>,
    },
    /// `export * from "m";`
    ExportStar {
        /// Module specifier, quotes included.
        module: CompactString,
    },
    /// `export * as ns from "m";`
    ExportStarAs {
        /// Namespace export name.
        name: CompactString,
        /// Module specifier, quotes included.
        module: CompactString,
    },

    /// Class declaration (body contains members).
    ClassDecl {
        /// Class name; `None` for `export default class { ... }`.
        name: Option<CompactString>,
        /// Modifier flags.
        modifiers: Modifiers,
        /// Type parameters.
        type_params: Vec<NodeId>,
        /// `extends` heritage type reference.
        extends: Option<NodeId>,
        /// `implements` heritage type references.
        implements: Vec<NodeId>,
        /// Member declarations.
        members: Vec<NodeId>,
    },
    /// Interface declaration.
    InterfaceDecl {
        /// Interface name.
        name: CompactString,
        /// Modifier flags.
        modifiers: Modifiers,
        /// Type parameters.
        type_params: Vec<NodeId>,
        /// `extends` heritage type references.
        extends: Vec<NodeId>,
        /// Member signatures.
        members: Vec<NodeId>,
    },
    /// `type Name<T> = T;`
    TypeAliasDecl {
        /// Alias name.
        name: CompactString,
        /// Modifier flags.
        modifiers: Modifiers,
        /// Type parameters.
        type_params: Vec<NodeId>,
        /// Aliased type.
        ty: NodeId,
    },
    /// `declare function f(...): R;`
    FunctionDecl {
        /// Function name.
        name: CompactString,
        /// Modifier flags.
        modifiers: Modifiers,
        /// Type parameters.
        type_params: Vec<NodeId>,
        /// Parameters.
        params: Vec<NodeId>,
        /// Return type, if annotated.
        return_ty: Option<NodeId>,
    },
    /// `declare const x: T;`
    VariableDecl {
        /// Modifier flags.
        modifiers: Modifiers,
        /// `const` / `let` / `var`.
        keyword: VarKeyword,
        /// Variable name.
        name: CompactString,
        /// Declared type, if annotated.
        ty: Option<NodeId>,
    },
    /// `declare enum E { A = 1 }`
    EnumDecl {
        /// Enum name.
        name: CompactString,
        /// Modifier flags.
        modifiers: Modifiers,
        /// `const enum`.
        is_const: bool,
        /// Members: name plus optional raw initializer text.
        members: Vec<(CompactString, Option<CompactString>)>,
    },
    /// `namespace N { ... }` / `module "m" { ... }`
    ModuleDecl {
        /// Namespace/module name (raw; may be a quoted string for `module`).
        name: CompactString,
        /// Modifier flags.
        modifiers: Modifiers,
        /// Introduction keyword.
        keyword: ModuleKeyword,
        /// Body statements.
        body: Vec<NodeId>,
    },

    /// Property declaration or signature.
    PropertyDecl {
        /// Member name.
        name: MemberName,
        /// Modifier flags.
        modifiers: Modifiers,
        /// `?` marker.
        optional: bool,
        /// Declared type, if annotated.
        ty: Option<NodeId>,
    },
    /// `get p(): T;`
    GetAccessor {
        /// Member name.
        name: MemberName,
        /// Modifier flags.
        modifiers: Modifiers,
        /// Declared return type, if annotated.
        return_ty: Option<NodeId>,
    },
    /// `set p(v: T);`
    SetAccessor {
        /// Member name.
        name: MemberName,
        /// Modifier flags.
        modifiers: Modifiers,
        /// Parameters. The grammar requires exactly one; the engine treats
        /// violations as an upstream contract failure.
        params: Vec<NodeId>,
    },
    /// Method declaration or signature.
    MethodDecl {
        /// Member name.
        name: MemberName,
        /// Modifier flags.
        modifiers: Modifiers,
        /// `?` marker.
        optional: bool,
        /// Type parameters.
        type_params: Vec<NodeId>,
        /// Parameters.
        params: Vec<NodeId>,
        /// Return type, if annotated.
        return_ty: Option<NodeId>,
    },
    /// `constructor(...);`
    ConstructorDecl {
        /// Modifier flags.
        modifiers: Modifiers,
        /// Parameters.
        params: Vec<NodeId>,
    },
    /// `[key: string]: T;`
    IndexSignature {
        /// Modifier flags.
        modifiers: Modifiers,
        /// Index parameter.
        param: NodeId,
        /// Value type.
        ty: NodeId,
    },
    /// `(...): T;` inside an interface or type literal.
    CallSignature {
        /// Type parameters.
        type_params: Vec<NodeId>,
        /// Parameters.
        params: Vec<NodeId>,
        /// Return type, if annotated.
        return_ty: Option<NodeId>,
    },

    /// Function/method/index parameter.
    Param {
        /// Parameter name.
        name: CompactString,
        /// `...` rest marker.
        rest: bool,
        /// `?` marker.
        optional: bool,
        /// Declared type, if annotated.
        ty: Option<NodeId>,
    },
    /// `<T extends U = D>` entry.
    TypeParam {
        /// Type parameter name.
        name: CompactString,
        /// `extends` constraint.
        constraint: Option<NodeId>,
        /// Default type.
        default: Option<NodeId>,
    },

    /// Type reference: `Omit<T, K>`, `A.B.C`.
    TypeRef {
        /// Referenced (possibly qualified) name.
        name: CompactString,
        /// Type arguments.
        args: Vec<NodeId>,
    },
    /// Built-in keyword type: `any`, `string`, `void`, ...
    KeywordType {
        /// Keyword text.
        name: CompactString,
    },
    /// Literal type, raw text: `'a'`, `42`, `true`.
    LiteralType {
        /// Raw literal text, quotes included for strings.
        text: CompactString,
    },
    /// `A | B`
    UnionType {
        /// Union members.
        members: Vec<NodeId>,
    },
    /// `A & B`
    IntersectionType {
        /// Intersection members.
        members: Vec<NodeId>,
    },
    /// `T[]`
    ArrayType {
        /// Element type.
        elem: NodeId,
    },
    /// `[A, b: B, ...rest: C[]]`
    TupleType {
        /// Tuple elements.
        elements: Vec<NodeId>,
    },
    /// Labeled tuple element: `foo: string`, `...rest: boolean[]`.
    NamedTupleMember {
        /// Element label.
        label: CompactString,
        /// `...` rest marker.
        rest: bool,
        /// `?` marker.
        optional: bool,
        /// Element type.
        ty: NodeId,
    },
    /// Unlabeled rest element: `...boolean[]`.
    RestType {
        /// Element type.
        ty: NodeId,
    },
    /// Unlabeled optional element: `string?`.
    OptionalType {
        /// Element type.
        ty: NodeId,
    },
    /// `(a: A) => R`
    FunctionType {
        /// Type parameters.
        type_params: Vec<NodeId>,
        /// Parameters.
        params: Vec<NodeId>,
        /// Return type.
        return_ty: NodeId,
    },
    /// `x is T`, `asserts x`, `asserts x is T`.
    TypePredicate {
        /// `asserts` qualifier present.
        asserts: bool,
        /// Parameter name the predicate speaks about.
        param: CompactString,
        /// Narrowed type, if any.
        ty: Option<NodeId>,
    },
    /// `keyof T`, `readonly T`.
    TypeOperator {
        /// Operator keyword.
        op: TypeOp,
        /// Operand type.
        ty: NodeId,
    },
    /// `typeof x.y`
    TypeQuery {
        /// Qualified entity name.
        name: CompactString,
    },
    /// `T[K]`
    IndexedAccessType {
        /// Object type.
        obj: NodeId,
        /// Index type.
        index: NodeId,
    },
    /// `(T)`
    ParenType {
        /// Inner type.
        ty: NodeId,
    },
    /// `{ a: T; (x): R }`
    TypeLiteral {
        /// Member signatures.
        members: Vec<NodeId>,
    },
}

impl NodeKind {
    /// Collects every child id referenced by this payload, in source order.
    #[must_use]
    pub fn child_ids(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut push = |id: &NodeId| out.push(*id);
        match self {
            Self::SourceFile { statements, .. } => statements.iter().for_each(&mut push),
            Self::ImportDecl { .. }
            | Self::ExportNamed { .. }
            | Self::ExportStar { .. }
            | Self::ExportStarAs { .. }
            | Self::EnumDecl { .. }
            | Self::KeywordType { .. }
            | Self::LiteralType { .. }
            | Self::TypeQuery { .. }
            | Self::TypePredicate { ty: None, .. } => {}
            Self::ClassDecl {
                type_params,
                extends,
                implements,
                members,
                ..
            } => {
                type_params.iter().for_each(&mut push);
                extends.iter().for_each(&mut push);
                implements.iter().for_each(&mut push);
                members.iter().for_each(&mut push);
            }
            Self::InterfaceDecl {
                type_params,
                extends,
                members,
                ..
            } => {
                type_params.iter().for_each(&mut push);
                extends.iter().for_each(&mut push);
                members.iter().for_each(&mut push);
            }
            Self::TypeAliasDecl {
                type_params, ty, ..
            } => {
                type_params.iter().for_each(&mut push);
                push(ty);
            }
            Self::FunctionDecl {
                type_params,
                params,
                return_ty,
                ..
            }
            | Self::MethodDecl {
                type_params,
                params,
                return_ty,
                ..
            }
            | Self::CallSignature {
                type_params,
                params,
                return_ty,
            } => {
                type_params.iter().for_each(&mut push);
                params.iter().for_each(&mut push);
                return_ty.iter().for_each(&mut push);
            }
            Self::VariableDecl { ty, .. }
            | Self::PropertyDecl { ty, .. }
            | Self::Param { ty, .. }
            | Self::GetAccessor { return_ty: ty, .. } => ty.iter().for_each(&mut push),
            Self::ModuleDecl { body, .. } => body.iter().for_each(&mut push),
            Self::SetAccessor { params, .. } | Self::ConstructorDecl { params, .. } => {
                params.iter().for_each(&mut push);
            }
            Self::IndexSignature { param, ty, .. } => {
                push(param);
                push(ty);
            }
            Self::TypeParam {
                constraint,
                default,
                ..
            } => {
                constraint.iter().for_each(&mut push);
                default.iter().for_each(&mut push);
            }
            Self::TypeRef { args, .. } => args.iter().for_each(&mut push),
            Self::UnionType { members }
            | Self::IntersectionType { members }
            | Self::TypeLiteral { members } => members.iter().for_each(&mut push),
            Self::ArrayType { elem } => push(elem),
            Self::TupleType { elements } => elements.iter().for_each(&mut push),
            Self::NamedTupleMember { ty, .. }
            | Self::RestType { ty }
            | Self::OptionalType { ty }
            | Self::TypeOperator { ty, .. }
            | Self::ParenType { ty }
            | Self::TypePredicate { ty: Some(ty), .. } => push(ty),
            Self::FunctionType {
                type_params,
                params,
                return_ty,
            } => {
                type_params.iter().for_each(&mut push);
                params.iter().for_each(&mut push);
                push(return_ty);
            }
            Self::IndexedAccessType { obj, index } => {
                push(obj);
                push(index);
            }
        }
        out
    }
}

/// One node in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    /// Kind payload.
    pub kind: NodeKind,
    /// Parent node, `None` for the file root.
    pub parent: Option<NodeId>,
    /// Leading comments.
    pub leading: Vec<Comment>,
}

/// Arena of nodes for one declaration file.
#[derive(Debug, Clone)]
pub struct SourceTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    file_name: PathBuf,
}

impl SourceTree {
    /// Creates an empty tree for the given file.
    #[must_use]
    pub fn new(file_name: impl Into<PathBuf>) -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            file_name: file_name.into(),
        }
    }

    /// Path of the file this tree was parsed from.
    #[must_use]
    pub fn file_name(&self) -> &Path {
        &self.file_name
    }

    /// Root node id.
    ///
    /// # Panics
    ///
    /// Panics if the tree has no root yet (parser contract: `set_root` is
    /// called before the tree is handed out).
    #[must_use]
    pub fn root(&self) -> NodeId {
        #[allow(clippy::expect_used)]
        self.root.expect("tree has no root")
    }

    /// Installs the root node id.
    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    /// Allocates a node and fixes up the parent pointers of its children.
    pub fn alloc(&mut self, kind: NodeKind, leading: Vec<Comment>) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        let children = kind.child_ids();
        self.nodes.push(Node {
            kind,
            parent: None,
            leading,
        });
        for child in children {
            self.nodes[child.index()].parent = Some(id);
        }
        id
    }

    /// Node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Kind payload by id.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    /// Parent id, `None` at the root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// Leading comments of a node.
    #[must_use]
    pub fn leading(&self, id: NodeId) -> &[Comment] {
        &self.nodes[id.index()].leading
    }

    /// Replaces a node's leading comments.
    pub fn set_leading(&mut self, id: NodeId, leading: Vec<Comment>) {
        self.nodes[id.index()].leading = leading;
    }

    /// Allocates a copy of `id` with different leading comments, leaving the
    /// original untouched.
    pub fn with_leading(&mut self, id: NodeId, leading: Vec<Comment>) -> NodeId {
        let kind = self.kind(id).clone();
        self.alloc(kind, leading)
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walks up the parent chain to the nearest class declaration and returns
    /// its id, if any.
    #[must_use]
    pub fn enclosing_class(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            if matches!(self.kind(p), NodeKind::ClassDecl { .. }) {
                return Some(p);
            }
            cur = self.parent(p);
        }
        None
    }

    /// Collects every name bound by a declaration or import binding anywhere
    /// in the tree. Used for unique-identifier generation and for shadowing
    /// checks in symbol resolution.
    #[must_use]
    pub fn bound_names(&self) -> rustc_hash::FxHashSet<CompactString> {
        let mut names = rustc_hash::FxHashSet::default();
        for node in &self.nodes {
            match &node.kind {
                NodeKind::ImportDecl {
                    default_name,
                    bindings,
                    ..
                } => {
                    if let Some(n) = default_name {
                        names.insert(n.clone());
                    }
                    match bindings {
                        Some(ImportBindings::Namespace(n)) => {
                            names.insert(n.clone());
                        }
                        Some(ImportBindings::Named(specs)) => {
                            for s in specs {
                                names.insert(s.alias.clone().unwrap_or_else(|| s.name.clone()));
                            }
                        }
                        None => {}
                    }
                }
                NodeKind::ClassDecl { name: Some(n), .. } => {
                    names.insert(n.clone());
                }
                NodeKind::InterfaceDecl { name, .. }
                | NodeKind::TypeAliasDecl { name, .. }
                | NodeKind::FunctionDecl { name, .. }
                | NodeKind::VariableDecl { name, .. }
                | NodeKind::EnumDecl { name, .. }
                | NodeKind::ModuleDecl { name, .. } => {
                    names.insert(name.clone());
                }
                _ => {}
            }
        }
        names
    }
}
