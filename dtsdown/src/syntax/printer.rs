//! Normalizing printer: tree back to declaration-file text.
//!
//! Output conventions are fixed: LF line endings, four-space indentation,
//! `;` terminators, canonical modifier order, one statement per line. The
//! printer is total over the tree and stable, so printing the parse of its
//! own output reproduces it byte for byte.

use super::tree::{
    Comment, CommentStyle, ImportBindings, MemberName, Modifiers, ModuleKeyword, NodeId, NodeKind,
    SourceTree,
};

const INDENT: &str = "    ";

/// Prints a whole tree starting at its root.
#[must_use]
pub fn print(tree: &SourceTree) -> String {
    let mut printer = Printer {
        tree,
        out: String::new(),
        indent: 0,
        at_line_start: true,
    };
    printer.file(tree.root());
    printer.out
}

struct Printer<'a> {
    tree: &'a SourceTree,
    out: String,
    indent: usize,
    at_line_start: bool,
}

impl Printer<'_> {
    fn push(&mut self, s: &str) {
        self.out.push_str(s);
        if !s.is_empty() {
            self.at_line_start = false;
        }
    }

    fn nl(&mut self) {
        self.out.push('\n');
        self.at_line_start = true;
    }

    /// Writes the current indentation if positioned at a line start.
    fn pad(&mut self) {
        if self.at_line_start {
            for _ in 0..self.indent {
                self.out.push_str(INDENT);
            }
            self.at_line_start = false;
        }
    }

    fn file(&mut self, root: NodeId) {
        let NodeKind::SourceFile {
            statements,
            trailing,
        } = self.tree.kind(root)
        else {
            return;
        };
        for &stmt in statements {
            self.stmt(stmt);
        }
        for comment in trailing.clone() {
            self.comment(&comment);
        }
    }

    /// Emits one comment. Continuation lines are re-indented at the current
    /// level; lines starting with `*` get the extra space that aligns them
    /// under a `/**` opener.
    fn comment(&mut self, c: &Comment) {
        let mut first = true;
        for line in c.text.split('\n') {
            if first {
                self.pad();
                self.push(line.trim_end());
                first = false;
            } else {
                self.nl();
                let trimmed = line.trim_start().trim_end();
                self.pad();
                if trimmed.starts_with('*') {
                    self.push(" ");
                }
                self.push(trimmed);
            }
        }
        if c.trailing_newline {
            self.nl();
        } else {
            self.push(" ");
        }
    }

    fn leading(&mut self, id: NodeId) {
        for comment in self.tree.leading(id).to_vec() {
            self.comment(&comment);
        }
    }

    fn modifiers(&mut self, m: Modifiers) {
        if m.is_export {
            self.push("export ");
        }
        if m.is_default {
            self.push("default ");
        }
        if m.is_declare {
            self.push("declare ");
        }
        if let Some(a) = m.accessibility {
            self.push(a.keyword());
            self.push(" ");
        }
        if m.is_static {
            self.push("static ");
        }
        if m.is_abstract {
            self.push("abstract ");
        }
        if m.is_readonly {
            self.push("readonly ");
        }
    }

    fn member_name(&mut self, name: &MemberName) {
        match name {
            MemberName::Ident(s) | MemberName::StringLit(s) | MemberName::Private(s) => {
                self.push(s);
            }
        }
    }

    /// Emits one statement or member declaration, leading comments included,
    /// terminated by a line break.
    #[allow(clippy::too_many_lines)]
    fn stmt(&mut self, id: NodeId) {
        self.leading(id);
        self.pad();
        match self.tree.kind(id).clone() {
            NodeKind::ImportDecl {
                type_only,
                default_name,
                bindings,
                module,
            } => {
                self.push("import ");
                if type_only {
                    self.push("type ");
                }
                if default_name.is_some() || bindings.is_some() {
                    if let Some(name) = &default_name {
                        self.push(name);
                        if bindings.is_some() {
                            self.push(", ");
                        }
                    }
                    match &bindings {
                        Some(ImportBindings::Namespace(name)) => {
                            self.push("* as ");
                            self.push(name);
                        }
                        Some(ImportBindings::Named(specs)) => {
                            self.push("{ ");
                            for (i, spec) in specs.iter().enumerate() {
                                if i > 0 {
                                    self.push(", ");
                                }
                                self.push(&spec.name);
                                if let Some(alias) = &spec.alias {
                                    self.push(" as ");
                                    self.push(alias);
                                }
                            }
                            self.push(" }");
                        }
                        None => {}
                    }
                    self.push(" from ");
                }
                self.push(&module);
                self.push(";");
            }
            NodeKind::ExportNamed {
                type_only,
                specifiers,
                module,
            } => {
                self.push("export ");
                if type_only {
                    self.push("type ");
                }
                if specifiers.is_empty() {
                    self.push("{}");
                } else {
                    self.push("{ ");
                    for (i, spec) in specifiers.iter().enumerate() {
                        if i > 0 {
                            self.push(", ");
                        }
                        self.push(&spec.name);
                        if let Some(alias) = &spec.alias {
                            self.push(" as ");
                            self.push(alias);
                        }
                    }
                    self.push(" }");
                }
                if let Some(module) = &module {
                    self.push(" from ");
                    self.push(module);
                }
                self.push(";");
            }
            NodeKind::ExportStar { module } => {
                self.push("export * from ");
                self.push(&module);
                self.push(";");
            }
            NodeKind::ExportStarAs { name, module } => {
                self.push("export * as ");
                self.push(&name);
                self.push(" from ");
                self.push(&module);
                self.push(";");
            }
            NodeKind::ClassDecl {
                name,
                modifiers,
                type_params,
                extends,
                implements,
                members,
            } => {
                self.modifiers(modifiers);
                self.push("class");
                if let Some(name) = &name {
                    self.push(" ");
                    self.push(name);
                }
                self.type_params(&type_params);
                if let Some(ext) = extends {
                    self.push(" extends ");
                    self.ty(ext);
                }
                if !implements.is_empty() {
                    self.push(" implements ");
                    for (i, imp) in implements.iter().enumerate() {
                        if i > 0 {
                            self.push(", ");
                        }
                        self.ty(*imp);
                    }
                }
                self.body(&members);
            }
            NodeKind::InterfaceDecl {
                name,
                modifiers,
                type_params,
                extends,
                members,
            } => {
                self.modifiers(modifiers);
                self.push("interface ");
                self.push(&name);
                self.type_params(&type_params);
                if !extends.is_empty() {
                    self.push(" extends ");
                    for (i, ext) in extends.iter().enumerate() {
                        if i > 0 {
                            self.push(", ");
                        }
                        self.ty(*ext);
                    }
                }
                self.body(&members);
            }
            NodeKind::TypeAliasDecl {
                name,
                modifiers,
                type_params,
                ty,
            } => {
                self.modifiers(modifiers);
                self.push("type ");
                self.push(&name);
                self.type_params(&type_params);
                self.push(" = ");
                self.ty(ty);
                self.push(";");
            }
            NodeKind::FunctionDecl {
                name,
                modifiers,
                type_params,
                params,
                return_ty,
            } => {
                self.modifiers(modifiers);
                self.push("function ");
                self.push(&name);
                self.type_params(&type_params);
                self.params(&params);
                if let Some(ret) = return_ty {
                    self.push(": ");
                    self.ty(ret);
                }
                self.push(";");
            }
            NodeKind::VariableDecl {
                modifiers,
                keyword,
                name,
                ty,
            } => {
                self.modifiers(modifiers);
                self.push(keyword.keyword());
                self.push(" ");
                self.push(&name);
                if let Some(ty) = ty {
                    self.push(": ");
                    self.ty(ty);
                }
                self.push(";");
            }
            NodeKind::EnumDecl {
                name,
                modifiers,
                is_const,
                members,
            } => {
                self.modifiers(modifiers);
                if is_const {
                    self.push("const ");
                }
                self.push("enum ");
                self.push(&name);
                self.push(" {");
                self.nl();
                self.indent += 1;
                for (i, (member_name, init)) in members.iter().enumerate() {
                    self.pad();
                    self.push(member_name);
                    if let Some(init) = init {
                        self.push(" = ");
                        self.push(init);
                    }
                    if i + 1 < members.len() {
                        self.push(",");
                    }
                    self.nl();
                }
                self.indent -= 1;
                self.pad();
                self.push("}");
            }
            NodeKind::ModuleDecl {
                name,
                modifiers,
                keyword,
                body,
            } => {
                self.modifiers(modifiers);
                self.push(match keyword {
                    ModuleKeyword::Namespace => "namespace ",
                    ModuleKeyword::Module => "module ",
                });
                self.push(&name);
                self.body(&body);
            }
            NodeKind::PropertyDecl {
                name,
                modifiers,
                optional,
                ty,
            } => {
                self.modifiers(modifiers);
                self.member_name(&name);
                if optional {
                    self.push("?");
                }
                if let Some(ty) = ty {
                    self.push(": ");
                    self.ty(ty);
                }
                self.push(";");
            }
            NodeKind::GetAccessor {
                name,
                modifiers,
                return_ty,
            } => {
                self.modifiers(modifiers);
                self.push("get ");
                self.member_name(&name);
                self.push("()");
                if let Some(ret) = return_ty {
                    self.push(": ");
                    self.ty(ret);
                }
                self.push(";");
            }
            NodeKind::SetAccessor {
                name,
                modifiers,
                params,
            } => {
                self.modifiers(modifiers);
                self.push("set ");
                self.member_name(&name);
                self.params(&params);
                self.push(";");
            }
            NodeKind::MethodDecl {
                name,
                modifiers,
                optional,
                type_params,
                params,
                return_ty,
            } => {
                self.modifiers(modifiers);
                self.member_name(&name);
                if optional {
                    self.push("?");
                }
                self.type_params(&type_params);
                self.params(&params);
                if let Some(ret) = return_ty {
                    self.push(": ");
                    self.ty(ret);
                }
                self.push(";");
            }
            NodeKind::ConstructorDecl { modifiers, params } => {
                self.modifiers(modifiers);
                self.push("constructor");
                self.params(&params);
                self.push(";");
            }
            NodeKind::IndexSignature {
                modifiers,
                param,
                ty,
            } => {
                self.modifiers(modifiers);
                self.push("[");
                self.param(param);
                self.push("]: ");
                self.ty(ty);
                self.push(";");
            }
            NodeKind::CallSignature {
                type_params,
                params,
                return_ty,
            } => {
                self.type_params(&type_params);
                self.params(&params);
                if let Some(ret) = return_ty {
                    self.push(": ");
                    self.ty(ret);
                }
                self.push(";");
            }
            _ => {}
        }
        self.nl();
    }

    /// `{ ... }` body of a class, interface, or namespace.
    fn body(&mut self, members: &[NodeId]) {
        self.push(" {");
        self.nl();
        self.indent += 1;
        for &member in members {
            self.stmt(member);
        }
        self.indent -= 1;
        self.pad();
        self.push("}");
    }

    fn type_params(&mut self, params: &[NodeId]) {
        if params.is_empty() {
            return;
        }
        self.push("<");
        for (i, &p) in params.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            if let NodeKind::TypeParam {
                name,
                constraint,
                default,
            } = self.tree.kind(p).clone()
            {
                self.push(&name);
                if let Some(c) = constraint {
                    self.push(" extends ");
                    self.ty(c);
                }
                if let Some(d) = default {
                    self.push(" = ");
                    self.ty(d);
                }
            }
        }
        self.push(">");
    }

    fn params(&mut self, params: &[NodeId]) {
        self.push("(");
        for (i, &p) in params.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.param(p);
        }
        self.push(")");
    }

    fn param(&mut self, id: NodeId) {
        if let NodeKind::Param {
            name,
            rest,
            optional,
            ty,
        } = self.tree.kind(id).clone()
        {
            if rest {
                self.push("...");
            }
            self.push(&name);
            if optional {
                self.push("?");
            }
            if let Some(ty) = ty {
                self.push(": ");
                self.ty(ty);
            }
        }
    }

    /// Emits a type inline. Object type literals and comment-bearing tuples
    /// break onto multiple lines, everything else stays on one.
    fn ty(&mut self, id: NodeId) {
        match self.tree.kind(id).clone() {
            NodeKind::TypeRef { name, args } => {
                self.push(&name);
                if !args.is_empty() {
                    self.push("<");
                    for (i, &a) in args.iter().enumerate() {
                        if i > 0 {
                            self.push(", ");
                        }
                        self.ty(a);
                    }
                    self.push(">");
                }
            }
            NodeKind::KeywordType { name } => self.push(&name),
            NodeKind::LiteralType { text } => self.push(&text),
            NodeKind::UnionType { members } => {
                for (i, &m) in members.iter().enumerate() {
                    if i > 0 {
                        self.push(" | ");
                    }
                    self.ty(m);
                }
            }
            NodeKind::IntersectionType { members } => {
                for (i, &m) in members.iter().enumerate() {
                    if i > 0 {
                        self.push(" & ");
                    }
                    self.ty(m);
                }
            }
            NodeKind::ArrayType { elem } => {
                let needs_parens = matches!(
                    self.tree.kind(elem),
                    NodeKind::UnionType { .. }
                        | NodeKind::IntersectionType { .. }
                        | NodeKind::FunctionType { .. }
                        | NodeKind::TypeOperator { .. }
                        | NodeKind::TypePredicate { .. }
                );
                if needs_parens {
                    self.push("(");
                    self.ty(elem);
                    self.push(")");
                } else {
                    self.ty(elem);
                }
                self.push("[]");
            }
            NodeKind::TupleType { elements } => self.tuple(&elements),
            NodeKind::NamedTupleMember { .. }
            | NodeKind::RestType { .. }
            | NodeKind::OptionalType { .. } => self.tuple_element(id),
            NodeKind::FunctionType {
                type_params,
                params,
                return_ty,
            } => {
                self.type_params(&type_params);
                self.params(&params);
                self.push(" => ");
                self.ty(return_ty);
            }
            NodeKind::TypePredicate {
                asserts,
                param,
                ty,
            } => {
                if asserts {
                    self.push("asserts ");
                }
                self.push(&param);
                if let Some(ty) = ty {
                    self.push(" is ");
                    self.ty(ty);
                }
            }
            NodeKind::TypeOperator { op, ty } => {
                self.push(op.keyword());
                self.push(" ");
                self.ty(ty);
            }
            NodeKind::TypeQuery { name } => {
                self.push("typeof ");
                self.push(&name);
            }
            NodeKind::IndexedAccessType { obj, index } => {
                self.ty(obj);
                self.push("[");
                self.ty(index);
                self.push("]");
            }
            NodeKind::ParenType { ty } => {
                self.push("(");
                self.ty(ty);
                self.push(")");
            }
            NodeKind::TypeLiteral { members } => {
                if members.is_empty() {
                    self.push("{}");
                } else {
                    self.push("{");
                    self.nl();
                    self.indent += 1;
                    for &member in &members {
                        self.stmt(member);
                    }
                    self.indent -= 1;
                    self.pad();
                    self.push("}");
                }
            }
            _ => {}
        }
    }

    /// Tuples print inline unless an element carries a leading comment, in
    /// which case every element gets its own line.
    fn tuple(&mut self, elements: &[NodeId]) {
        let multiline = elements
            .iter()
            .any(|&e| !self.tree.leading(e).is_empty());
        if !multiline {
            self.push("[");
            for (i, &e) in elements.iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                self.tuple_element(e);
            }
            self.push("]");
            return;
        }
        self.push("[");
        self.nl();
        self.indent += 1;
        for (i, &e) in elements.iter().enumerate() {
            self.leading(e);
            self.pad();
            self.tuple_element(e);
            if i + 1 < elements.len() {
                self.push(",");
            }
            self.nl();
        }
        self.indent -= 1;
        self.pad();
        self.push("]");
    }

    fn tuple_element(&mut self, id: NodeId) {
        match self.tree.kind(id).clone() {
            NodeKind::NamedTupleMember {
                label,
                rest,
                optional,
                ty,
            } => {
                if rest {
                    self.push("...");
                }
                self.push(&label);
                if optional {
                    self.push("?");
                }
                self.push(": ");
                self.ty(ty);
            }
            NodeKind::RestType { ty } => {
                self.push("...");
                self.ty(ty);
            }
            NodeKind::OptionalType { ty } => {
                self.ty(ty);
                self.push("?");
            }
            _ => self.ty(id),
        }
    }
}
