//! Recursive-descent parser building the arena tree.
//!
//! Keywords are contextual: the scanner only produces identifiers, and the
//! parser decides from the following tokens whether `readonly`, `get`, `type`
//! and friends are modifiers, accessor introducers, or plain member names.
//! Comments attached to a statement's (or member's) first token are lifted
//! onto the node the parser builds for it.

use super::lexer::{tokenize, Token, TokenKind};
use super::tree::{
    Accessibility, Comment, ExportSpecifier, ImportBindings, ImportSpecifier, MemberName,
    Modifiers, ModuleKeyword, NodeId, NodeKind, SourceTree, TypeOp, VarKeyword,
};
use super::ParseError;
use compact_str::CompactString;
use std::path::Path;

/// Keyword type names recognized as [`NodeKind::KeywordType`].
const KEYWORD_TYPES: &[&str] = &[
    "any",
    "bigint",
    "boolean",
    "never",
    "null",
    "number",
    "object",
    "string",
    "symbol",
    "undefined",
    "unknown",
    "void",
];

/// Parses one declaration file into a [`SourceTree`].
pub fn parse(source: &str, file_name: &Path) -> Result<SourceTree, ParseError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        tree: SourceTree::new(file_name),
    };
    let statements = parser.parse_statements()?;
    if !parser.at(TokenKind::Eof) {
        return Err(parser.unexpected("a declaration"));
    }
    let trailing = parser.take_leading();
    let root = parser.tree.alloc(
        NodeKind::SourceFile {
            statements,
            trailing,
        },
        Vec::new(),
    );
    parser.tree.set_root(root);
    Ok(parser.tree)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    tree: SourceTree,
}

impl Parser {
    fn cur(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn nth(&self, n: usize) -> &Token {
        &self.tokens[(self.pos + n).min(self.tokens.len() - 1)]
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.cur().kind == kind
    }

    fn at_word(&self, word: &str) -> bool {
        self.cur().is_ident(word)
    }

    fn bump(&mut self) -> Token {
        let tok = self.cur().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_word(&mut self, word: &str) -> bool {
        if self.at_word(word) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_semi(&mut self) {
        while self.eat(TokenKind::Semi) {}
    }

    fn take_leading(&mut self) -> Vec<Comment> {
        let idx = self.pos.min(self.tokens.len() - 1);
        std::mem::take(&mut self.tokens[idx].leading)
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_word(&mut self, word: &str) -> Result<(), ParseError> {
        if self.eat_word(word) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("`{word}`")))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let tok = self.cur();
        let found = match tok.kind {
            TokenKind::Ident => format!("`{}`", tok.text),
            TokenKind::StringLit => format!("string {}", tok.text),
            TokenKind::NumberLit => format!("number {}", tok.text),
            TokenKind::PrivateIdent => format!("`{}`", tok.text),
            TokenKind::Eof => "end of file".to_owned(),
            TokenKind::LBrace => "`{`".to_owned(),
            TokenKind::RBrace => "`}`".to_owned(),
            TokenKind::LParen => "`(`".to_owned(),
            TokenKind::RParen => "`)`".to_owned(),
            TokenKind::LBracket => "`[`".to_owned(),
            TokenKind::RBracket => "`]`".to_owned(),
            TokenKind::LessThan => "`<`".to_owned(),
            TokenKind::GreaterThan => "`>`".to_owned(),
            TokenKind::Comma => "`,`".to_owned(),
            TokenKind::Semi => "`;`".to_owned(),
            TokenKind::Colon => "`:`".to_owned(),
            TokenKind::Question => "`?`".to_owned(),
            TokenKind::Dot => "`.`".to_owned(),
            TokenKind::DotDotDot => "`...`".to_owned(),
            TokenKind::Arrow => "`=>`".to_owned(),
            TokenKind::Equals => "`=`".to_owned(),
            TokenKind::Pipe => "`|`".to_owned(),
            TokenKind::Amp => "`&`".to_owned(),
            TokenKind::Star => "`*`".to_owned(),
            TokenKind::Minus => "`-`".to_owned(),
        };
        ParseError::UnexpectedToken {
            expected: expected.to_owned(),
            found,
            line: tok.line,
        }
    }

    fn unsupported(&self, what: &str) -> ParseError {
        ParseError::Unsupported {
            what: what.to_owned(),
            line: self.cur().line,
        }
    }

    // ---- statements ----

    fn parse_statements(&mut self) -> Result<Vec<NodeId>, ParseError> {
        let mut statements = Vec::new();
        while !self.at(TokenKind::Eof) && !self.at(TokenKind::RBrace) {
            if self.at(TokenKind::Semi) {
                self.bump();
                continue;
            }
            statements.push(self.parse_statement()?);
        }
        Ok(statements)
    }

    fn parse_statement(&mut self) -> Result<NodeId, ParseError> {
        let leading = self.take_leading();
        let id = self.parse_statement_inner()?;
        if !leading.is_empty() {
            self.tree.set_leading(id, leading);
        }
        Ok(id)
    }

    fn parse_statement_inner(&mut self) -> Result<NodeId, ParseError> {
        // Export forms that are statements of their own, not modifiers.
        if self.at_word("export") {
            match self.nth(1).kind {
                TokenKind::Star => return self.parse_export_star(),
                TokenKind::LBrace => {
                    self.bump();
                    return self.parse_export_named(false);
                }
                TokenKind::Ident
                    if self.nth(1).is_ident("type") && self.nth(2).kind == TokenKind::LBrace =>
                {
                    self.bump();
                    self.bump();
                    return self.parse_export_named(true);
                }
                TokenKind::Equals => return Err(self.unsupported("`export =` assignment")),
                _ => {}
            }
        }
        if self.at_word("import") {
            return self.parse_import();
        }

        let modifiers = self.parse_statement_modifiers();

        if self.at_word("class") {
            return self.parse_class(modifiers);
        }
        if self.at_word("interface") {
            return self.parse_interface(modifiers);
        }
        if self.at_word("type") && self.nth(1).kind == TokenKind::Ident {
            return self.parse_type_alias(modifiers);
        }
        if self.at_word("function") {
            return self.parse_function(modifiers);
        }
        if self.at_word("enum") {
            return self.parse_enum(modifiers, false);
        }
        if self.at_word("const") && self.nth(1).is_ident("enum") {
            self.bump();
            return self.parse_enum(modifiers, true);
        }
        if self.at_word("const") || self.at_word("let") || self.at_word("var") {
            return self.parse_variable(modifiers);
        }
        if self.at_word("namespace") || self.at_word("module") {
            return self.parse_module(modifiers);
        }
        if self.at_word("global") {
            return Err(self.unsupported("global scope augmentation"));
        }
        Err(self.unexpected("a declaration"))
    }

    fn parse_statement_modifiers(&mut self) -> Modifiers {
        let mut m = Modifiers::default();
        loop {
            if self.at_word("export") {
                m.is_export = true;
                self.bump();
            } else if m.is_export && self.at_word("default") {
                m.is_default = true;
                self.bump();
            } else if self.at_word("declare") {
                m.is_declare = true;
                self.bump();
            } else if self.at_word("abstract") && self.nth(1).is_ident("class") {
                m.is_abstract = true;
                self.bump();
            } else {
                return m;
            }
        }
    }

    fn parse_import(&mut self) -> Result<NodeId, ParseError> {
        self.expect_word("import")?;
        if self.at(TokenKind::StringLit) {
            let module = self.bump().text;
            self.eat_semi();
            return Ok(self.tree.alloc(
                NodeKind::ImportDecl {
                    type_only: false,
                    default_name: None,
                    bindings: None,
                    module,
                },
                Vec::new(),
            ));
        }

        let mut type_only = false;
        if self.at_word("type") {
            let next = self.nth(1);
            let qualifier = match next.kind {
                TokenKind::LBrace | TokenKind::Star => true,
                TokenKind::Ident => !next.is_ident("from"),
                _ => false,
            };
            if qualifier {
                type_only = true;
                self.bump();
            }
        }

        let mut default_name = None;
        let mut bindings = None;
        if self.at(TokenKind::Ident) {
            default_name = Some(self.bump().text);
            if self.eat(TokenKind::Comma) {
                bindings = Some(self.parse_import_bindings()?);
            }
        } else {
            bindings = Some(self.parse_import_bindings()?);
        }
        self.expect_word("from")?;
        let module = self.expect(TokenKind::StringLit, "a module specifier")?.text;
        self.eat_semi();
        Ok(self.tree.alloc(
            NodeKind::ImportDecl {
                type_only,
                default_name,
                bindings,
                module,
            },
            Vec::new(),
        ))
    }

    fn parse_import_bindings(&mut self) -> Result<ImportBindings, ParseError> {
        if self.eat(TokenKind::Star) {
            self.expect_word("as")?;
            let name = self.expect(TokenKind::Ident, "a namespace binding name")?.text;
            return Ok(ImportBindings::Namespace(name));
        }
        self.expect(TokenKind::LBrace, "`{`")?;
        let mut specs = Vec::new();
        while !self.at(TokenKind::RBrace) {
            let name = self.expect(TokenKind::Ident, "an import name")?.text;
            let alias = if self.eat_word("as") {
                Some(self.expect(TokenKind::Ident, "an import alias")?.text)
            } else {
                None
            };
            specs.push(ImportSpecifier { name, alias });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "`}`")?;
        Ok(ImportBindings::Named(specs))
    }

    fn parse_export_star(&mut self) -> Result<NodeId, ParseError> {
        self.expect_word("export")?;
        self.expect(TokenKind::Star, "`*`")?;
        let name = if self.eat_word("as") {
            Some(self.expect(TokenKind::Ident, "a namespace export name")?.text)
        } else {
            None
        };
        self.expect_word("from")?;
        let module = self.expect(TokenKind::StringLit, "a module specifier")?.text;
        self.eat_semi();
        let kind = match name {
            Some(name) => NodeKind::ExportStarAs { name, module },
            None => NodeKind::ExportStar { module },
        };
        Ok(self.tree.alloc(kind, Vec::new()))
    }

    fn parse_export_named(&mut self, type_only: bool) -> Result<NodeId, ParseError> {
        self.expect(TokenKind::LBrace, "`{`")?;
        let mut specifiers = Vec::new();
        while !self.at(TokenKind::RBrace) {
            let name = self.expect(TokenKind::Ident, "an export name")?.text;
            let alias = if self.eat_word("as") {
                Some(self.expect(TokenKind::Ident, "an export alias")?.text)
            } else {
                None
            };
            specifiers.push(ExportSpecifier { name, alias });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "`}`")?;
        let module = if self.eat_word("from") {
            Some(self.expect(TokenKind::StringLit, "a module specifier")?.text)
        } else {
            None
        };
        self.eat_semi();
        Ok(self.tree.alloc(
            NodeKind::ExportNamed {
                type_only,
                specifiers,
                module,
            },
            Vec::new(),
        ))
    }

    fn parse_class(&mut self, modifiers: Modifiers) -> Result<NodeId, ParseError> {
        self.expect_word("class")?;
        let name = if self.at(TokenKind::Ident) {
            Some(self.bump().text)
        } else {
            None
        };
        let type_params = self.parse_type_params()?;
        let extends = if self.eat_word("extends") {
            Some(self.parse_type_reference()?)
        } else {
            None
        };
        let mut implements = Vec::new();
        if self.eat_word("implements") {
            loop {
                implements.push(self.parse_type_reference()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::LBrace, "`{`")?;
        let members = self.parse_members()?;
        self.expect(TokenKind::RBrace, "`}`")?;
        self.eat_semi();
        Ok(self.tree.alloc(
            NodeKind::ClassDecl {
                name,
                modifiers,
                type_params,
                extends,
                implements,
                members,
            },
            Vec::new(),
        ))
    }

    fn parse_interface(&mut self, modifiers: Modifiers) -> Result<NodeId, ParseError> {
        self.expect_word("interface")?;
        let name = self.expect(TokenKind::Ident, "an interface name")?.text;
        let type_params = self.parse_type_params()?;
        let mut extends = Vec::new();
        if self.eat_word("extends") {
            loop {
                extends.push(self.parse_type_reference()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::LBrace, "`{`")?;
        let members = self.parse_members()?;
        self.expect(TokenKind::RBrace, "`}`")?;
        self.eat_semi();
        Ok(self.tree.alloc(
            NodeKind::InterfaceDecl {
                name,
                modifiers,
                type_params,
                extends,
                members,
            },
            Vec::new(),
        ))
    }

    fn parse_type_alias(&mut self, modifiers: Modifiers) -> Result<NodeId, ParseError> {
        self.expect_word("type")?;
        let name = self.expect(TokenKind::Ident, "a type alias name")?.text;
        let type_params = self.parse_type_params()?;
        self.expect(TokenKind::Equals, "`=`")?;
        let ty = self.parse_type()?;
        self.eat_semi();
        Ok(self.tree.alloc(
            NodeKind::TypeAliasDecl {
                name,
                modifiers,
                type_params,
                ty,
            },
            Vec::new(),
        ))
    }

    fn parse_function(&mut self, modifiers: Modifiers) -> Result<NodeId, ParseError> {
        self.expect_word("function")?;
        let name = self.expect(TokenKind::Ident, "a function name")?.text;
        let type_params = self.parse_type_params()?;
        let params = self.parse_params()?;
        let return_ty = if self.eat(TokenKind::Colon) {
            Some(self.parse_return_type()?)
        } else {
            None
        };
        self.eat_semi();
        Ok(self.tree.alloc(
            NodeKind::FunctionDecl {
                name,
                modifiers,
                type_params,
                params,
                return_ty,
            },
            Vec::new(),
        ))
    }

    fn parse_variable(&mut self, modifiers: Modifiers) -> Result<NodeId, ParseError> {
        let keyword = match self.bump().text.as_str() {
            "const" => VarKeyword::Const,
            "let" => VarKeyword::Let,
            _ => VarKeyword::Var,
        };
        let name = self.expect(TokenKind::Ident, "a variable name")?.text;
        let ty = if self.eat(TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        if self.at(TokenKind::Comma) {
            return Err(self.unsupported("multiple declarators in one variable statement"));
        }
        self.eat_semi();
        Ok(self.tree.alloc(
            NodeKind::VariableDecl {
                modifiers,
                keyword,
                name,
                ty,
            },
            Vec::new(),
        ))
    }

    fn parse_enum(&mut self, modifiers: Modifiers, is_const: bool) -> Result<NodeId, ParseError> {
        self.expect_word("enum")?;
        let name = self.expect(TokenKind::Ident, "an enum name")?.text;
        self.expect(TokenKind::LBrace, "`{`")?;
        let mut members = Vec::new();
        while !self.at(TokenKind::RBrace) {
            let member_name = match self.cur().kind {
                TokenKind::Ident | TokenKind::StringLit => self.bump().text,
                _ => return Err(self.unexpected("an enum member name")),
            };
            let init = if self.eat(TokenKind::Equals) {
                let mut text = CompactString::default();
                if self.eat(TokenKind::Minus) {
                    text.push('-');
                }
                match self.cur().kind {
                    TokenKind::NumberLit | TokenKind::StringLit | TokenKind::Ident => {
                        text.push_str(&self.bump().text);
                    }
                    _ => return Err(self.unexpected("an enum member initializer")),
                }
                Some(text)
            } else {
                None
            };
            members.push((member_name, init));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "`}`")?;
        self.eat_semi();
        Ok(self.tree.alloc(
            NodeKind::EnumDecl {
                name,
                modifiers,
                is_const,
                members,
            },
            Vec::new(),
        ))
    }

    fn parse_module(&mut self, modifiers: Modifiers) -> Result<NodeId, ParseError> {
        let keyword = if self.bump().text == "namespace" {
            ModuleKeyword::Namespace
        } else {
            ModuleKeyword::Module
        };
        let name = if self.at(TokenKind::StringLit) {
            self.bump().text
        } else {
            let mut name = self.expect(TokenKind::Ident, "a namespace name")?.text;
            while self.eat(TokenKind::Dot) {
                name.push('.');
                name.push_str(&self.expect(TokenKind::Ident, "a namespace name")?.text);
            }
            name
        };
        self.expect(TokenKind::LBrace, "`{`")?;
        let body = self.parse_statements()?;
        self.expect(TokenKind::RBrace, "`}`")?;
        self.eat_semi();
        Ok(self.tree.alloc(
            NodeKind::ModuleDecl {
                name,
                modifiers,
                keyword,
                body,
            },
            Vec::new(),
        ))
    }

    // ---- members ----

    fn parse_members(&mut self) -> Result<Vec<NodeId>, ParseError> {
        let mut members = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            if self.at(TokenKind::Semi) || self.at(TokenKind::Comma) {
                self.bump();
                continue;
            }
            let leading = self.take_leading();
            let id = self.parse_member()?;
            if !leading.is_empty() {
                self.tree.set_leading(id, leading);
            }
            members.push(id);
        }
        Ok(members)
    }

    fn is_member_name_start(tok: &Token) -> bool {
        matches!(
            tok.kind,
            TokenKind::Ident | TokenKind::StringLit | TokenKind::NumberLit | TokenKind::PrivateIdent
        )
    }

    fn parse_member(&mut self) -> Result<NodeId, ParseError> {
        let modifiers = self.parse_member_modifiers();

        if self.at_word("get") && Self::is_member_name_start(self.nth(1)) {
            self.bump();
            let name = self.parse_member_name()?;
            self.expect(TokenKind::LParen, "`(`")?;
            self.expect(TokenKind::RParen, "`)`")?;
            let return_ty = if self.eat(TokenKind::Colon) {
                Some(self.parse_return_type()?)
            } else {
                None
            };
            self.eat_semi();
            return Ok(self.tree.alloc(
                NodeKind::GetAccessor {
                    name,
                    modifiers,
                    return_ty,
                },
                Vec::new(),
            ));
        }
        if self.at_word("set") && Self::is_member_name_start(self.nth(1)) {
            self.bump();
            let name = self.parse_member_name()?;
            let params = self.parse_params()?;
            self.eat_semi();
            return Ok(self.tree.alloc(
                NodeKind::SetAccessor {
                    name,
                    modifiers,
                    params,
                },
                Vec::new(),
            ));
        }
        if self.at_word("constructor") && self.nth(1).kind == TokenKind::LParen {
            self.bump();
            let params = self.parse_params()?;
            self.eat_semi();
            return Ok(self
                .tree
                .alloc(NodeKind::ConstructorDecl { modifiers, params }, Vec::new()));
        }
        if self.at_word("new") && self.nth(1).kind == TokenKind::LParen {
            return Err(self.unsupported("construct signature"));
        }
        if self.at(TokenKind::LBracket) {
            self.bump();
            let pname = self.expect(TokenKind::Ident, "an index parameter name")?.text;
            self.expect(TokenKind::Colon, "`:`")?;
            let pty = self.parse_type()?;
            self.expect(TokenKind::RBracket, "`]`")?;
            let param = self.tree.alloc(
                NodeKind::Param {
                    name: pname,
                    rest: false,
                    optional: false,
                    ty: Some(pty),
                },
                Vec::new(),
            );
            self.expect(TokenKind::Colon, "`:`")?;
            let ty = self.parse_type()?;
            self.eat_semi();
            return Ok(self.tree.alloc(
                NodeKind::IndexSignature {
                    modifiers,
                    param,
                    ty,
                },
                Vec::new(),
            ));
        }
        if self.at(TokenKind::LParen) || self.at(TokenKind::LessThan) {
            let type_params = self.parse_type_params()?;
            let params = self.parse_params()?;
            let return_ty = if self.eat(TokenKind::Colon) {
                Some(self.parse_return_type()?)
            } else {
                None
            };
            self.eat_semi();
            return Ok(self.tree.alloc(
                NodeKind::CallSignature {
                    type_params,
                    params,
                    return_ty,
                },
                Vec::new(),
            ));
        }

        let name = self.parse_member_name()?;
        let optional = self.eat(TokenKind::Question);
        if self.at(TokenKind::LParen) || self.at(TokenKind::LessThan) {
            let type_params = self.parse_type_params()?;
            let params = self.parse_params()?;
            let return_ty = if self.eat(TokenKind::Colon) {
                Some(self.parse_return_type()?)
            } else {
                None
            };
            self.eat_semi();
            return Ok(self.tree.alloc(
                NodeKind::MethodDecl {
                    name,
                    modifiers,
                    optional,
                    type_params,
                    params,
                    return_ty,
                },
                Vec::new(),
            ));
        }
        let ty = if self.eat(TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        self.eat_semi();
        Ok(self.tree.alloc(
            NodeKind::PropertyDecl {
                name,
                modifiers,
                optional,
                ty,
            },
            Vec::new(),
        ))
    }

    fn parse_member_modifiers(&mut self) -> Modifiers {
        let mut m = Modifiers::default();
        loop {
            if self.cur().kind != TokenKind::Ident {
                return m;
            }
            let next = self.nth(1);
            // A modifier word followed by `:`, `?`, `(`, `<`, `;`, or `=` is
            // actually a member named like the modifier.
            let continues_member =
                Self::is_member_name_start(next) || next.kind == TokenKind::LBracket;
            if !continues_member {
                return m;
            }
            match self.cur().text.as_str() {
                "public" => m.accessibility = Some(Accessibility::Public),
                "private" => m.accessibility = Some(Accessibility::Private),
                "protected" => m.accessibility = Some(Accessibility::Protected),
                "static" => m.is_static = true,
                "abstract" => m.is_abstract = true,
                "readonly" => m.is_readonly = true,
                _ => return m,
            }
            self.bump();
        }
    }

    fn parse_member_name(&mut self) -> Result<MemberName, ParseError> {
        match self.cur().kind {
            TokenKind::Ident | TokenKind::NumberLit => Ok(MemberName::Ident(self.bump().text)),
            TokenKind::StringLit => Ok(MemberName::StringLit(self.bump().text)),
            TokenKind::PrivateIdent => Ok(MemberName::Private(self.bump().text)),
            _ => Err(self.unexpected("a member name")),
        }
    }

    // ---- parameters and type parameters ----

    fn parse_params(&mut self) -> Result<Vec<NodeId>, ParseError> {
        self.expect(TokenKind::LParen, "`(`")?;
        let mut params = Vec::new();
        while !self.at(TokenKind::RParen) {
            let rest = self.eat(TokenKind::DotDotDot);
            let name = self.expect(TokenKind::Ident, "a parameter name")?.text;
            let optional = self.eat(TokenKind::Question);
            let ty = if self.eat(TokenKind::Colon) {
                Some(self.parse_type()?)
            } else {
                None
            };
            params.push(self.tree.alloc(
                NodeKind::Param {
                    name,
                    rest,
                    optional,
                    ty,
                },
                Vec::new(),
            ));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "`)`")?;
        Ok(params)
    }

    fn parse_type_params(&mut self) -> Result<Vec<NodeId>, ParseError> {
        if !self.at(TokenKind::LessThan) {
            return Ok(Vec::new());
        }
        self.bump();
        let mut params = Vec::new();
        while !self.at(TokenKind::GreaterThan) {
            let name = self.expect(TokenKind::Ident, "a type parameter name")?.text;
            let constraint = if self.eat_word("extends") {
                Some(self.parse_type()?)
            } else {
                None
            };
            let default = if self.eat(TokenKind::Equals) {
                Some(self.parse_type()?)
            } else {
                None
            };
            params.push(self.tree.alloc(
                NodeKind::TypeParam {
                    name,
                    constraint,
                    default,
                },
                Vec::new(),
            ));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::GreaterThan, "`>`")?;
        Ok(params)
    }

    // ---- types ----

    fn parse_type(&mut self) -> Result<NodeId, ParseError> {
        // Leading `|` of a multi-line union.
        self.eat(TokenKind::Pipe);
        self.parse_union_type()
    }

    fn parse_union_type(&mut self) -> Result<NodeId, ParseError> {
        let first = self.parse_intersection_type()?;
        if !self.at(TokenKind::Pipe) {
            return Ok(first);
        }
        let mut members = vec![first];
        while self.eat(TokenKind::Pipe) {
            members.push(self.parse_intersection_type()?);
        }
        Ok(self.tree.alloc(NodeKind::UnionType { members }, Vec::new()))
    }

    fn parse_intersection_type(&mut self) -> Result<NodeId, ParseError> {
        let first = self.parse_operator_type()?;
        if !self.at(TokenKind::Amp) {
            return Ok(first);
        }
        let mut members = vec![first];
        while self.eat(TokenKind::Amp) {
            members.push(self.parse_operator_type()?);
        }
        Ok(self
            .tree
            .alloc(NodeKind::IntersectionType { members }, Vec::new()))
    }

    fn parse_operator_type(&mut self) -> Result<NodeId, ParseError> {
        let op = if self.at_word("keyof") {
            Some(TypeOp::KeyOf)
        } else if self.at_word("readonly")
            && matches!(self.nth(1).kind, TokenKind::LBracket | TokenKind::Ident)
        {
            Some(TypeOp::ReadOnly)
        } else {
            None
        };
        if let Some(op) = op {
            self.bump();
            let ty = self.parse_operator_type()?;
            return Ok(self.tree.alloc(NodeKind::TypeOperator { op, ty }, Vec::new()));
        }
        self.parse_postfix_type()
    }

    fn parse_postfix_type(&mut self) -> Result<NodeId, ParseError> {
        let mut ty = self.parse_primary_type()?;
        while self.at(TokenKind::LBracket) {
            self.bump();
            if self.eat(TokenKind::RBracket) {
                ty = self.tree.alloc(NodeKind::ArrayType { elem: ty }, Vec::new());
            } else {
                let index = self.parse_type()?;
                self.expect(TokenKind::RBracket, "`]`")?;
                ty = self
                    .tree
                    .alloc(NodeKind::IndexedAccessType { obj: ty, index }, Vec::new());
            }
        }
        Ok(ty)
    }

    fn parse_primary_type(&mut self) -> Result<NodeId, ParseError> {
        match self.cur().kind {
            TokenKind::LParen => {
                if self.function_type_ahead() {
                    return self.parse_function_type(Vec::new());
                }
                self.bump();
                let ty = self.parse_type()?;
                self.expect(TokenKind::RParen, "`)`")?;
                Ok(self.tree.alloc(NodeKind::ParenType { ty }, Vec::new()))
            }
            TokenKind::LessThan => {
                let type_params = self.parse_type_params()?;
                self.parse_function_type(type_params)
            }
            TokenKind::LBrace => {
                self.bump();
                let members = self.parse_members()?;
                self.expect(TokenKind::RBrace, "`}`")?;
                Ok(self.tree.alloc(NodeKind::TypeLiteral { members }, Vec::new()))
            }
            TokenKind::LBracket => self.parse_tuple_type(),
            TokenKind::StringLit | TokenKind::NumberLit => {
                let text = self.bump().text;
                Ok(self.tree.alloc(NodeKind::LiteralType { text }, Vec::new()))
            }
            TokenKind::Minus => {
                self.bump();
                let number = self.expect(TokenKind::NumberLit, "a number literal")?.text;
                let mut text = CompactString::from("-");
                text.push_str(&number);
                Ok(self.tree.alloc(NodeKind::LiteralType { text }, Vec::new()))
            }
            TokenKind::Ident => {
                if self.at_word("true") || self.at_word("false") {
                    let text = self.bump().text;
                    return Ok(self.tree.alloc(NodeKind::LiteralType { text }, Vec::new()));
                }
                if self.at_word("typeof") {
                    self.bump();
                    let mut name = self.expect(TokenKind::Ident, "an entity name")?.text;
                    while self.eat(TokenKind::Dot) {
                        name.push('.');
                        name.push_str(&self.expect(TokenKind::Ident, "an entity name")?.text);
                    }
                    return Ok(self.tree.alloc(NodeKind::TypeQuery { name }, Vec::new()));
                }
                if self.at_word("new") {
                    return Err(self.unsupported("constructor type"));
                }
                if KEYWORD_TYPES.contains(&self.cur().text.as_str()) {
                    let name = self.bump().text;
                    return Ok(self.tree.alloc(NodeKind::KeywordType { name }, Vec::new()));
                }
                self.parse_type_reference()
            }
            _ => Err(self.unexpected("a type")),
        }
    }

    fn parse_type_reference(&mut self) -> Result<NodeId, ParseError> {
        let mut name = self.expect(TokenKind::Ident, "a type name")?.text;
        while self.eat(TokenKind::Dot) {
            name.push('.');
            name.push_str(&self.expect(TokenKind::Ident, "a type name")?.text);
        }
        let mut args = Vec::new();
        if self.at(TokenKind::LessThan) {
            self.bump();
            while !self.at(TokenKind::GreaterThan) {
                args.push(self.parse_type()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::GreaterThan, "`>`")?;
        }
        Ok(self.tree.alloc(NodeKind::TypeRef { name, args }, Vec::new()))
    }

    /// Looks past a balanced `( ... )` run to see whether `=>` follows,
    /// which distinguishes a function type from a parenthesized type.
    fn function_type_ahead(&self) -> bool {
        let mut depth = 0usize;
        let mut i = self.pos;
        loop {
            let tok = &self.tokens[i.min(self.tokens.len() - 1)];
            match tok.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        let next = &self.tokens[(i + 1).min(self.tokens.len() - 1)];
                        return next.kind == TokenKind::Arrow;
                    }
                }
                TokenKind::Eof => return false,
                _ => {}
            }
            i += 1;
        }
    }

    fn parse_function_type(&mut self, type_params: Vec<NodeId>) -> Result<NodeId, ParseError> {
        let params = self.parse_params()?;
        self.expect(TokenKind::Arrow, "`=>`")?;
        let return_ty = self.parse_return_type()?;
        Ok(self.tree.alloc(
            NodeKind::FunctionType {
                type_params,
                params,
                return_ty,
            },
            Vec::new(),
        ))
    }

    /// Return types admit predicate forms the general type grammar does not:
    /// `x is T`, `asserts x`, `asserts x is T`.
    fn parse_return_type(&mut self) -> Result<NodeId, ParseError> {
        if self.at_word("asserts") && self.nth(1).kind == TokenKind::Ident {
            self.bump();
            let param = self.bump().text;
            let ty = if self.eat_word("is") {
                Some(self.parse_type()?)
            } else {
                None
            };
            return Ok(self.tree.alloc(
                NodeKind::TypePredicate {
                    asserts: true,
                    param,
                    ty,
                },
                Vec::new(),
            ));
        }
        if self.at(TokenKind::Ident) && self.nth(1).is_ident("is") {
            let param = self.bump().text;
            self.bump();
            let ty = Some(self.parse_type()?);
            return Ok(self.tree.alloc(
                NodeKind::TypePredicate {
                    asserts: false,
                    param,
                    ty,
                },
                Vec::new(),
            ));
        }
        self.parse_type()
    }

    fn parse_tuple_type(&mut self) -> Result<NodeId, ParseError> {
        self.expect(TokenKind::LBracket, "`[`")?;
        let mut elements = Vec::new();
        while !self.at(TokenKind::RBracket) {
            let leading = self.take_leading();
            let id = self.parse_tuple_element()?;
            if !leading.is_empty() {
                self.tree.set_leading(id, leading);
            }
            elements.push(id);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBracket, "`]`")?;
        Ok(self.tree.alloc(NodeKind::TupleType { elements }, Vec::new()))
    }

    fn parse_tuple_element(&mut self) -> Result<NodeId, ParseError> {
        if self.eat(TokenKind::DotDotDot) {
            if self.at(TokenKind::Ident)
                && (self.nth(1).kind == TokenKind::Colon
                    || (self.nth(1).kind == TokenKind::Question
                        && self.nth(2).kind == TokenKind::Colon))
            {
                let label = self.bump().text;
                let optional = self.eat(TokenKind::Question);
                self.expect(TokenKind::Colon, "`:`")?;
                let ty = self.parse_type()?;
                return Ok(self.tree.alloc(
                    NodeKind::NamedTupleMember {
                        label,
                        rest: true,
                        optional,
                        ty,
                    },
                    Vec::new(),
                ));
            }
            let ty = self.parse_type()?;
            return Ok(self.tree.alloc(NodeKind::RestType { ty }, Vec::new()));
        }
        if self.at(TokenKind::Ident)
            && (self.nth(1).kind == TokenKind::Colon
                || (self.nth(1).kind == TokenKind::Question
                    && self.nth(2).kind == TokenKind::Colon))
        {
            let label = self.bump().text;
            let optional = self.eat(TokenKind::Question);
            self.expect(TokenKind::Colon, "`:`")?;
            let ty = self.parse_type()?;
            return Ok(self.tree.alloc(
                NodeKind::NamedTupleMember {
                    label,
                    rest: false,
                    optional,
                    ty,
                },
                Vec::new(),
            ));
        }
        let ty = self.parse_type()?;
        if self.eat(TokenKind::Question) {
            return Ok(self.tree.alloc(NodeKind::OptionalType { ty }, Vec::new()));
        }
        Ok(ty)
    }
}
