//! TypeScript declaration reader on top of tree-sitter.
//!
//! Interfaces, namespaces, enums, type aliases, imports and re-exports are
//! read into a [`SourceFile`]. Every other statement (functions, classes,
//! variables, expressions) is ignored.

use crate::ast::*;
use std::path::{Path, PathBuf};
use tracing::warn;
use tree_sitter::{Language, Node, Parser, Tree};

/// Parse source text into its declarations.
///
/// Syntax errors are recovered by the grammar; whatever declarations survive
/// are returned. A file the grammar cannot be loaded for comes back empty.
pub fn parse_source(path: impl Into<PathBuf>, src: &str) -> SourceFile {
    let file = SourceFile::new(path.into());
    let Some(tree) = syntax_tree(&file.path, src) else {
        return file;
    };
    let mut reader = Reader { src, file };
    reader.statements(tree.root_node(), ScopeId::ROOT);
    reader.file
}

fn language(path: &Path) -> Language {
    let is_tsx = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext == "tsx" || ext == "jsx");
    if is_tsx {
        tree_sitter_typescript::LANGUAGE_TSX.into()
    } else {
        tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
    }
}

fn syntax_tree(path: &Path, src: &str) -> Option<Tree> {
    let mut parser = Parser::new();
    if let Err(e) = parser.set_language(&language(path)) {
        warn!(path = %path.display(), "failed to load the TypeScript grammar: {e}");
        return None;
    }
    let tree = parser.parse(src, None);
    if tree.is_none() {
        warn!(path = %path.display(), "failed to parse source file");
    }
    tree
}

struct Reader<'a> {
    src: &'a str,
    file: SourceFile,
}

impl<'a> Reader<'a> {
    fn text(&self, node: Node) -> &'a str {
        &self.src[node.byte_range()]
    }

    /// The `/** */` comment right before `node`, gutters stripped.
    fn docs(&self, node: Node) -> Option<String> {
        let prev = node.prev_sibling()?;
        if prev.kind() != "comment" {
            return None;
        }
        let text = self.text(prev);
        text.starts_with("/**").then(|| doc_text(text))
    }

    // ── Statements ───────────────────────────────────────────────────

    fn statements(&mut self, parent: Node, scope: ScopeId) {
        for node in named(parent) {
            self.statement(node, node, scope);
        }
    }

    /// `outer` is the node the doc comment precedes: the statement itself or
    /// the `export` / `declare` wrapping it.
    fn statement(&mut self, node: Node, outer: Node, scope: ScopeId) {
        match node.kind() {
            "interface_declaration" => self.interface(node, outer, scope),
            "enum_declaration" => self.enum_decl(node, outer, scope),
            "type_alias_declaration" => self.alias(node, outer, scope),
            "internal_module" | "module" => self.namespace(node, scope),
            // `namespace A {}` can surface as an expression statement
            "expression_statement" => {
                if let Some(ns) = child_of_kind(node, "internal_module") {
                    self.namespace(ns, scope);
                }
            }
            "export_statement" => self.export(node, scope),
            "ambient_declaration" => self.ambient(node, outer, scope),
            "import_statement" => self.import(node),
            _ => {}
        }
    }

    fn export(&mut self, node: Node, scope: ScopeId) {
        if let Some(decl) = node.child_by_field_name("declaration") {
            return self.statement(decl, node, scope);
        }

        let source = node
            .child_by_field_name("source")
            .map(|s| unquote(self.text(s)));
        let names = match child_of_kind(node, "export_clause") {
            Some(clause) => Some(self.export_names(clause)),
            // `export * from`; `export * as ns from` is a namespace object, not a re-export
            None if has_token(node, "*") && child_of_kind(node, "namespace_export").is_none() => {
                None
            }
            // `export default <expr>`, `export = x`
            None => return,
        };
        if source.is_none() && names.is_none() {
            return;
        }
        self.file.reexports.push(ReExport { source, names });
    }

    /// `{ a, b as c }` → `[(a, a), (b, c)]`.
    fn export_names(&self, clause: Node) -> Vec<(String, String)> {
        named(clause)
            .into_iter()
            .filter(|n| n.kind() == "export_specifier")
            .filter_map(|spec| {
                let original = self.member_name(spec.child_by_field_name("name")?);
                let renamed = spec
                    .child_by_field_name("alias")
                    .map(|a| self.member_name(a))
                    .unwrap_or_else(|| original.clone());
                Some((original, renamed))
            })
            .collect()
    }

    fn ambient(&mut self, node: Node, outer: Node, scope: ScopeId) {
        for child in named(node) {
            match child.kind() {
                // `declare global { ... }` adds to the file root
                "statement_block" => self.statements(child, scope),
                _ => self.statement(child, outer, scope),
            }
        }
    }

    fn interface(&mut self, node: Node, outer: Node, scope: ScopeId) {
        let (Some(name), Some(body)) = (
            node.child_by_field_name("name"),
            node.child_by_field_name("body"),
        ) else {
            return;
        };
        let extends = child_of_kind(node, "extends_type_clause")
            .map(|clause| self.heritage(clause))
            .unwrap_or_default();
        let interface = Interface {
            name: self.text(name).to_string(),
            docs: self.docs(outer),
            extends,
            members: self.members(body),
        };
        self.file.scopes[scope.0].interfaces.push(interface);
    }

    /// Heritage references with type arguments dropped (`NS.Base<T>` → `NS.Base`).
    fn heritage(&self, clause: Node) -> Vec<String> {
        named(clause)
            .into_iter()
            .filter_map(|base| match base.kind() {
                "type_identifier" | "nested_type_identifier" => Some(dotted(self.text(base))),
                "generic_type" => base
                    .child_by_field_name("name")
                    .map(|n| dotted(self.text(n))),
                _ => None,
            })
            .collect()
    }

    fn namespace(&mut self, node: Node, scope: ScopeId) {
        let (Some(name), Some(body)) = (
            node.child_by_field_name("name"),
            node.child_by_field_name("body"),
        ) else {
            return;
        };
        // `declare module "pkg"` describes another package
        if name.kind() == "string" {
            return;
        }
        let inner = self
            .text(name)
            .split('.')
            .map(str::trim)
            .fold(scope, |parent, segment| self.file.namespace_mut(parent, segment));
        self.statements(body, inner);
    }

    fn enum_decl(&mut self, node: Node, outer: Node, scope: ScopeId) {
        let (Some(name), Some(body)) = (
            node.child_by_field_name("name"),
            node.child_by_field_name("body"),
        ) else {
            return;
        };
        let members = named(body)
            .into_iter()
            .filter_map(|member| match member.kind() {
                "enum_assignment" => member
                    .child_by_field_name("name")
                    .map(|n| self.member_name(n)),
                _ => Some(self.member_name(member)),
            })
            .collect();
        let decl = EnumDecl {
            name: self.text(name).to_string(),
            docs: self.docs(outer),
            members,
        };
        self.file.scopes[scope.0].enums.push(decl);
    }

    fn alias(&mut self, node: Node, outer: Node, scope: ScopeId) {
        let (Some(name), Some(value)) = (
            node.child_by_field_name("name"),
            node.child_by_field_name("value"),
        ) else {
            return;
        };
        let alias = TypeAlias {
            name: self.text(name).to_string(),
            docs: self.docs(outer),
            ty: self.type_expr(value),
        };
        self.file.scopes[scope.0].aliases.push(alias);
    }

    fn import(&mut self, node: Node) {
        // import X = require("./x")
        if let Some(clause) = child_of_kind(node, "import_require_clause") {
            let local = child_of_kind(clause, "identifier").map(|n| self.text(n).to_string());
            let source = clause.child_by_field_name("source");
            if let (Some(local), Some(source)) = (local, source) {
                self.file.imports.push(Import {
                    source: unquote(self.text(source)),
                    bindings: vec![ImportBinding::Namespace { local }],
                });
            }
            return;
        }

        let Some(source) = node.child_by_field_name("source") else {
            return;
        };
        let bindings = child_of_kind(node, "import_clause")
            .map(|clause| self.import_bindings(clause))
            .unwrap_or_default();
        self.file.imports.push(Import {
            source: unquote(self.text(source)),
            bindings,
        });
    }

    fn import_bindings(&self, clause: Node) -> Vec<ImportBinding> {
        let mut bindings = Vec::new();
        for child in named(clause) {
            match child.kind() {
                "identifier" => bindings.push(ImportBinding::Default {
                    local: self.text(child).to_string(),
                }),
                "namespace_import" => {
                    if let Some(local) = child_of_kind(child, "identifier") {
                        bindings.push(ImportBinding::Namespace {
                            local: self.text(local).to_string(),
                        });
                    }
                }
                "named_imports" => {
                    for spec in named(child) {
                        let Some(name) = spec.child_by_field_name("name") else {
                            continue;
                        };
                        let imported = self.member_name(name);
                        let local = spec
                            .child_by_field_name("alias")
                            .map(|a| self.text(a).to_string())
                            .unwrap_or_else(|| imported.clone());
                        bindings.push(ImportBinding::Named { imported, local });
                    }
                }
                _ => {}
            }
        }
        bindings
    }

    // ── Members ──────────────────────────────────────────────────────

    /// Members of an `interface_body` or `object_type`.
    fn members(&self, body: Node) -> Vec<Member> {
        named(body)
            .into_iter()
            .filter_map(|member| self.member(member))
            .collect()
    }

    fn member(&self, node: Node) -> Option<Member> {
        let docs = self.docs(node);
        match node.kind() {
            "property_signature" => {
                let name = self.member_name(node.child_by_field_name("name")?);
                Some(Member::Property(Property {
                    name,
                    ty: self.annotated(node.child_by_field_name("type")),
                    docs,
                    optional: has_token(node, "?"),
                }))
            }
            "method_signature" => {
                let name = self.member_name(node.child_by_field_name("name")?);
                // Accessors read like properties
                if has_token(node, "get") || has_token(node, "set") {
                    return Some(Member::Property(Property {
                        name,
                        ty: self.annotated(node.child_by_field_name("return_type")),
                        docs,
                        optional: false,
                    }));
                }
                Some(Member::Method { name, docs })
            }
            "call_signature" | "construct_signature" | "index_signature" => Some(Member::Signature),
            _ => None,
        }
    }

    fn member_name(&self, node: Node) -> String {
        match node.kind() {
            "string" => unquote(self.text(node)),
            _ => self.text(node).to_string(),
        }
    }

    // ── Types ────────────────────────────────────────────────────────

    /// Type of a `type_annotation`; a missing annotation reads as `any`.
    fn annotated(&self, annotation: Option<Node>) -> TypeExpr {
        match annotation.and_then(|a| named(a).into_iter().next()) {
            Some(ty) => self.type_expr(ty),
            None => TypeExpr::named("any"),
        }
    }

    fn type_expr(&self, node: Node) -> TypeExpr {
        match node.kind() {
            "predefined_type" | "type_identifier" | "this_type" => TypeExpr::named(self.text(node)),
            "nested_type_identifier" => TypeExpr::named(&dotted(self.text(node))),
            "generic_type" => self.generic(node),
            "array_type" => match named(node).into_iter().next() {
                Some(inner) => TypeExpr::Array(Box::new(self.type_expr(inner))),
                None => self.opaque(node),
            },
            "readonly_type" | "parenthesized_type" => match named(node).into_iter().next() {
                Some(inner) => self.type_expr(inner),
                None => self.opaque(node),
            },
            "object_type" => TypeExpr::Object(self.members(node)),
            "union_type" => self.flattened(node, TypeExpr::Union),
            "intersection_type" => self.flattened(node, TypeExpr::Intersection),
            "tuple_type" => TypeExpr::Tuple(
                named(node)
                    .into_iter()
                    .map(|element| self.tuple_element(element))
                    .collect(),
            ),
            "literal_type" => match self.text(node) {
                "null" | "undefined" => TypeExpr::named(self.text(node)),
                text => TypeExpr::Literal(normalize(text)),
            },
            "template_literal_type" => TypeExpr::Literal(normalize(self.text(node))),
            _ => self.opaque(node),
        }
    }

    fn generic(&self, node: Node) -> TypeExpr {
        let Some(name) = node.child_by_field_name("name") else {
            return self.opaque(node);
        };
        let name = dotted(self.text(name));
        let mut args: Vec<TypeExpr> = node
            .child_by_field_name("type_arguments")
            .map(|list| named(list).into_iter().map(|a| self.type_expr(a)).collect())
            .unwrap_or_default();
        if name == "Array" && args.len() == 1 {
            return TypeExpr::Array(Box::new(args.remove(0)));
        }
        TypeExpr::Reference { name, args }
    }

    /// `A | B | C` nests left-deep in the tree; collect it into one list.
    fn flattened(&self, node: Node, build: fn(Vec<TypeExpr>) -> TypeExpr) -> TypeExpr {
        let mut items = Vec::new();
        self.collect_operands(node, &mut items);
        if items.len() == 1 {
            return items.remove(0);
        }
        build(items)
    }

    fn collect_operands(&self, node: Node, items: &mut Vec<TypeExpr>) {
        for operand in named(node) {
            if operand.kind() == node.kind() {
                self.collect_operands(operand, items);
            } else {
                items.push(self.type_expr(operand));
            }
        }
    }

    /// Tuple element, with labels (`name: T`), `T?` and `...T` unwrapped.
    fn tuple_element(&self, node: Node) -> TypeExpr {
        match node.kind() {
            "required_parameter" | "optional_parameter" => {
                self.annotated(node.child_by_field_name("type"))
            }
            "optional_type" | "rest_type" => match named(node).into_iter().next() {
                Some(inner) => self.type_expr(inner),
                None => self.opaque(node),
            },
            _ => self.type_expr(node),
        }
    }

    fn opaque(&self, node: Node) -> TypeExpr {
        TypeExpr::Opaque(normalize(self.text(node)))
    }
}

/// Named children of `node`, comments excluded.
fn named<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    let children = node
        .named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .collect();
    children
}

fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|n| n.kind() == kind);
    found
}

/// Whether `node` has the anonymous token `token` as a direct child.
fn has_token(node: Node, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|n| !n.is_named() && n.kind() == token);
    found
}

/// Doc comment body with `/**`, `*/` and leading `*` gutters removed.
pub fn doc_text(comment: &str) -> String {
    let inner = comment.strip_prefix("/**").unwrap_or(comment);
    let inner = inner.strip_suffix("*/").unwrap_or(inner);
    inner
        .lines()
        .map(|l| l.trim().trim_start_matches('*').trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Contents of a string literal. Text that is not a closed literal is returned as is.
fn unquote(text: &str) -> String {
    ['"', '\'', '`']
        .iter()
        .find_map(|q| text.strip_prefix(*q).and_then(|t| t.strip_suffix(*q)))
        .unwrap_or(text)
        .to_string()
}

/// `A . B` → `A.B`.
fn dotted(text: &str) -> String {
    text.split('.').map(str::trim).collect::<Vec<_>>().join(".")
}

fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
