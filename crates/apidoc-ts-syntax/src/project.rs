//! Cross-file type graph over every loaded [`SourceFile`].
//!
//! The project answers the handful of questions the documentation core asks:
//! which scope a dotted name lives in, what a declared type expands to, and
//! which property symbols a type exposes. Everything is addressed through
//! small `Copy` handles so callers never hold borrows across lookups.

use crate::ast::*;
use crate::error::LoadError;
use crate::reader::parse_source;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Built-in type keywords; references to them never consult declarations.
const PRIMITIVES: &[&str] = &[
    "string", "number", "boolean", "any", "unknown", "never", "void", "null", "undefined",
    "object", "symbol", "bigint",
];

/// Extensions tried, in order, when a module specifier has none.
const MODULE_SUFFIXES: &[&str] = &[".ts", ".tsx", ".d.ts", "/index.ts", "/index.d.ts"];

/// Alias chains longer than this are treated as unresolved.
const MAX_ALIAS_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeRef {
    pub file: FileId,
    pub scope: ScopeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterfaceRef {
    pub scope: ScopeRef,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumRef {
    pub scope: ScopeRef,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AliasRef {
    pub scope: ScopeRef,
    pub index: usize,
}

/// What a name resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Declaration {
    Interface(InterfaceRef),
    Enum(EnumRef),
    Alias(AliasRef),
    Namespace(ScopeRef),
}

/// A checked type: the text it prints as and what it resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    text: String,
    kind: TypeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Primitive,
    Enum(EnumRef),
    Interface(InterfaceRef),
    /// Object literal, either inline or named through a type alias.
    Object {
        members: Vec<Member>,
        scope: ScopeRef,
        alias: Option<AliasRef>,
    },
    Array(Box<Type>),
    /// Unions, tuples, literals, function types and unknown names.
    Unresolved,
}

/// The named declaration a type originates from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSymbol {
    pub name: String,
    pub file: FileId,
    pub declaration: Declaration,
}

impl Type {
    fn new(text: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    fn unresolved(text: impl Into<String>) -> Self {
        Self::new(text, TypeKind::Unresolved)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.kind, TypeKind::Enum(_))
    }

    /// Element type for arrays, the type itself otherwise.
    pub fn element(&self) -> &Type {
        match &self.kind {
            TypeKind::Array(inner) => inner,
            _ => self,
        }
    }

    /// Named origin of this type. Inline object literals and primitives have none.
    pub fn symbol(&self) -> Option<TypeSymbol> {
        let (declaration, file) = match &self.kind {
            TypeKind::Interface(r) => (Declaration::Interface(*r), r.scope.file),
            TypeKind::Enum(r) => (Declaration::Enum(*r), r.scope.file),
            TypeKind::Object {
                alias: Some(r), ..
            } => (Declaration::Alias(*r), r.scope.file),
            _ => return None,
        };
        Some(TypeSymbol {
            name: self.text.clone(),
            file,
            declaration,
        })
    }
}

/// A property as seen through a type.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    /// `None` for methods, which have no property declaration.
    pub declaration: Option<PropertyDecl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub property: Property,
    /// Scope the property was written in; its type is read from here.
    pub scope: ScopeRef,
}

impl Symbol {
    fn from_member(member: &Member, scope: ScopeRef) -> Option<Self> {
        match member {
            Member::Property(p) => Some(Symbol {
                name: p.name.clone(),
                declaration: Some(PropertyDecl {
                    property: p.clone(),
                    scope,
                }),
            }),
            Member::Method { name, .. } => Some(Symbol {
                name: name.clone(),
                declaration: None,
            }),
            Member::Signature => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Project {
    files: Vec<SourceFile>,
    by_path: HashMap<PathBuf, FileId>,
    ambient: Vec<FileId>,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Read and parse a file from disk. Adding the same path twice returns the cached file.
    pub fn add_source_file(&mut self, path: &Path) -> Result<FileId, LoadError> {
        let path = normalize_path(path);
        if let Some(id) = self.by_path.get(&path) {
            return Ok(*id);
        }
        let text = fs::read_to_string(&path).map_err(|source| LoadError::Read {
            path: path.clone(),
            source,
        })?;
        Ok(self.insert(path, &text))
    }

    /// Parse in-memory text under `path`. Adding the same path twice returns the cached file.
    pub fn add_source_text(&mut self, path: &Path, text: &str) -> FileId {
        let path = normalize_path(path);
        match self.by_path.get(&path) {
            Some(id) => *id,
            None => self.insert(path, text),
        }
    }

    /// Load a file whose root declarations act as globals for every other file.
    pub fn add_ambient_file(&mut self, path: &Path) -> Result<FileId, LoadError> {
        let id = self.add_source_file(path)?;
        self.mark_ambient(id);
        Ok(id)
    }

    fn mark_ambient(&mut self, id: FileId) {
        if !self.ambient.contains(&id) {
            self.ambient.push(id);
        }
    }

    fn insert(&mut self, path: PathBuf, text: &str) -> FileId {
        let id = FileId(self.files.len());
        let file = parse_source(path.clone(), text);
        debug!(
            path = %path.display(),
            scopes = file.scopes.len(),
            imports = file.imports.len(),
            "parsed source file"
        );
        self.files.push(file);
        self.by_path.insert(path, id);
        id
    }

    /// Load every relative module `file` depends on, transitively.
    /// Returns the dependencies in discovery order, `file` itself excluded.
    pub fn resolve_dependencies(&mut self, file: FileId) -> Vec<FileId> {
        let mut seen = HashSet::from([file]);
        let mut queue = vec![file];
        let mut order = Vec::new();
        let mut next = 0;

        while next < queue.len() {
            let current = queue[next];
            next += 1;
            let dir = self.directory(current);
            let specifiers: Vec<String> = self
                .file(current)
                .module_specifiers()
                .filter(|s| is_relative(s))
                .map(String::from)
                .collect();

            for spec in specifiers {
                match self.load_module(&dir, &spec) {
                    Some(dep) => {
                        if seen.insert(dep) {
                            order.push(dep);
                            queue.push(dep);
                        }
                    }
                    None => warn!(
                        module = %spec,
                        from = %self.path(current).display(),
                        "could not resolve module"
                    ),
                }
            }
        }

        order
    }

    fn load_module(&mut self, dir: &Path, spec: &str) -> Option<FileId> {
        for candidate in module_candidates(dir, spec) {
            if let Some(id) = self.file_id(&candidate) {
                return Some(id);
            }
            if candidate.is_file() {
                return match self.add_source_file(&candidate) {
                    Ok(id) => Some(id),
                    Err(e) => {
                        warn!("{e}");
                        None
                    }
                };
            }
        }
        None
    }

    /// Already-loaded file a relative specifier points at.
    fn module(&self, from: FileId, spec: &str) -> Option<FileId> {
        if !is_relative(spec) {
            return None;
        }
        module_candidates(&self.directory(from), spec)
            .iter()
            .find_map(|c| self.file_id(c))
    }

    // ── Files and scopes ─────────────────────────────────────────────

    pub fn file(&self, id: FileId) -> &SourceFile {
        &self.files[id.0]
    }

    pub fn file_id(&self, path: &Path) -> Option<FileId> {
        self.by_path.get(&normalize_path(path)).copied()
    }

    pub fn path(&self, id: FileId) -> &Path {
        &self.files[id.0].path
    }

    fn directory(&self, id: FileId) -> PathBuf {
        self.path(id)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    pub fn is_ambient(&self, id: FileId) -> bool {
        self.ambient.contains(&id)
    }

    pub fn root_scope(&self, file: FileId) -> ScopeRef {
        ScopeRef {
            file,
            scope: ScopeId::ROOT,
        }
    }

    pub fn scope(&self, r: ScopeRef) -> &Scope {
        self.file(r.file).scope(r.scope)
    }

    pub fn parent_scope(&self, r: ScopeRef) -> Option<ScopeRef> {
        self.scope(r).parent.map(|scope| ScopeRef {
            file: r.file,
            scope,
        })
    }

    /// Direct child namespace `name` of `r`.
    pub fn child_namespace(&self, r: ScopeRef, name: &str) -> Option<ScopeRef> {
        self.scope(r).namespace(name).map(|scope| ScopeRef {
            file: r.file,
            scope,
        })
    }

    /// Interface declared directly in `r`; enclosing scopes are not searched.
    pub fn find_interface(&self, r: ScopeRef, name: &str) -> Option<InterfaceRef> {
        self.scope(r)
            .interface(name)
            .map(|index| InterfaceRef { scope: r, index })
    }

    pub fn interface(&self, r: InterfaceRef) -> &Interface {
        &self.scope(r.scope).interfaces[r.index]
    }

    pub fn alias(&self, r: AliasRef) -> &TypeAlias {
        &self.scope(r.scope).aliases[r.index]
    }

    // ── Name resolution ──────────────────────────────────────────────

    /// Resolve a possibly dotted name as written in scope `from`: enclosing scopes
    /// first, then the file's imports, then ambient globals.
    pub fn resolve_reference(&self, from: ScopeRef, name: &str) -> Option<Declaration> {
        let segments: Vec<&str> = name.split('.').collect();
        let (first, rest) = segments.split_first()?;
        let mut decl = self.resolve_first(from, first, !rest.is_empty())?;

        for (i, segment) in rest.iter().enumerate() {
            let last = i + 1 == rest.len();
            decl = match decl {
                Declaration::Namespace(scope) => self.member(scope, segment, !last)?,
                // `Color.Red` names a member of an enum; its type is the enum.
                Declaration::Enum(e) if last => Declaration::Enum(e),
                _ => return None,
            };
        }

        Some(decl)
    }

    /// Like [`Project::resolve_reference`], but only accepts interfaces.
    pub fn resolve_interface(&self, from: ScopeRef, name: &str) -> Option<InterfaceRef> {
        match self.resolve_reference(from, name) {
            Some(Declaration::Interface(r)) => Some(r),
            _ => None,
        }
    }

    /// Direct member of `scope`. Intermediate segments of a dotted name prefer namespaces.
    fn member(&self, scope: ScopeRef, name: &str, want_namespace: bool) -> Option<Declaration> {
        let s = self.scope(scope);
        let namespace = || {
            s.namespace(name).map(|id| {
                Declaration::Namespace(ScopeRef {
                    file: scope.file,
                    scope: id,
                })
            })
        };
        let enum_decl = || {
            s.enum_decl(name)
                .map(|index| Declaration::Enum(EnumRef { scope, index }))
        };

        if want_namespace {
            return namespace().or_else(enum_decl);
        }
        s.interface(name)
            .map(|index| Declaration::Interface(InterfaceRef { scope, index }))
            .or_else(enum_decl)
            .or_else(|| {
                s.alias(name)
                    .map(|index| Declaration::Alias(AliasRef { scope, index }))
            })
    }

    fn resolve_first(
        &self,
        from: ScopeRef,
        name: &str,
        want_namespace: bool,
    ) -> Option<Declaration> {
        let mut scope = Some(from);
        while let Some(s) = scope {
            if let Some(d) = self.member(s, name, want_namespace) {
                return Some(d);
            }
            scope = self.parent_scope(s);
        }

        let mut visited = HashSet::new();
        if let Some(d) = self.imported(from.file, name, want_namespace, &mut visited) {
            return Some(d);
        }

        self.ambient
            .iter()
            .find_map(|&f| self.member(self.root_scope(f), name, want_namespace))
    }

    /// Resolve a local name bound by one of `file`'s import statements.
    fn imported(
        &self,
        file: FileId,
        local: &str,
        want_namespace: bool,
        visited: &mut HashSet<(FileId, String)>,
    ) -> Option<Declaration> {
        for import in &self.file(file).imports {
            for binding in &import.bindings {
                match binding {
                    ImportBinding::Named { imported, local: l } if l == local => {
                        let target = self.module(file, &import.source)?;
                        return self.exported(target, imported, want_namespace, visited);
                    }
                    ImportBinding::Namespace { local: l } if l == local => {
                        let target = self.module(file, &import.source)?;
                        return Some(Declaration::Namespace(self.root_scope(target)));
                    }
                    _ => {}
                }
            }
        }
        None
    }

    /// Resolve `name` as exported by `file`, following re-exports.
    fn exported(
        &self,
        file: FileId,
        name: &str,
        want_namespace: bool,
        visited: &mut HashSet<(FileId, String)>,
    ) -> Option<Declaration> {
        if !visited.insert((file, name.to_string())) {
            return None;
        }
        if let Some(d) = self.member(self.root_scope(file), name, want_namespace) {
            return Some(d);
        }

        for reexport in &self.file(file).reexports {
            let target = reexport
                .source
                .as_deref()
                .and_then(|spec| self.module(file, spec));
            match (&reexport.names, target) {
                (Some(names), _) => {
                    let Some((original, _)) = names.iter().find(|(_, exported)| exported == name)
                    else {
                        continue;
                    };
                    let found = match target {
                        Some(t) => self.exported(t, original, want_namespace, visited),
                        // `export { A as B }` of something imported or declared locally.
                        None => self
                            .member(self.root_scope(file), original, want_namespace)
                            .or_else(|| self.imported(file, original, want_namespace, visited)),
                    };
                    if found.is_some() {
                        return found;
                    }
                }
                (None, Some(t)) => {
                    if let Some(d) = self.exported(t, name, want_namespace, visited) {
                        return Some(d);
                    }
                }
                (None, None) => {}
            }
        }

        None
    }

    // ── Types ────────────────────────────────────────────────────────

    /// The type an interface declaration denotes.
    pub fn interface_type(&self, r: InterfaceRef) -> Type {
        Type::new(self.interface(r).name.as_str(), TypeKind::Interface(r))
    }

    /// Check a type expression written in scope `from`.
    pub fn type_of(&self, from: ScopeRef, expr: &TypeExpr) -> Type {
        self.check(from, expr, 0)
    }

    fn check(&self, from: ScopeRef, expr: &TypeExpr, depth: usize) -> Type {
        if depth > MAX_ALIAS_DEPTH {
            return Type::unresolved(expr.to_string());
        }

        match expr {
            TypeExpr::Reference { name, .. } => {
                if PRIMITIVES.contains(&name.as_str()) {
                    return Type::new(name.as_str(), TypeKind::Primitive);
                }
                let text = expr.to_string();
                match self.resolve_reference(from, name) {
                    Some(Declaration::Interface(r)) => Type::new(text, TypeKind::Interface(r)),
                    Some(Declaration::Enum(r)) => Type::new(text, TypeKind::Enum(r)),
                    Some(Declaration::Alias(r)) => self.expand_alias(r, depth),
                    _ => Type::unresolved(text),
                }
            }
            TypeExpr::Array(inner) => {
                let element = self.check(from, inner, depth);
                let text = if element.text.contains(['|', '&']) {
                    format!("({})[]", element.text)
                } else {
                    format!("{}[]", element.text)
                };
                Type::new(text, TypeKind::Array(Box::new(element)))
            }
            TypeExpr::Object(members) => Type::new(
                expr.to_string(),
                TypeKind::Object {
                    members: members.clone(),
                    scope: from,
                    alias: None,
                },
            ),
            TypeExpr::Union(items) => {
                let kept: Vec<&TypeExpr> = items.iter().filter(|t| !is_nullish(t)).collect();
                match kept.as_slice() {
                    [single] => self.check(from, single, depth),
                    _ => Type::unresolved(
                        kept.iter()
                            .map(|t| self.check(from, t, depth).text)
                            .collect::<Vec<_>>()
                            .join(" | "),
                    ),
                }
            }
            _ => Type::unresolved(expr.to_string()),
        }
    }

    fn expand_alias(&self, r: AliasRef, depth: usize) -> Type {
        let alias = self.alias(r);
        let target = self.check(r.scope, &alias.ty, depth + 1);
        match target.kind {
            TypeKind::Object {
                members,
                scope,
                alias: None,
            } => Type::new(
                alias.name.as_str(),
                TypeKind::Object {
                    members,
                    scope,
                    alias: Some(r),
                },
            ),
            _ => target,
        }
    }

    /// Property symbols of a type: own members first, then inherited ones not overridden.
    pub fn properties_of(&self, ty: &Type) -> Vec<Symbol> {
        match &ty.kind {
            TypeKind::Interface(r) => {
                let mut out = Vec::new();
                self.collect_properties(*r, &mut out, &mut HashSet::new());
                out
            }
            TypeKind::Object { members, scope, .. } => members
                .iter()
                .filter_map(|m| Symbol::from_member(m, *scope))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn collect_properties(
        &self,
        r: InterfaceRef,
        out: &mut Vec<Symbol>,
        visited: &mut HashSet<InterfaceRef>,
    ) {
        if !visited.insert(r) {
            return;
        }
        let iface = self.interface(r);
        for member in &iface.members {
            if let Some(sym) = Symbol::from_member(member, r.scope) {
                if !out.iter().any(|s| s.name == sym.name) {
                    out.push(sym);
                }
            }
        }
        for base in &iface.extends {
            if let Some(b) = self.resolve_interface(r.scope, base) {
                self.collect_properties(b, out, visited);
            }
        }
    }
}

fn is_nullish(t: &TypeExpr) -> bool {
    matches!(t, TypeExpr::Reference { name, .. } if name == "undefined" || name == "null")
}

fn is_relative(spec: &str) -> bool {
    spec.starts_with("./") || spec.starts_with("../")
}

/// Paths a relative module specifier may refer to, most specific first.
fn module_candidates(dir: &Path, spec: &str) -> Vec<PathBuf> {
    let base = dir.join(spec);
    let mut out = Vec::new();
    if let Some(stem) = spec.strip_suffix(".js") {
        out.push(dir.join(format!("{stem}.ts")));
    }
    if [".ts", ".tsx", ".mts", ".cts"]
        .iter()
        .any(|ext| spec.ends_with(ext))
    {
        out.push(base.clone());
    }
    for suffix in MODULE_SUFFIXES {
        let mut path = base.clone().into_os_string();
        path.push(suffix);
        out.push(PathBuf::from(path));
    }
    out
}

/// Absolute path with `.` and `..` removed lexically. Symlinks are not followed.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
