//! Declaration model produced by the reader. Owned, no borrowed source.

use std::fmt;
use std::path::PathBuf;

/// Index of a scope inside its [`SourceFile`]. The file root is always `ScopeId(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub usize);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);
}

/// One parsed source file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Flattened namespace tree; `scopes[0]` is the file root.
    pub scopes: Vec<Scope>,
    pub imports: Vec<Import>,
    pub reexports: Vec<ReExport>,
}

impl SourceFile {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            scopes: vec![Scope::default()],
            imports: Vec::new(),
            reexports: Vec::new(),
        }
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    /// Find or create the child namespace `name` of `parent` (namespaces merge).
    pub fn namespace_mut(&mut self, parent: ScopeId, name: &str) -> ScopeId {
        if let Some(id) = self.scopes[parent.0].namespace(name) {
            return id;
        }
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            name: name.to_string(),
            parent: Some(parent),
            ..Default::default()
        });
        self.scopes[parent.0].namespaces.push((name.to_string(), id));
        id
    }

    /// Every relative module specifier this file depends on.
    pub fn module_specifiers(&self) -> impl Iterator<Item = &str> {
        self.imports
            .iter()
            .map(|i| i.source.as_str())
            .chain(self.reexports.iter().filter_map(|r| r.source.as_deref()))
    }
}

/// A namespace scope: the file root or a `namespace`/`module` block.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    /// Empty for the file root.
    pub name: String,
    pub parent: Option<ScopeId>,
    pub namespaces: Vec<(String, ScopeId)>,
    pub interfaces: Vec<Interface>,
    pub enums: Vec<EnumDecl>,
    pub aliases: Vec<TypeAlias>,
}

impl Scope {
    pub fn namespace(&self, name: &str) -> Option<ScopeId> {
        self.namespaces
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| *id)
    }

    pub fn interface(&self, name: &str) -> Option<usize> {
        self.interfaces.iter().position(|i| i.name == name)
    }

    pub fn enum_decl(&self, name: &str) -> Option<usize> {
        self.enums.iter().position(|e| e.name == name)
    }

    pub fn alias(&self, name: &str) -> Option<usize> {
        self.aliases.iter().position(|a| a.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    pub name: String,
    pub docs: Option<String>,
    /// Heritage references as written, type arguments dropped (`NS.Base`).
    pub extends: Vec<String>,
    pub members: Vec<Member>,
}

impl Interface {
    /// Property signatures in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.members.iter().filter_map(|m| match m {
            Member::Property(p) => Some(p),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Property(Property),
    Method { name: String, docs: Option<String> },
    /// Index, call and construct signatures.
    Signature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub ty: TypeExpr,
    pub docs: Option<String>,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub docs: Option<String>,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAlias {
    pub name: String,
    pub docs: Option<String>,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub source: String,
    pub bindings: Vec<ImportBinding>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportBinding {
    /// `import { imported as local }`
    Named { imported: String, local: String },
    /// `import * as local` and `import local = require(...)`
    Namespace { local: String },
    /// `import local from`
    Default { local: String },
}

/// `export ... from` or a local `export { ... }` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReExport {
    /// `None` for a local `export { A as B }`.
    pub source: Option<String>,
    /// `(name in source, exported name)`; `None` for `export *`.
    pub names: Option<Vec<(String, String)>>,
}

/// A type expression as written in a declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// Possibly dotted name with type arguments (`NS.Box<string>`).
    Reference { name: String, args: Vec<TypeExpr> },
    /// `T[]` and `Array<T>`.
    Array(Box<TypeExpr>),
    /// Inline object literal type.
    Object(Vec<Member>),
    Union(Vec<TypeExpr>),
    Intersection(Vec<TypeExpr>),
    Tuple(Vec<TypeExpr>),
    /// String, number and boolean literal types.
    Literal(String),
    /// Anything the reader does not model, kept as normalized source text.
    Opaque(String),
}

impl TypeExpr {
    pub fn named(name: &str) -> Self {
        TypeExpr::Reference {
            name: name.to_string(),
            args: Vec::new(),
        }
    }

    fn needs_parens_in_array(&self) -> bool {
        matches!(
            self,
            TypeExpr::Union(_) | TypeExpr::Intersection(_) | TypeExpr::Opaque(_)
        )
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Reference { name, args } => {
                write!(f, "{}", name)?;
                if !args.is_empty() {
                    write!(f, "<{}>", join(args, ", "))?;
                }
                Ok(())
            }
            TypeExpr::Array(inner) if inner.needs_parens_in_array() => write!(f, "({})[]", inner),
            TypeExpr::Array(inner) => write!(f, "{}[]", inner),
            TypeExpr::Object(members) => {
                write!(f, "{{")?;
                for m in members {
                    if let Member::Property(p) = m {
                        let opt = if p.optional { "?" } else { "" };
                        write!(f, " {}{}: {};", p.name, opt, p.ty)?;
                    }
                }
                write!(f, " }}")
            }
            TypeExpr::Union(items) => write!(f, "{}", join(items, " | ")),
            TypeExpr::Intersection(items) => write!(f, "{}", join(items, " & ")),
            TypeExpr::Tuple(items) => write!(f, "[{}]", join(items, ", ")),
            TypeExpr::Literal(text) | TypeExpr::Opaque(text) => write!(f, "{}", text),
        }
    }
}

fn join(items: &[TypeExpr], sep: &str) -> String {
    items
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_prints_with_brackets() {
        let t = TypeExpr::Array(Box::new(TypeExpr::named("SquareConfig")));
        assert_eq!(t.to_string(), "SquareConfig[]");
    }

    #[test]
    fn union_array_is_parenthesized() {
        let t = TypeExpr::Array(Box::new(TypeExpr::Union(vec![
            TypeExpr::named("string"),
            TypeExpr::named("number"),
        ])));
        assert_eq!(t.to_string(), "(string | number)[]");
    }

    #[test]
    fn object_literal_prints_members() {
        let t = TypeExpr::Object(vec![Member::Property(Property {
            name: "x".into(),
            ty: TypeExpr::named("number"),
            docs: None,
            optional: true,
        })]);
        assert_eq!(t.to_string(), "{ x?: number; }");
    }

    #[test]
    fn namespaces_merge() {
        let mut file = SourceFile::new(PathBuf::from("a.ts"));
        let a = file.namespace_mut(ScopeId::ROOT, "A");
        let again = file.namespace_mut(ScopeId::ROOT, "A");
        assert_eq!(a, again);
        assert_eq!(file.scopes.len(), 2);
        assert_eq!(file.scope(a).parent, Some(ScopeId::ROOT));
    }
}
