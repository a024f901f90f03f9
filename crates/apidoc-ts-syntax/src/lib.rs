//! Declaration-level TypeScript reader and type graph used by apidoc-ts,
//! plus the payload grammar of its interface tags.

pub mod annotation;
pub mod ast;
mod error;
pub mod project;
pub mod reader;

pub use annotation::Annotation;
pub use error::LoadError;
pub use reader::parse_source;
pub use project::{
    normalize_path, AliasRef, Declaration, EnumRef, FileId, InterfaceRef, Project, PropertyDecl,
    ScopeRef, Symbol, Type, TypeKind, TypeSymbol,
};
