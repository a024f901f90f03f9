//! apidoc-ts: expand `@apiInterfaceSuccess` / `@apiInterfaceParam` tags into
//! per-field `@apiSuccess` / `@apiParam` elements by reflecting on TypeScript
//! interface declarations.

pub mod context;
pub mod hooks;
pub mod logging;
pub mod model;
pub mod parser;
pub mod plugin;
pub mod reflect;
pub mod render;

pub use context::{Context, Options};
pub use reflect::{expand, Category, DocEntry, LabelStyle, ResolveError};
