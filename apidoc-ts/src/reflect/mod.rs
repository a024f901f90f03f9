//! Type reflection: turns one parsed tag into flattened documentation entries.
//!
//! [`expand`] resolves the tag's root reference, then the flattener (for
//! interface declarations) and the property walker (for anything only known
//! through the type graph) recurse into nested types. Every entry carries the
//! dot-joined path of names traversed to reach it.

pub mod classify;
pub mod external;
pub mod flatten;
pub mod namespace;

pub use classify::{classify, label, Category, LabelStyle};

use crate::context::{Context, Options};
use apidoc_ts_syntax::ast::TypeExpr;
use apidoc_ts_syntax::{Annotation, Declaration, InterfaceRef, LoadError, TypeKind};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// One documented field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocEntry {
    pub category: Category,
    pub label: String,
    pub path: String,
    pub description: String,
}

impl DocEntry {
    /// `{Label} path description`, the payload of a synthesized element.
    pub fn content(&self) -> String {
        if self.description.is_empty() {
            format!("{{{}}} {}", self.label, self.path)
        } else {
            format!("{{{}}} {} {}", self.label, self.path, self.description)
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("could not find namespace «{segment}» in file «{}»", .file.display())]
    MissingNamespace { segment: String, file: PathBuf },
    #[error("could not find interface «{name}» in file «{}»", .file.display())]
    MissingInterface { name: String, file: PathBuf },
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Resolve the root reference of `annotation`, written in `file`, and flatten it.
///
/// `default_field` names the root entry when the tag has no field name.
pub fn expand(
    ctx: &mut Context,
    annotation: &Annotation,
    file: &Path,
    default_field: &str,
) -> Result<Vec<DocEntry>, ResolveError> {
    let interface_path = match &annotation.file_path {
        Some(relative) => file
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(relative.trim()),
        None => file.to_path_buf(),
    };
    let file_id = ctx.register(&interface_path)?;

    let ctx: &Context = ctx;
    let project = ctx.project();
    let reference = annotation.type_reference.as_str();
    let (mut is_array, element) = match namespace::match_array(reference) {
        Some(element) => (true, element),
        None => (false, reference),
    };
    let field = annotation.field_name.as_deref();
    let root_path = field.unwrap_or(default_field);
    let description = annotation.description.clone();
    let mut out = Expander::new(ctx);

    if classify::is_native(element) {
        let text = if is_array {
            format!("{element}[]")
        } else {
            element.to_string()
        };
        out.emit_typed(&text, false, root_path.to_string(), description);
        return Ok(out.finish());
    }

    let root = project.root_scope(file_id);
    let lookup = namespace::extract_namespace(project, root, element);
    let Some(scope) = lookup.scope else {
        return Err(ResolveError::MissingNamespace {
            segment: lookup.missing.unwrap_or_default(),
            file: project.path(file_id).to_path_buf(),
        });
    };

    let mut ty = match project.find_interface(scope, &lookup.leaf_name) {
        Some(r) => project.interface_type(r),
        // Aliases, enums and imported names.
        None => project.type_of(scope, &TypeExpr::named(&lookup.leaf_name)),
    };
    if let TypeKind::Array(inner) = ty.kind() {
        let inner = (**inner).clone();
        is_array = true;
        ty = inner;
    }
    debug!(reference, resolved = ty.text(), is_array, "expanding root type");

    match ty.kind() {
        TypeKind::Interface(r) if is_array => {
            out.emit(Category::ObjectArray, root_path.to_string(), description);
            out.flatten(*r, Some(root_path));
        }
        TypeKind::Interface(r) => out.flatten(*r, field),
        TypeKind::Object { .. } => {
            let symbols = project.properties_of(&ty);
            if is_array {
                out.emit(Category::ObjectArray, root_path.to_string(), description);
                out.walk_guarded(ty.symbol(), &symbols, Some(root_path));
            } else {
                out.walk_guarded(ty.symbol(), &symbols, field);
            }
        }
        TypeKind::Primitive | TypeKind::Enum(_) => {
            let text = if is_array {
                format!("{}[]", ty.text())
            } else {
                ty.text().to_string()
            };
            out.emit_typed(&text, ty.is_enum(), root_path.to_string(), description);
        }
        TypeKind::Array(_) | TypeKind::Unresolved => {
            return Err(ResolveError::MissingInterface {
                name: reference.to_string(),
                file: project.path(file_id).to_path_buf(),
            });
        }
    }

    Ok(out.finish())
}

/// Accumulates entries for one tag.
pub(crate) struct Expander<'a> {
    ctx: &'a Context,
    entries: Vec<DocEntry>,
    paths: HashSet<String>,
    /// Declarations being expanded on the current path.
    stack: Vec<Declaration>,
    /// Redeclared properties already emitted where an ancestor declares them.
    overridden: HashSet<(InterfaceRef, String)>,
}

impl<'a> Expander<'a> {
    pub(crate) fn new(ctx: &'a Context) -> Self {
        Self {
            ctx,
            entries: Vec::new(),
            paths: HashSet::new(),
            stack: Vec::new(),
            overridden: HashSet::new(),
        }
    }

    fn options(&self) -> &'a Options {
        self.ctx.options()
    }

    pub(crate) fn finish(self) -> Vec<DocEntry> {
        self.entries
    }

    fn push(&mut self, entry: DocEntry) {
        if self.options().dedupe_paths && !self.paths.insert(entry.path.clone()) {
            debug!(path = %entry.path, "skipping duplicate path");
            return;
        }
        self.entries.push(entry);
    }

    /// Entry with a fixed category; the label follows from it.
    fn emit(&mut self, category: Category, path: String, description: String) {
        let label = label(category, "", self.options().label_style);
        self.push(DocEntry {
            category,
            label,
            path,
            description,
        });
    }

    /// Entry classified from type text. Returns the category.
    fn emit_typed(&mut self, text: &str, is_enum: bool, path: String, description: String) -> Category {
        let category = classify(text, is_enum);
        self.push(DocEntry {
            category,
            label: label(category, text, self.options().label_style),
            path,
            description,
        });
        category
    }

    /// Mark `decl` as being expanded. Returns false when it already is.
    fn enter(&mut self, decl: Declaration, name: &str) -> bool {
        if self.stack.contains(&decl) {
            warn!("recursive type «{name}» is not expanded again");
            return false;
        }
        self.stack.push(decl);
        true
    }

    fn leave(&mut self) {
        self.stack.pop();
    }
}

/// Accumulated path of `name` under `prefix`.
pub(crate) fn join_path(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}.{name}"),
        None => name.to_string(),
    }
}

/// Description of a field: its doc comment behind the backticked path.
pub(crate) fn describe(path: &str, docs: Option<&str>) -> String {
    match docs.map(|d| d.split('\n').collect::<Vec<_>>().join(" ")) {
        Some(docs) if !docs.is_empty() => format!("`{path}` - {docs}"),
        _ => format!("`{path}`"),
    }
}
