//! Interface flattening: ancestors first, then own properties in declaration
//! order, recursing depth-first into object and array-of-object properties.
//!
//! A property an interface redeclares is emitted where its ancestor first
//! declares it, with the redeclared type and docs.

use super::{describe, join_path, namespace, Expander};
use apidoc_ts_syntax::{Declaration, FileId, InterfaceRef, ScopeRef, Type};
use tracing::{debug, warn};

impl<'a> Expander<'a> {
    /// Emit entries for every property of `iface`, ancestors included, under `prefix`.
    pub(crate) fn flatten(&mut self, iface: InterfaceRef, prefix: Option<&str>) {
        self.flatten_inherited(iface, prefix, &[]);
    }

    /// `descendants` inherit from `iface` on the way down from the flattened
    /// interface, most derived first.
    fn flatten_inherited(
        &mut self,
        iface: InterfaceRef,
        prefix: Option<&str>,
        descendants: &[InterfaceRef],
    ) {
        let ctx = self.ctx;
        let project = ctx.project();
        let decl = project.interface(iface);
        if !self.enter(Declaration::Interface(iface), &decl.name) {
            return;
        }

        let mut chain = descendants.to_vec();
        chain.push(iface);
        for base in &decl.extends {
            match self.ancestor(iface.scope, base) {
                Some(ancestor) => self.flatten_inherited(ancestor, prefix, &chain),
                None => warn!("could not find interface to be extended «{base}»"),
            }
        }

        for prop in decl.properties() {
            let path = join_path(prefix, &prop.name);
            // Already emitted in an ancestor's position
            if self.overridden.contains(&(iface, path.clone())) {
                continue;
            }
            let redeclared = descendants.iter().find_map(|&d| {
                project
                    .interface(d)
                    .properties()
                    .find(|p| p.name == prop.name)
                    .map(|p| (d, p))
            });
            let (owner, prop) = match redeclared {
                Some((owner, prop)) => {
                    debug!(property = %path, "using the redeclared property type");
                    self.overridden.insert((owner, path.clone()));
                    (owner, prop)
                }
                None => (iface, prop),
            };

            let ty = project.type_of(owner.scope, &prop.ty);
            let description = describe(&path, prop.docs.as_deref());
            let category = self.emit_typed(ty.text(), ty.is_enum(), path.clone(), description);
            if category.is_object() {
                self.expand_nested(owner.scope.file, &ty, &path);
            }
        }

        self.leave();
    }

    /// Ancestor named in an `extends` clause: looked up lexically from the
    /// interface's own scope, then through the type graph (imports, globals).
    fn ancestor(&self, scope: ScopeRef, name: &str) -> Option<InterfaceRef> {
        let project = self.ctx.project();
        namespace::lookup_interface(project, scope, name)
            .or_else(|| project.resolve_interface(scope, name))
    }

    /// Expand the properties of an object-typed property declared in `file`.
    fn expand_nested(&mut self, file: FileId, ty: &Type, path: &str) {
        let ctx = self.ctx;
        let project = ctx.project();
        let element = ty.element();
        let root = project.root_scope(file);

        match namespace::lookup_interface(project, root, element.text()) {
            Some(iface) => self.flatten(iface, Some(path)),
            None => {
                let symbols = project.properties_of(element);
                self.walk_guarded(element.symbol(), &symbols, Some(path));
            }
        }
    }
}
