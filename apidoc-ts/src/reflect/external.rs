//! Property walking over the type graph, for object types that are not a
//! locally visible interface declaration: aliases, inline literals, and types
//! declared in other files.

use super::{describe, join_path, Expander};
use apidoc_ts_syntax::{Symbol, TypeSymbol};
use tracing::debug;

impl<'a> Expander<'a> {
    /// Walk `symbols` under `prefix`, unless the type they belong to is
    /// already being expanded.
    pub(crate) fn walk_guarded(
        &mut self,
        origin: Option<TypeSymbol>,
        symbols: &[Symbol],
        prefix: Option<&str>,
    ) {
        match origin {
            Some(origin) => {
                if self.enter(origin.declaration, &origin.name) {
                    self.walk_properties(symbols, prefix);
                    self.leave();
                }
            }
            None => self.walk_properties(symbols, prefix),
        }
    }

    /// Emit one entry per user-declared symbol, recursing into object types.
    ///
    /// Labels come from the same classification the flattener uses, so a
    /// `string[]` property reached through an alias reads `String[]` rather
    /// than `Object[]`.
    pub(crate) fn walk_properties(&mut self, symbols: &[Symbol], prefix: Option<&str>) {
        let ctx = self.ctx;
        let project = ctx.project();

        for symbol in symbols {
            let Some(decl) = &symbol.declaration else {
                continue;
            };
            if !ctx.is_user_declared(decl.scope.file) {
                debug!(property = %symbol.name, "skipping property from a library file");
                continue;
            }

            let path = join_path(prefix, &symbol.name);
            let ty = project.type_of(decl.scope, &decl.property.ty);
            let description = describe(&path, decl.property.docs.as_deref());

            let category = self.emit_typed(ty.text(), ty.is_enum(), path.clone(), description);
            if !category.is_object() {
                continue;
            }

            let element = ty.element();
            match element.symbol() {
                // Anonymous shape: its members land beside the property.
                None => {
                    let nested = project.properties_of(element);
                    self.walk_properties(&nested, prefix);
                }
                Some(origin) => {
                    let declaring_root = project.root_scope(origin.file);
                    match project.find_interface(declaring_root, &origin.name) {
                        Some(iface) => self.flatten(iface, Some(&path)),
                        None => {
                            let nested = project.properties_of(element);
                            self.walk_guarded(Some(origin), &nested, Some(&path));
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::context::Context;
    use crate::reflect::tests::{entries, entries_in, paths};
    use crate::reflect::{expand, Category};
    use apidoc_ts_syntax::Annotation;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn alias_to_object_is_walked_under_the_property() {
        let src = r#"
            type Meta = { /** Author name. */ author: string; version: number };
            interface Post { title: string; meta: Meta }
        "#;
        let out = entries(src, "{Post} post");
        assert_eq!(paths(&out), ["post.title", "post.meta", "post.meta.author", "post.meta.version"]);
        assert_eq!(out[2].description, "`post.meta.author` - Author name.");
    }

    #[test]
    fn three_origins_of_nested_types() {
        let src = r#"
            interface Employer { name: string }
            type Extra = { note: string };
            type Meta = {
                owner: Employer;
                inline: { deep: string };
                extra: Extra;
                color: Color;
                flags: boolean[];
            };
            enum Color { Red, Green }
            interface Post { meta: Meta }
        "#;
        let out = entries(src, "{Post}");
        assert_eq!(
            paths(&out),
            [
                "meta",
                "meta.owner",
                "meta.owner.name",
                "meta.inline",
                // Anonymous shapes stay under the current prefix.
                "meta.deep",
                "meta.extra",
                "meta.extra.note",
                "meta.color",
                "meta.flags",
            ]
        );
        let categories: Vec<Category> = out.iter().map(|e| e.category).collect();
        assert_eq!(categories[7], Category::Enum);
        assert_eq!(categories[8], Category::NativeArray);
    }

    #[test]
    fn methods_are_not_documented() {
        let src = r#"
            type Service = { url: string; call(): void };
            interface Api { service: Service }
        "#;
        let out = entries(src, "{Api}");
        assert_eq!(paths(&out), ["service", "service.url"]);
    }

    #[test]
    fn imported_interface_is_walked_across_files() {
        let out = entries_in(
            &[
                (
                    "/virtual/models.ts",
                    "export interface Employer { /** Legal name. */ name: string; size: number }",
                ),
                (
                    "/virtual/api.ts",
                    "import { Employer } from './models';\ninterface SearchResult { employer: Employer }",
                ),
            ],
            "{SearchResult} result",
        );
        assert_eq!(
            paths(&out),
            ["result.employer", "result.employer.name", "result.employer.size"]
        );
        assert_eq!(out[1].description, "`result.employer.name` - Legal name.");
    }

    #[test]
    fn library_properties_are_skipped() {
        let dir = TempDir::new().unwrap();
        let lib = dir.path().join("lib.d.ts");
        fs::write(&lib, "interface Stamp { iso: string }").unwrap();

        let mut ctx = Context::default();
        ctx.add_ambient(&lib).unwrap();
        let api = Path::new("/virtual/api.ts");
        ctx.register_text(api, "interface Event { name: string; at: Stamp }");

        let annotation = Annotation::parse("{Event} event").unwrap();
        let out = expand(&mut ctx, &annotation, api, "apiSuccess").unwrap();
        assert_eq!(paths(&out), ["event.name", "event.at"]);
    }

    #[test]
    fn recursive_alias_stops() {
        let src = r#"
            type Node = { value: string; next: Node };
            interface List { head: Node }
        "#;
        let out = entries(src, "{List}");
        assert_eq!(paths(&out), ["head", "head.value", "head.next"]);
    }
}
