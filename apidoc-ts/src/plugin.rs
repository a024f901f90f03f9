//! The `@apiInterfaceSuccess` and `@apiInterfaceParam` tags.
//!
//! Each handler replaces its own element with one `@apiSuccess` /
//! `@apiParam` element per flattened field.

use crate::context::Context;
use crate::hooks::{FindElements, HookError, Hooks};
use crate::model::Element;
use crate::reflect::{self, DocEntry};
use apidoc_ts_syntax::Annotation;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Success,
    Param,
}

impl TagKind {
    pub const ALL: [TagKind; 2] = [TagKind::Success, TagKind::Param];

    /// Lowercased name of the element this handler consumes.
    pub fn element_name(self) -> &'static str {
        match self {
            TagKind::Success => "apiinterfacesuccess",
            TagKind::Param => "apiinterfaceparam",
        }
    }

    /// Tag of the synthesized elements, also the default field name.
    pub fn source_name(self) -> &'static str {
        match self {
            TagKind::Success => "apiSuccess",
            TagKind::Param => "apiParam",
        }
    }

    /// Both handlers share one hook, so each needs its own slot.
    pub fn priority(self) -> u32 {
        match self {
            TagKind::Success => 200,
            TagKind::Param => 201,
        }
    }

    pub fn element(self, entry: &DocEntry) -> Element {
        Element::new(self.source_name(), format!("{}\n", entry.content()))
    }
}

pub struct InterfaceTag(pub TagKind);

impl FindElements for InterfaceTag {
    fn find_elements(
        &self,
        ctx: &mut Context,
        elements: &mut Vec<Element>,
        element: &Element,
        _block: &str,
        filename: &Path,
    ) {
        let kind = self.0;
        if element.name != kind.element_name() {
            return;
        }
        elements.pop();

        let Some(annotation) = Annotation::parse(&element.content) else {
            warn!(
                "could not parse values of element: {}",
                element.content.trim()
            );
            return;
        };

        match reflect::expand(ctx, &annotation, filename, kind.source_name()) {
            Ok(entries) => {
                debug!(
                    tag = element.source_name.as_str(),
                    reference = annotation.type_reference.as_str(),
                    count = entries.len(),
                    "expanded interface tag"
                );
                elements.extend(entries.iter().map(|e| kind.element(e)));
            }
            Err(e) => warn!("{e}"),
        }
    }
}

/// Register both tag handlers.
pub fn init(hooks: &mut Hooks) -> Result<(), HookError> {
    for kind in TagKind::ALL {
        hooks.add_find_elements(kind.priority(), Box::new(InterfaceTag(kind)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: &str = "interface SquareConfig { color: string; width: number }";

    fn run(content: &str, source_name: &str) -> Vec<Element> {
        let mut ctx = Context::default();
        let file = Path::new("/virtual/api.ts");
        ctx.register_text(file, SRC);
        let mut hooks = Hooks::default();
        init(&mut hooks).unwrap();

        let before = Element::new("apiGroup", "shapes");
        let element = Element::new(source_name, content);
        let mut elements = vec![before, element.clone()];
        hooks.run_find_elements(&mut ctx, &mut elements, &element, "", file);
        elements
    }

    #[test]
    fn registers_at_distinct_priorities() {
        let mut hooks = Hooks::default();
        init(&mut hooks).unwrap();
        assert_eq!(hooks.priorities(), [200, 201]);
        assert!(init(&mut hooks).is_err());
    }

    #[test]
    fn success_tag_is_replaced() {
        let elements = run("{SquareConfig} square", "apiInterfaceSuccess");
        let sources: Vec<&str> = elements.iter().map(|e| e.source.as_str()).collect();
        assert_eq!(
            sources,
            [
                "@apiGroup shapes",
                "@apiSuccess {String} square.color `square.color`\n",
                "@apiSuccess {Number} square.width `square.width`\n",
            ]
        );
        assert_eq!(elements[1].name, "apisuccess");
        assert_eq!(elements[1].content, "{String} square.color `square.color`\n");
    }

    #[test]
    fn param_tag_uses_param_elements() {
        let elements = run("{number}", "apiInterfaceParam");
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[1].name, "apiparam");
        assert_eq!(elements[1].source_name, "apiParam");
        assert_eq!(elements[1].content, "{Number} apiParam\n");
    }

    #[test]
    fn malformed_tag_is_dropped() {
        let elements = run("SquareConfig square", "apiInterfaceSuccess");
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].name, "apigroup");
    }

    #[test]
    fn unresolved_tag_is_dropped() {
        let elements = run("{X}", "apiInterfaceSuccess");
        assert_eq!(elements.len(), 1);
    }

    #[test]
    fn other_elements_are_untouched() {
        let elements = run("{String} id", "apiSuccess");
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[1].source, "@apiSuccess {String} id");
    }
}
