//! Payload grammar of the interface tags:
//!
//! ```text
//! [(<file>)] {<TypeReference>} [<fieldName>] [<description>]
//! ```

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static RE_ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\((.+?)\))?\s*\{(.+?)\}\s*(?:([a-zA-Z_]+))?\s*(?:(.+))?").unwrap()
});

/// One parsed tag payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Declaration file, relative to the annotated file.
    pub file_path: Option<String>,
    pub type_reference: String,
    /// `None` when the tag relies on its default field name.
    pub field_name: Option<String>,
    pub description: String,
}

impl Annotation {
    /// Parse a tag payload. Returns `None` for empty content or when there is
    /// no `{...}` group; the caller decides how loudly to complain.
    pub fn parse(content: &str) -> Option<Self> {
        let content = content.trim_start();
        if content.is_empty() {
            return None;
        }
        let caps = RE_ANNOTATION.captures(content)?;
        let type_reference = caps[2].trim();
        if type_reference.is_empty() {
            return None;
        }

        Some(Self {
            file_path: caps.get(1).map(|m| m.as_str().to_string()),
            type_reference: type_reference.to_string(),
            field_name: caps.get(3).map(|m| m.as_str().to_string()),
            description: caps
                .get(4)
                .map(|m| m.as_str().trim_end().to_string())
                .unwrap_or_default(),
        })
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = &self.file_path {
            write!(f, "({}) ", path)?;
        }
        write!(f, "{{{}}}", self.type_reference)?;
        if let Some(name) = &self.field_name {
            write!(f, " {}", name)?;
        }
        if !self.description.is_empty() {
            write!(f, " {}", self.description)?;
        }
        Ok(())
    }
}
