//! Element model shared by the block parser, the tag handlers and the renderers.

use serde::Serialize;

/// One `@name content` annotation inside a comment block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    /// Lowercased tag name, e.g. `apisuccess`.
    pub name: String,
    pub content: String,
    /// Tag and content as they would be written, e.g. `@apiSuccess {String} id`.
    pub source: String,
    /// Tag name as written, e.g. `apiSuccess`.
    #[serde(rename = "sourceName")]
    pub source_name: String,
}

impl Element {
    pub fn new(source_name: &str, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            name: source_name.to_lowercase(),
            source: format!("@{} {}", source_name, content),
            content,
            source_name: source_name.to_string(),
        }
    }
}

/// An api comment block and its elements after every hook ran.
#[derive(Debug, Default, Serialize)]
pub struct Block {
    /// 1-based line of the opening `/**`.
    pub line: usize,
    pub elements: Vec<Element>,
}

/// All api blocks of one source file.
#[derive(Debug, Default, Serialize)]
pub struct Document {
    pub file: String,
    pub blocks: Vec<Block>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_shape() {
        let e = Element::new("apiSuccess", "{String} id\n");
        assert_eq!(e.name, "apisuccess");
        assert_eq!(e.source, "@apiSuccess {String} id\n");
        assert_eq!(e.source_name, "apiSuccess");
    }

    #[test]
    fn serializes_source_name_in_camel_case() {
        let e = Element::new("apiParam", "{Number} x\n");
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["sourceName"], "apiParam");
        assert_eq!(json["name"], "apiparam");
    }
}
