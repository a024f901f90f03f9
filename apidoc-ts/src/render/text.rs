//! Plain renderer: every element written back as an annotation line, one
//! blank line between blocks. Handy for diffing expansions.

use crate::model::Document;
use crate::render::Renderer;
use anyhow::Result;

pub struct TextRenderer;

impl Renderer for TextRenderer {
    fn render(&self, doc: &Document) -> Result<String> {
        let blocks: Vec<String> = doc
            .blocks
            .iter()
            .map(|block| {
                block
                    .elements
                    .iter()
                    .map(|e| format!("{}\n", e.source.trim_end()))
                    .collect()
            })
            .collect();
        Ok(blocks.join("\n"))
    }

    fn file_extension(&self) -> &str {
        "txt"
    }
}
