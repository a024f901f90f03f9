//! Source file → [`Document`]: api blocks with every hook applied.

pub mod comments;

use crate::context::Context;
use crate::hooks::Hooks;
use crate::model::{Block, Document};
use anyhow::{anyhow, Result};
use std::path::Path;
use tracing::debug;

/// File extensions scanned for api blocks.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js"];

/// Parse a source file, rejecting extensions that never carry api blocks.
pub fn parse_file(ctx: &mut Context, hooks: &Hooks, path: &Path, content: &str) -> Result<Document> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if SUPPORTED_EXTENSIONS.contains(&ext) => Ok(parse(ctx, hooks, path, content)),
        _ => Err(anyhow!("unsupported file type: {}", path.display())),
    }
}

/// Extract api blocks from `content`, running the find-elements hooks after
/// each element is appended.
pub fn parse(ctx: &mut Context, hooks: &Hooks, path: &Path, content: &str) -> Document {
    let mut doc = Document {
        file: path.to_string_lossy().to_string(),
        blocks: Vec::new(),
    };

    for block in comments::blocks(content) {
        let found = comments::elements(&block.text);
        if !comments::is_api_block(&found) {
            continue;
        }

        let mut elements = Vec::with_capacity(found.len());
        for element in found {
            elements.push(element.clone());
            hooks.run_find_elements(ctx, &mut elements, &element, &block.text, path);
        }
        debug!(line = block.line, elements = elements.len(), "parsed api block");
        doc.blocks.push(Block {
            line: block.line,
            elements,
        });
    }

    doc
}
