//! Markdown renderer: one section per api block, with parameter and success
//! fields laid out as tables.

use crate::model::*;
use crate::render::Renderer;
use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;

pub struct MarkdownRenderer;

/// `{Type} field description` as used by apiParam / apiSuccess.
static RE_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{([^}]+)\}\s+(\S+)\s*(.*)$").unwrap());

impl Renderer for MarkdownRenderer {
    fn render(&self, doc: &Document) -> Result<String> {
        let mut output = String::new();
        for block in &doc.blocks {
            output.push_str(&render_block(block));
            output.push('\n');
        }
        Ok(output)
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

fn render_block(block: &Block) -> String {
    let mut lines: Vec<String> = Vec::new();

    let title = find(block, "apiname")
        .or_else(|| find(block, "api"))
        .unwrap_or("Untitled");
    lines.push(format!("## {}", title.trim()));
    lines.push(String::new());

    if let Some(endpoint) = find(block, "api").filter(|_| find(block, "apiname").is_some()) {
        lines.push(format!("`{}`", endpoint.trim()));
        lines.push(String::new());
    }
    if let Some(group) = find(block, "apigroup") {
        lines.push(format!("Group: {}", group.trim()));
        lines.push(String::new());
    }
    if let Some(description) = find(block, "apidescription") {
        lines.push(description.trim().to_string());
        lines.push(String::new());
    }

    render_fields(&mut lines, block, "apiparam", "Parameters");
    render_fields(&mut lines, block, "apisuccess", "Success");

    lines.join("\n")
}

fn find<'a>(block: &'a Block, name: &str) -> Option<&'a str> {
    block
        .elements
        .iter()
        .find(|e| e.name == name)
        .map(|e| e.content.as_str())
}

fn render_fields(lines: &mut Vec<String>, block: &Block, name: &str, title: &str) {
    let rows: Vec<String> = block
        .elements
        .iter()
        .filter(|e| e.name == name)
        .map(|e| render_row(e.content.trim()))
        .collect();
    if rows.is_empty() {
        return;
    }

    lines.push(format!("### {}", title));
    lines.push(String::new());
    lines.push("| Field | Type | Description |".to_string());
    lines.push("|-------|------|-------------|".to_string());
    lines.extend(rows);
    lines.push(String::new());
}

fn render_row(content: &str) -> String {
    match RE_FIELD.captures(content) {
        Some(caps) => format!(
            "| {} | {} | {} |",
            escape_cell(&caps[2]),
            escape_cell(&caps[1]),
            escape_cell(&caps[3])
        ),
        None => format!("| {} | | |", escape_cell(content)),
    }
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}
