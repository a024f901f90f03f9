//! `/** ... */` block extraction and `@element` splitting.

use crate::model::Element;
use regex::Regex;
use std::sync::LazyLock;

static RE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*\*(.*?)\*/").unwrap());

static RE_GUTTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\*? ?").unwrap());

static RE_ELEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@(\w+)\s*(.*)$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBlock {
    /// 1-based line of the opening `/**`.
    pub line: usize,
    /// Inner text with the `*` gutter removed.
    pub text: String,
}

pub fn blocks(src: &str) -> Vec<CommentBlock> {
    RE_BLOCK
        .captures_iter(src)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let line = src[..whole.start()].matches('\n').count() + 1;
            let text = caps[1]
                .lines()
                .map(|l| RE_GUTTER.replace(l, "").into_owned())
                .collect::<Vec<_>>()
                .join("\n");
            Some(CommentBlock {
                line,
                text: text.trim().to_string(),
            })
        })
        .collect()
}

/// Split a block into elements. A line starting with `@word` opens an element;
/// following lines continue it until the next one.
pub fn elements(block: &str) -> Vec<Element> {
    let mut out = Vec::new();
    let mut current: Option<(String, String)> = None;

    for line in block.lines() {
        if let Some(caps) = RE_ELEMENT.captures(line.trim_start()) {
            if let Some((name, content)) = current.take() {
                out.push(Element::new(&name, content.trim_end()));
            }
            current = Some((caps[1].to_string(), caps[2].to_string()));
        } else if let Some((_, content)) = current.as_mut() {
            content.push('\n');
            content.push_str(line);
        }
    }
    if let Some((name, content)) = current {
        out.push(Element::new(&name, content.trim_end()));
    }

    out
}

/// Whether a block documents an api endpoint.
pub fn is_api_block(elements: &[Element]) -> bool {
    elements.iter().any(|e| e.name.starts_with("api"))
}
