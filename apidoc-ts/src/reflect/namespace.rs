//! Lexical lookup of dotted type references.

use apidoc_ts_syntax::{InterfaceRef, Project, ScopeRef};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static RE_ARRAY_GENERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Array<(.*)>$").unwrap());

static RE_ARRAY_BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*)\[\]$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceLookup {
    /// Scope that should contain the leaf; `None` once a segment was missing.
    pub scope: Option<ScopeRef>,
    pub leaf_name: String,
    /// First namespace segment that could not be found.
    pub missing: Option<String>,
}

/// Split `A.B.Leaf` and descend `A`, then `B` from `root`. Only named child
/// scopes are consulted; the type graph plays no part.
pub fn extract_namespace(project: &Project, root: ScopeRef, reference: &str) -> NamespaceLookup {
    let name = reference.strip_suffix("[]").unwrap_or(reference);
    let segments: Vec<&str> = name.split('.').collect();
    let (leaf, namespaces) = segments
        .split_last()
        .map(|(leaf, rest)| (*leaf, rest))
        .unwrap_or((name, &[]));

    let mut scope = Some(root);
    let mut missing = None;
    for segment in namespaces {
        let Some(parent) = scope else { break };
        scope = project.child_namespace(parent, segment);
        if scope.is_none() {
            debug!(segment = *segment, reference, "namespace segment not found");
            missing = Some(segment.to_string());
        }
    }

    NamespaceLookup {
        scope,
        leaf_name: leaf.to_string(),
        missing,
    }
}

/// Interface named by a dotted reference relative to `root`, if any.
pub fn lookup_interface(project: &Project, root: ScopeRef, reference: &str) -> Option<InterfaceRef> {
    let lookup = extract_namespace(project, root, reference);
    project.find_interface(lookup.scope?, &lookup.leaf_name)
}

/// Element reference of `X[]` or `Array<X>`.
pub fn match_array(reference: &str) -> Option<&str> {
    RE_ARRAY_GENERIC
        .captures(reference)
        .or_else(|| RE_ARRAY_BRACKETS.captures(reference))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}
