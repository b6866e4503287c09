//! File output writer: selector-based injection into an HTML document.
//!
//! The target file is parsed as a full HTML document, the inner content of
//! the first element matching the inject selector is replaced with the
//! generated fragment, and the serialized document overwrites the file.

use std::fs;
use std::path::Path;

use ego_tree::{NodeId, NodeRef, Tree};
use scraper::node::Node;
use scraper::{Html, Selector};

use crate::{Result, SkelError};

/// Parse `selector`, failing with a validation error when it is not valid
/// CSS. Used by the configuration resolver to reject bad selectors before
/// any browser work starts.
pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| SkelError::validation(format!("invalid inject selector {selector:?}: {e}")))
}

/// Replace the inner content of the first element matching `selector` with
/// `fragment` and return the serialized document.
///
/// A selector matching nothing is a silent no-op, as is an empty fragment
/// (a failed script execution must not wipe the target's existing content);
/// either way the document round-trips through the parser unchanged.
pub fn inject_fragment(document: &str, selector: &Selector, fragment: &str) -> String {
    let mut doc = Html::parse_document(document);
    if fragment.is_empty() {
        return doc.html();
    }

    let Some(target) = doc.select(selector).next().map(|el| el.id()) else {
        return doc.html();
    };

    let existing: Vec<NodeId> = doc
        .tree
        .get(target)
        .map(|node| node.children().map(|child| child.id()).collect())
        .unwrap_or_default();
    for id in existing {
        if let Some(mut child) = doc.tree.get_mut(id) {
            child.detach();
        }
    }

    // The fragment parses into its own tree; nodes are copied across since
    // ego_tree cannot move subtrees between trees.
    let parsed = Html::parse_fragment(fragment);
    for child in parsed.root_element().children() {
        append_subtree(&mut doc.tree, target, child);
    }

    doc.html()
}

fn append_subtree(tree: &mut Tree<Node>, parent: NodeId, source: NodeRef<'_, Node>) {
    let appended = match tree.get_mut(parent) {
        Some(mut node) => node.append(source.value().clone()).id(),
        None => return,
    };
    for child in source.children() {
        append_subtree(tree, appended, child);
    }
}

/// Inject `fragment` into the document at `path` and write it back.
///
/// Read and write failures propagate as [`SkelError::Io`]; nothing at this
/// layer catches them.
pub fn write_to_filepath(path: &Path, selector: &Selector, fragment: &str) -> Result<()> {
    let raw = fs::read_to_string(path)?;
    let rewritten = inject_fragment(&raw, selector, fragment);
    fs::write(path, rewritten)?;
    Ok(())
}
