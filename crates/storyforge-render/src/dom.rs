//! Tree-level helpers over `scraper`'s parsed documents.
//!
//! All mutation goes through the `ego_tree` arena behind `scraper::Html`.
//! Attribute writes reuse names and values from a parsed throwaway fragment,
//! so no raw tag names or offsets are ever spliced into document text.

use ego_tree::{NodeId, NodeRef, Tree};
use scraper::{Html, Node, Selector};

/// Find the first element matching a CSS selector.
///
/// Zero matches (or an invalid selector) yields `None`; callers treat that as
/// "skip this decoration".
pub fn select_first(doc: &Html, selector: &str) -> Option<NodeId> {
    let selector = Selector::parse(selector).ok()?;
    doc.select(&selector).next().map(|el| el.id())
}

/// Read an attribute off an element node.
pub fn get_attr(doc: &Html, id: NodeId, name: &str) -> Option<String> {
    doc.tree
        .get(id)?
        .value()
        .as_element()?
        .attr(name)
        .map(str::to_string)
}

/// Set an attribute on an element node.
///
/// The attribute is materialized by parsing a one-element fragment and
/// cloning its attribute entry, which keeps name interning and value
/// escaping consistent with the rest of the document.
pub fn set_attr(doc: &mut Html, id: NodeId, name: &str, value: &str) {
    let snippet = format!("<i {}=\"{}\"></i>", name, escape_attr(value));
    let fragment = Html::parse_fragment(&snippet);

    let attrs: Vec<_> = fragment
        .tree
        .root()
        .descendants()
        .filter_map(|node| node.value().as_element())
        .find(|el| el.name() == "i")
        .map(|el| el.attrs.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default();

    if let Some(mut node) = doc.tree.get_mut(id) {
        if let Node::Element(el) = node.value() {
            for (k, v) in attrs {
                el.attrs.insert(k, v);
            }
        }
    }
}

/// Remove an attribute from an element node, if present.
pub fn remove_attr(doc: &mut Html, id: NodeId, name: &str) {
    if let Some(mut node) = doc.tree.get_mut(id) {
        if let Node::Element(el) = node.value() {
            el.attrs.retain(|attr, _| &*attr.local != name);
        }
    }
}

/// Append a parsed markup fragment as the last children of a node.
pub fn append_fragment(doc: &mut Html, parent: NodeId, markup: &str) {
    let fragment = Html::parse_fragment(markup);
    for root in fragment_roots(&fragment) {
        append_subtree(&mut doc.tree, parent, &fragment.tree, root);
    }
}

/// Insert a parsed markup fragment as the first children of a node.
pub fn prepend_fragment(doc: &mut Html, parent: NodeId, markup: &str) {
    let fragment = Html::parse_fragment(markup);
    let first_child = doc.tree.get(parent).and_then(|n| n.first_child()).map(|n| n.id());

    match first_child {
        Some(sibling) => {
            for root in fragment_roots(&fragment) {
                insert_subtree_before(&mut doc.tree, sibling, &fragment.tree, root);
            }
        }
        None => {
            for root in fragment_roots(&fragment) {
                append_subtree(&mut doc.tree, parent, &fragment.tree, root);
            }
        }
    }
}

/// Insert a parsed markup fragment immediately before a sibling node.
pub fn insert_fragment_before(doc: &mut Html, sibling: NodeId, markup: &str) {
    let fragment = Html::parse_fragment(markup);
    for root in fragment_roots(&fragment) {
        insert_subtree_before(&mut doc.tree, sibling, &fragment.tree, root);
    }
}

/// Collect the sibling run from `start` to `end` inclusive.
///
/// Returns `None` when the two nodes do not share a parent or `end` does not
/// follow `start`, so a mismatched marker pair is a clean no-op.
pub fn sibling_range(doc: &Html, start: NodeId, end: NodeId) -> Option<Vec<NodeId>> {
    let start_ref = doc.tree.get(start)?;
    let end_ref = doc.tree.get(end)?;

    if start_ref.parent()?.id() != end_ref.parent()?.id() {
        return None;
    }

    let mut range = vec![start];
    let mut cursor = start_ref;
    while let Some(next) = cursor.next_sibling() {
        range.push(next.id());
        if next.id() == end {
            return Some(range);
        }
        cursor = next;
    }

    // Walked off the sibling list without meeting `end`.
    None
}

/// Unlink a set of nodes from the tree.
pub fn detach_all(doc: &mut Html, nodes: &[NodeId]) {
    for &id in nodes {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Elements serialized without children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose text children are emitted verbatim.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext", "noscript",
];

/// Serialize the document: doctype declaration plus the tree's markup.
///
/// Serialization is deterministic: element attributes are written in sorted
/// name order, since the parsed attribute map does not preserve a stable
/// order of its own. Rendering the same document twice yields identical
/// bytes.
pub fn serialize(doc: &Html) -> String {
    let mut out = String::from("<!DOCTYPE html>");
    for child in doc.tree.root().children() {
        write_node(&mut out, child);
    }
    out
}

fn write_node(out: &mut String, node: NodeRef<'_, Node>) {
    match node.value() {
        Node::Element(el) => {
            out.push('<');
            out.push_str(el.name());

            let mut attrs: Vec<(&str, &str)> =
                el.attrs.iter().map(|(k, v)| (&*k.local, &**v)).collect();
            attrs.sort_by(|a, b| a.0.cmp(b.0));
            for (name, value) in attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&el.name()) {
                return;
            }

            for child in node.children() {
                write_node(out, child);
            }

            out.push_str("</");
            out.push_str(el.name());
            out.push('>');
        }
        Node::Text(text) => {
            let raw = node
                .parent()
                .and_then(|p| p.value().as_element().map(|el| el.name().to_string()))
                .map(|name| RAW_TEXT_ELEMENTS.contains(&name.as_str()))
                .unwrap_or(false);

            if raw {
                out.push_str(&text.text);
            } else {
                out.push_str(&escape_text(&text.text));
            }
        }
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(&comment.comment);
            out.push_str("-->");
        }
        Node::Document | Node::Fragment => {
            for child in node.children() {
                write_node(out, child);
            }
        }
        // The doctype is emitted up front; anything else has no markup form.
        _ => {}
    }
}

/// Escape a string for use inside a double-quoted attribute value.
pub fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

/// Escape a string for use as element text content.
pub fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Top-level nodes of a parsed fragment (children of the synthetic wrapper
/// element html5ever builds around fragment input).
fn fragment_roots(fragment: &Html) -> Vec<NodeId> {
    fragment
        .tree
        .root()
        .children()
        .find(|node| node.value().is_element())
        .map(|wrapper| wrapper.children().map(|c| c.id()).collect())
        .unwrap_or_default()
}

/// Deep-copy a subtree from one tree to the end of a parent in another.
fn append_subtree(dest: &mut Tree<Node>, parent: NodeId, src: &Tree<Node>, node: NodeId) {
    let Some(src_ref) = src.get(node) else { return };

    let new_id = match dest.get_mut(parent) {
        Some(mut p) => p.append(src_ref.value().clone()).id(),
        None => return,
    };

    let children: Vec<NodeId> = src_ref.children().map(|c| c.id()).collect();
    for child in children {
        append_subtree(dest, new_id, src, child);
    }
}

/// Deep-copy a subtree from one tree to just before a sibling in another.
fn insert_subtree_before(dest: &mut Tree<Node>, sibling: NodeId, src: &Tree<Node>, node: NodeId) {
    let Some(src_ref) = src.get(node) else { return };

    let new_id = match dest.get_mut(sibling) {
        Some(mut s) => s.insert_before(src_ref.value().clone()).id(),
        None => return,
    };

    let children: Vec<NodeId> = src_ref.children().map(|c| c.id()).collect();
    for child in children {
        append_subtree(dest, new_id, src, child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn selects_first_of_many() {
        let doc = Html::parse_document("<html><body><p id=\"a\"></p><p id=\"b\"></p></body></html>");
        let first = select_first(&doc, "p").unwrap();
        assert_eq!(get_attr(&doc, first, "id").as_deref(), Some("a"));
    }

    #[test]
    fn sets_and_removes_attributes() {
        let mut doc = Html::parse_document("<html><body><amp-story></amp-story></body></html>");
        let story = select_first(&doc, "amp-story").unwrap();

        set_attr(&mut doc, story, "poster-portrait-src", "https://example.com/p.png");
        assert_eq!(
            get_attr(&doc, story, "poster-portrait-src").as_deref(),
            Some("https://example.com/p.png")
        );

        remove_attr(&mut doc, story, "poster-portrait-src");
        assert!(get_attr(&doc, story, "poster-portrait-src").is_none());
    }

    #[test]
    fn attribute_values_round_trip_escaping() {
        let mut doc = Html::parse_document("<html><body><div></div></body></html>");
        let div = select_first(&doc, "div").unwrap();

        set_attr(&mut doc, div, "title", "a \"b\" & <c>");
        assert_eq!(get_attr(&doc, div, "title").as_deref(), Some("a \"b\" & <c>"));
        assert!(serialize(&doc).contains("&quot;b&quot;"));
    }

    #[test]
    fn appends_fragment_with_nested_markup() {
        let mut doc = Html::parse_document("<html><body><amp-story></amp-story></body></html>");
        let story = select_first(&doc, "amp-story").unwrap();

        append_fragment(
            &mut doc,
            story,
            "<amp-analytics type=\"gtag\"><script type=\"application/json\">{}</script></amp-analytics>",
        );

        let html = serialize(&doc);
        assert!(html.contains("amp-analytics"));
        assert!(html.contains("application/json"));
        // Nested inside the story element, not after it.
        assert!(html.contains("</amp-analytics></amp-story>"));
    }

    #[test]
    fn prepends_fragment_as_first_child() {
        let mut doc = Html::parse_document("<html><body><p>existing</p></body></html>");
        let body = select_first(&doc, "body").unwrap();

        prepend_fragment(&mut doc, body, "<div id=\"bar\"></div>");

        let html = serialize(&doc);
        let bar = html.find("id=\"bar\"").unwrap();
        let existing = html.find("existing").unwrap();
        assert!(bar < existing);
    }

    #[test]
    fn fragment_comments_survive_the_copy() {
        let mut doc = Html::parse_document("<html><body></body></html>");
        let body = select_first(&doc, "body").unwrap();

        append_fragment(&mut doc, body, "<!-- a note -->");
        assert!(serialize(&doc).contains("<!-- a note -->"));
    }

    #[test]
    fn sibling_range_requires_order_and_parent() {
        let doc = Html::parse_document(
            "<html><body><i id=\"x\"></i><b></b><i id=\"y\"></i><p><i id=\"z\"></i></p></body></html>",
        );
        let x = select_first(&doc, "#x").unwrap();
        let y = select_first(&doc, "#y").unwrap();
        let z = select_first(&doc, "#z").unwrap();

        assert_eq!(sibling_range(&doc, x, y).map(|r| r.len()), Some(3));
        // Reversed order never meets the end node.
        assert!(sibling_range(&doc, y, x).is_none());
        // Different parents.
        assert!(sibling_range(&doc, x, z).is_none());
    }

    #[test]
    fn detaches_a_marker_bounded_range() {
        let mut doc =
            Html::parse_document("<html><body>KEEP<i id=\"s\"></i>DROP<i id=\"e\"></i>ALSO</body></html>");
        let s = select_first(&doc, "#s").unwrap();
        let e = select_first(&doc, "#e").unwrap();

        let range = sibling_range(&doc, s, e).unwrap();
        detach_all(&mut doc, &range);

        let html = serialize(&doc);
        assert!(html.contains("KEEP"));
        assert!(html.contains("ALSO"));
        assert!(!html.contains("DROP"));
    }

    #[test]
    fn attributes_serialize_in_sorted_name_order() {
        let mut doc = Html::parse_document("<html><head></head><body></body></html>");
        let root = select_first(&doc, "html").unwrap();

        // Insertion order is lang-then-amp; output order must not depend on it.
        set_attr(&mut doc, root, "lang", "en-US");
        set_attr(&mut doc, root, "amp", "");

        assert!(serialize(&doc).contains("<html amp=\"\" lang=\"en-US\">"));
    }

    #[test]
    fn serializes_with_doctype() {
        let doc = Html::parse_document("<html><head></head><body></body></html>");
        let html = serialize(&doc);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.ends_with("</html>"));
    }
}
