use crate::annotate::{AnnotationError, HighlightColor};
use crate::markup::node::char_to_byte;
use crate::markup::{Attr, Element, Fragment, Node, NodePath};

pub const MARK_TAG: &str = "span";
pub const COLOR_ATTR: &str = "data-highlight";
pub const ID_ATTR: &str = "data-mark-id";

pub fn marker(color: HighlightColor, id: u64, children: Vec<Node>) -> Element {
    Element::new(
        MARK_TAG,
        vec![
            Attr::new("class", &format!("hl hl-{color}")),
            Attr::new(COLOR_ATTR, color.as_str()),
            Attr::new(ID_ATTR, &id.to_string()),
        ],
        children,
    )
}

pub fn is_marker(element: &Element) -> bool {
    element.tag.eq_ignore_ascii_case(MARK_TAG) && element.has_attr(COLOR_ATTR)
}

/// A marker found in a fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mark {
    pub path: NodePath,
    pub id: Option<u64>,
    pub color: Option<HighlightColor>,
    /// Flat char span of the marked text.
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// All markers in document order, outer markers before the ones they contain.
pub fn find_marks(fragment: &Fragment) -> Vec<Mark> {
    fn walk(nodes: &[Node], path: &mut Vec<usize>, offset: &mut usize, out: &mut Vec<Mark>) {
        for (i, node) in nodes.iter().enumerate() {
            path.push(i);
            match node {
                Node::Text(t) => *offset += t.chars().count(),
                Node::Comment(_) => {}
                Node::Element(e) => {
                    let start = *offset;
                    let slot = out.len();
                    walk(&e.children, path, offset, out);
                    if is_marker(e) {
                        let text = Fragment::new(e.children.clone()).text_content();
                        out.insert(
                            slot,
                            Mark {
                                path: NodePath::new(path.clone()),
                                id: e.attr(ID_ATTR).and_then(|v| v.parse().ok()),
                                color: e.attr(COLOR_ATTR).and_then(|v| v.parse().ok()),
                                start,
                                end: *offset,
                                text,
                            },
                        );
                    }
                }
            }
            path.pop();
        }
    }

    let mut out = Vec::new();
    walk(&fragment.nodes, &mut Vec::new(), &mut 0, &mut out);
    out
}

/// Wrap the flat char span `[start, end)` in a marker.
///
/// Every text node the span touches gets its own marker element carrying the
/// same id, so the span may cross existing inline tags. Nodes are rewritten
/// last-first so the paths of nodes still waiting keep pointing at the right
/// place.
pub fn apply_mark(
    fragment: &Fragment,
    start: usize,
    end: usize,
    color: HighlightColor,
    id: u64,
) -> Result<Fragment, AnnotationError> {
    let len = fragment.text_len();
    if end > len {
        return Err(AnnotationError::OffsetOutOfBounds { offset: end, len });
    }
    if start >= end {
        return Err(AnnotationError::CollapsedSelection);
    }

    let pieces: Vec<(NodePath, usize, usize)> = fragment
        .text_segments()
        .into_iter()
        .filter(|s| s.start < end && s.end() > start)
        .map(|s| {
            let lo = start.max(s.start) - s.start;
            let hi = end.min(s.end()) - s.start;
            (s.path, lo, hi)
        })
        .filter(|(_, lo, hi)| lo < hi)
        .collect();
    if pieces.is_empty() {
        return Err(AnnotationError::CollapsedSelection);
    }

    let mut out = fragment.clone();
    for (path, lo, hi) in pieces.into_iter().rev() {
        wrap_text_node(&mut out, &path, lo, hi, color, id)?;
    }
    Ok(out)
}

fn wrap_text_node(
    fragment: &mut Fragment,
    path: &NodePath,
    lo: usize,
    hi: usize,
    color: HighlightColor,
    id: u64,
) -> Result<(), AnnotationError> {
    let not_text = || AnnotationError::NotATextNode {
        paragraph: 0,
        path: path.clone(),
    };
    let index = path.last().ok_or_else(not_text)?;
    let siblings = fragment.siblings_mut(path).ok_or_else(not_text)?;
    let Some(Node::Text(text)) = siblings.get(index) else {
        return Err(not_text());
    };

    let (a, b) = (char_to_byte(text, lo), char_to_byte(text, hi));
    let before = &text[..a];
    let middle = &text[a..b];
    let after = &text[b..];

    let mut replacement = Vec::with_capacity(3);
    if !before.is_empty() {
        replacement.push(Node::text(before));
    }
    replacement.push(Node::Element(marker(color, id, vec![Node::text(middle)])));
    if !after.is_empty() {
        replacement.push(Node::text(after));
    }
    siblings.splice(index..=index, replacement);
    Ok(())
}

/// Replace the element at `path` with its children.
fn unwrap_at(fragment: &mut Fragment, path: &NodePath) -> bool {
    let Some(index) = path.last() else {
        return false;
    };
    let Some(siblings) = fragment.siblings_mut(path) else {
        return false;
    };
    match siblings.get(index) {
        Some(Node::Element(_)) => {}
        _ => return false,
    }
    let Node::Element(element) = siblings.remove(index) else {
        return false;
    };
    siblings.splice(index..index, element.children);
    true
}

/// Unwrap the given marker paths. Deepest and latest first, so earlier paths
/// stay valid.
fn unwrap_all(fragment: &Fragment, mut paths: Vec<NodePath>) -> (Fragment, usize) {
    paths.sort();
    let mut out = fragment.clone();
    let mut removed = 0;
    for path in paths.iter().rev() {
        if unwrap_at(&mut out, path) {
            removed += 1;
        }
    }
    out.normalize();
    (out, removed)
}

/// Remove every marker carrying `id`.
pub fn remove_mark(fragment: &Fragment, id: u64) -> Fragment {
    let paths = find_marks(fragment)
        .into_iter()
        .filter(|m| m.id == Some(id))
        .map(|m| m.path)
        .collect();
    unwrap_all(fragment, paths).0
}

/// Unwrap every marker whose text intersects the flat span `[start, end)`.
pub fn unwrap_marks_in(fragment: &Fragment, start: usize, end: usize) -> (Fragment, usize) {
    let paths = find_marks(fragment)
        .into_iter()
        .filter(|m| m.start < end && m.end > start)
        .map(|m| m.path)
        .collect();
    unwrap_all(fragment, paths)
}

/// The innermost marker that contains the node at `path`, if any.
pub fn innermost_mark_at(fragment: &Fragment, path: &NodePath) -> Option<NodePath> {
    path.ancestors()
        .filter(|p| {
            fragment
                .node(p)
                .and_then(Node::as_element)
                .is_some_and(is_marker)
        })
        .last()
}

/// Unwrap one marker by path.
pub fn unwrap_mark(fragment: &Fragment, path: &NodePath) -> Fragment {
    unwrap_all(fragment, vec![path.clone()]).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse_fragment;

    fn frag(html: &str) -> Fragment {
        parse_fragment(html).unwrap()
    }

    #[test]
    fn wraps_a_sub_run_of_plain_text() {
        let marked = apply_mark(&frag("<p>The quick fox.</p>"), 4, 9, HighlightColor::Main, 1).unwrap();
        assert_eq!(
            marked.to_html(),
            "<p>The <span class=\"hl hl-main\" data-highlight=\"main\" data-mark-id=\"1\">quick</span> fox.</p>"
        );
        assert_eq!(marked.text_content(), "The quick fox.");
    }

    #[test]
    fn wraps_each_segment_across_inline_tags() {
        let source = frag("<p>ab<em>cd</em>ef</p>");
        let marked = apply_mark(&source, 1, 5, HighlightColor::Evidence, 7).unwrap();
        let marks = find_marks(&marked);
        assert_eq!(marks.len(), 3);
        let texts: Vec<&str> = marks.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "cd", "e"]);
        assert!(marks.iter().all(|m| m.id == Some(7)));
        assert_eq!(marked.text_content(), "abcdef");
    }

    #[test]
    fn whole_text_node_gets_no_empty_neighbours() {
        let marked = apply_mark(&frag("<p>word</p>"), 0, 4, HighlightColor::Confusion, 2).unwrap();
        let p = marked.nodes[0].as_element().unwrap();
        assert_eq!(p.children.len(), 1);
    }

    #[test]
    fn rejects_empty_and_out_of_range_spans() {
        let source = frag("<p>abc</p>");
        assert_eq!(
            apply_mark(&source, 2, 2, HighlightColor::Main, 1),
            Err(AnnotationError::CollapsedSelection)
        );
        assert_eq!(
            apply_mark(&source, 1, 9, HighlightColor::Main, 1),
            Err(AnnotationError::OffsetOutOfBounds { offset: 9, len: 3 })
        );
    }

    #[test]
    fn remove_then_reserialize_is_byte_identical() {
        let html = "<p>A <strong>bold</strong> claim, <em>really</em>.</p>";
        let source = frag(html);
        let marked = apply_mark(&source, 2, 14, HighlightColor::Main, 3).unwrap();
        assert_ne!(marked.to_html(), html);
        assert_eq!(remove_mark(&marked, 3).to_html(), html);
        assert_eq!(remove_mark(&marked, 3), source);
    }

    #[test]
    fn remove_mark_leaves_other_ids() {
        let source = frag("<p>one two three</p>");
        let a = apply_mark(&source, 0, 3, HighlightColor::Main, 1).unwrap();
        let b = apply_mark(&a, 8, 13, HighlightColor::Evidence, 2).unwrap();
        let left = remove_mark(&b, 1);
        let marks = find_marks(&left);
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].id, Some(2));
        assert_eq!(marks[0].text, "three");
    }

    #[test]
    fn nested_marks_unwrap_cleanly() {
        let source = frag("<p>abcdef</p>");
        let outer = apply_mark(&source, 0, 6, HighlightColor::Main, 1).unwrap();
        let inner = apply_mark(&outer, 2, 4, HighlightColor::Confusion, 2).unwrap();
        let marks = find_marks(&inner);
        assert_eq!(marks.len(), 2);
        assert_eq!(marks[0].id, Some(1));
        assert_eq!(marks[1].id, Some(2));

        let (cleared, removed) = unwrap_marks_in(&inner, 3, 4);
        assert_eq!(removed, 2);
        assert_eq!(cleared.to_html(), "<p>abcdef</p>");
    }

    #[test]
    fn unwrap_marks_in_skips_marks_outside_the_span() {
        let source = frag("<p>one two three</p>");
        let a = apply_mark(&source, 0, 3, HighlightColor::Main, 1).unwrap();
        let b = apply_mark(&a, 8, 13, HighlightColor::Main, 2).unwrap();
        let (cleared, removed) = unwrap_marks_in(&b, 3, 8);
        assert_eq!(removed, 0);
        assert_eq!(cleared, b);
    }

    #[test]
    fn innermost_mark_is_found_from_a_text_path() {
        let source = frag("<p>abcdef</p>");
        let outer = apply_mark(&source, 0, 6, HighlightColor::Main, 1).unwrap();
        let inner = apply_mark(&outer, 2, 4, HighlightColor::Evidence, 2).unwrap();
        let (path, _) = inner.locate(3).unwrap();
        let mark_path = innermost_mark_at(&inner, &path).unwrap();
        let cleared = unwrap_mark(&inner, &mark_path);
        let marks = find_marks(&cleared);
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].id, Some(1));

        let plain = frag("<p>x</p>");
        let (path, _) = plain.locate(0).unwrap();
        assert_eq!(innermost_mark_at(&plain, &path), None);
    }
}
