use std::fmt;

/// Elements that never have children or a closing tag.
pub const VOID_TAGS: &[&str] = &["br", "hr", "img", "wbr", "input", "meta", "link"];

pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: Option<String>,
}

impl Attr {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: Some(value.to_string()),
        }
    }
}

/// How an element was closed in the source, kept so serialization
/// reproduces it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Closing {
    Normal,
    Void,
    SelfClosing,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<Attr>,
    pub children: Vec<Node>,
    pub closing: Closing,
}

impl Element {
    pub fn new(tag: &str, attrs: Vec<Attr>, children: Vec<Node>) -> Self {
        Self {
            tag: tag.to_string(),
            attrs,
            children,
            closing: Closing::Normal,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_deref().unwrap_or(""))
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a.name.eq_ignore_ascii_case(name))
    }
}

/// Text is kept exactly as written in the source; entities are not decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Comment(String),
    Element(Element),
}

impl Node {
    pub fn text(s: &str) -> Self {
        Node::Text(s.to_string())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(e) => &e.children,
            _ => &[],
        }
    }

    pub fn text_len(&self) -> usize {
        match self {
            Node::Text(t) => t.chars().count(),
            Node::Comment(_) => 0,
            Node::Element(e) => e.children.iter().map(Node::text_len).sum(),
        }
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(t),
            Node::Comment(_) => {}
            Node::Element(e) => e.children.iter().for_each(|c| c.collect_text(out)),
        }
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(t),
            Node::Comment(c) => {
                out.push_str("<!--");
                out.push_str(c);
                out.push_str("-->");
            }
            Node::Element(e) => {
                out.push('<');
                out.push_str(&e.tag);
                for attr in &e.attrs {
                    out.push(' ');
                    out.push_str(&attr.name);
                    if let Some(value) = &attr.value {
                        out.push_str("=\"");
                        out.push_str(value);
                        out.push('"');
                    }
                }
                match e.closing {
                    Closing::SelfClosing => out.push_str("/>"),
                    Closing::Void => out.push('>'),
                    Closing::Normal => {
                        out.push('>');
                        e.children.iter().for_each(|c| c.write_html(out));
                        out.push_str("</");
                        out.push_str(&e.tag);
                        out.push('>');
                    }
                }
            }
        }
    }
}

/// Child indices from the fragment root down to a node.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePath(pub Vec<usize>);

impl NodePath {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn parent(&self) -> Option<NodePath> {
        let (_, rest) = self.0.split_last()?;
        Some(NodePath(rest.to_vec()))
    }

    pub fn child(&self, index: usize) -> NodePath {
        let mut indices = self.0.clone();
        indices.push(index);
        NodePath(indices)
    }

    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Every proper prefix, shortest first.
    pub fn ancestors(&self) -> impl Iterator<Item = NodePath> + '_ {
        (1..self.0.len()).map(|n| NodePath(self.0[..n].to_vec()))
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "/{}", parts.join("/"))
    }
}

/// A text node's place in the flattened character stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextSegment {
    pub path: NodePath,
    /// Flat char offset of the segment's first character.
    pub start: usize,
    pub len: usize,
}

impl TextSegment {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// An ordered run of sibling nodes, e.g. one paragraph's markup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fragment {
    pub nodes: Vec<Node>,
}

impl Fragment {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.nodes.iter().for_each(|n| n.write_html(&mut out));
        out
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.nodes.iter().for_each(|n| n.collect_text(&mut out));
        out
    }

    pub fn text_len(&self) -> usize {
        self.nodes.iter().map(Node::text_len).sum()
    }

    pub fn node(&self, path: &NodePath) -> Option<&Node> {
        let (first, rest) = path.0.split_first()?;
        let mut node = self.nodes.get(*first)?;
        for &i in rest {
            node = node.children().get(i)?;
        }
        Some(node)
    }

    /// The sibling list that holds the node at `path`.
    pub fn siblings_mut(&mut self, path: &NodePath) -> Option<&mut Vec<Node>> {
        let (_, parents) = path.0.split_last()?;
        let mut list = &mut self.nodes;
        for &i in parents {
            match list.get_mut(i)? {
                Node::Element(e) => list = &mut e.children,
                _ => return None,
            }
        }
        Some(list)
    }

    /// Every non-comment text node in document order.
    pub fn text_segments(&self) -> Vec<TextSegment> {
        fn walk(nodes: &[Node], path: &mut Vec<usize>, offset: &mut usize, out: &mut Vec<TextSegment>) {
            for (i, node) in nodes.iter().enumerate() {
                path.push(i);
                match node {
                    Node::Text(t) => {
                        let len = t.chars().count();
                        out.push(TextSegment {
                            path: NodePath(path.clone()),
                            start: *offset,
                            len,
                        });
                        *offset += len;
                    }
                    Node::Element(e) => walk(&e.children, path, offset, out),
                    Node::Comment(_) => {}
                }
                path.pop();
            }
        }

        let mut out = Vec::new();
        walk(&self.nodes, &mut Vec::new(), &mut 0, &mut out);
        out
    }

    /// Flat char offset to a `(text node, offset)` position. An offset on a
    /// boundary between two text nodes resolves to the start of the later one;
    /// the very end resolves to the end of the last node.
    pub fn locate(&self, char_offset: usize) -> Option<(NodePath, usize)> {
        let segments = self.text_segments();
        if let Some(seg) = segments
            .iter()
            .find(|s| char_offset >= s.start && char_offset < s.end())
        {
            return Some((seg.path.clone(), char_offset - seg.start));
        }
        segments
            .iter()
            .rev()
            .find(|s| s.end() == char_offset)
            .map(|s| (s.path.clone(), s.len))
    }

    /// Inverse of `locate`. `None` when `path` is not a text node or `offset`
    /// runs past its end.
    pub fn flat_offset(&self, path: &NodePath, offset: usize) -> Option<usize> {
        let seg = self.text_segments().into_iter().find(|s| &s.path == path)?;
        (offset <= seg.len).then_some(seg.start + offset)
    }

    /// Flat `[start, end)` char span covered by the node at `path`.
    pub fn span_of(&self, path: &NodePath) -> Option<(usize, usize)> {
        let node = self.node(path)?;
        let start = self
            .text_segments()
            .into_iter()
            .find(|s| s.path.0.starts_with(&path.0))
            .map(|s| s.start)
            .unwrap_or_else(|| self.offset_before(path));
        Some((start, start + node.text_len()))
    }

    /// Chars of text that precede `path` in document order.
    fn offset_before(&self, path: &NodePath) -> usize {
        self.text_segments()
            .into_iter()
            .take_while(|s| s.path < *path)
            .map(|s| s.len)
            .sum()
    }

    /// Merge adjacent text siblings at every level.
    pub fn normalize(&mut self) {
        fn merge(nodes: &mut Vec<Node>) {
            let mut merged: Vec<Node> = Vec::with_capacity(nodes.len());
            for node in nodes.drain(..) {
                match node {
                    Node::Text(t) if t.is_empty() => {}
                    Node::Text(t) => {
                        if let Some(Node::Text(prev)) = merged.last_mut() {
                            prev.push_str(&t);
                        } else {
                            merged.push(Node::Text(t));
                        }
                    }
                    Node::Element(mut e) => {
                        merge(&mut e.children);
                        merged.push(Node::Element(e));
                    }
                    other => merged.push(other),
                }
            }
            *nodes = merged;
        }
        merge(&mut self.nodes);
    }
}

/// Byte index of the `n`th char of `s`, or `s.len()` past the end.
pub(crate) fn char_to_byte(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len())
}
