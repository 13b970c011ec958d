use thiserror::Error;

use crate::markup::node::{Attr, Closing, Element, Fragment, Node, is_void_tag};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("closing tag </{tag}> at byte {offset} has no matching open tag")]
    UnexpectedClose { tag: String, offset: usize },
    #[error("expected </{expected}> but found </{found}> at byte {offset}")]
    MismatchedClose {
        expected: String,
        found: String,
        offset: usize,
    },
    #[error("<{tag}> is never closed")]
    Unclosed { tag: String },
    #[error("tag starting at byte {offset} is not terminated")]
    UnterminatedTag { offset: usize },
    #[error("comment starting at byte {offset} is not terminated")]
    UnterminatedComment { offset: usize },
}

/// Parse an HTML fragment into a node tree.
///
/// This is a small, strict parser for curriculum passage markup: tags must
/// nest properly, void elements (`<br>`) and `<x/>` need no closing tag, and
/// a `<` that does not start a tag is kept as text.
pub fn parse_fragment(html: &str) -> Result<Fragment, ParseError> {
    let mut parser = Parser { src: html, pos: 0 };
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Vec<Node> = Vec::new();

    fn push(stack: &mut [Element], root: &mut Vec<Node>, node: Node) {
        match stack.last_mut() {
            Some(open) => open.children.push(node),
            None => root.push(node),
        }
    }

    while !parser.at_end() {
        let start = parser.pos;
        if parser.rest().starts_with("<!--") {
            let body_start = start + 4;
            let Some(len) = html[body_start..].find("-->") else {
                return Err(ParseError::UnterminatedComment { offset: start });
            };
            push(
                &mut stack,
                &mut root,
                Node::Comment(html[body_start..body_start + len].to_string()),
            );
            parser.pos = body_start + len + 3;
        } else if parser.rest().starts_with("</") {
            parser.pos += 2;
            let tag = parser.take_name();
            parser.skip_whitespace();
            if !parser.eat('>') {
                return Err(ParseError::UnterminatedTag { offset: start });
            }
            let Some(mut open) = stack.pop() else {
                return Err(ParseError::UnexpectedClose { tag, offset: start });
            };
            if !open.tag.eq_ignore_ascii_case(&tag) {
                return Err(ParseError::MismatchedClose {
                    expected: open.tag,
                    found: tag,
                    offset: start,
                });
            }
            open.closing = Closing::Normal;
            push(&mut stack, &mut root, Node::Element(open));
        } else if parser.starts_tag() {
            parser.pos += 1;
            let element = parser.take_start_tag(start)?;
            if element.closing == Closing::Normal {
                stack.push(element);
            } else {
                push(&mut stack, &mut root, Node::Element(element));
            }
        } else {
            let text = parser.take_text();
            push(&mut stack, &mut root, Node::Text(text.to_string()));
        }
    }

    if let Some(open) = stack.pop() {
        return Err(ParseError::Unclosed { tag: open.tag });
    }
    Ok(Fragment::new(root))
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn starts_tag(&self) -> bool {
        let mut chars = self.rest().chars();
        chars.next() == Some('<') && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
    }

    fn starts_markup(&self) -> bool {
        self.starts_tag() || self.rest().starts_with("</") || self.rest().starts_with("<!--")
    }

    fn take_text(&mut self) -> &'a str {
        let start = self.pos;
        // A lone '<' that opens nothing is ordinary text.
        self.pos += self.peek().map_or(0, char::len_utf8);
        while !self.at_end() && !self.starts_markup() {
            let step = self.rest().find('<').unwrap_or(self.rest().len());
            self.pos += step.max(1);
        }
        &self.src[start..self.pos]
    }

    fn take_name(&mut self) -> String {
        let rest = self.rest();
        let len = rest
            .find(|c: char| c.is_whitespace() || matches!(c, '>' | '/' | '='))
            .unwrap_or(rest.len());
        self.pos += len;
        rest[..len].to_string()
    }

    fn take_start_tag(&mut self, start: usize) -> Result<Element, ParseError> {
        let tag = self.take_name();
        let mut attrs = Vec::new();
        loop {
            self.skip_whitespace();
            if self.at_end() {
                return Err(ParseError::UnterminatedTag { offset: start });
            }
            if self.rest().starts_with("/>") {
                self.pos += 2;
                let mut element = Element::new(&tag, attrs, Vec::new());
                element.closing = Closing::SelfClosing;
                return Ok(element);
            }
            if self.eat('>') {
                let mut element = Element::new(&tag, attrs, Vec::new());
                if is_void_tag(&tag) {
                    element.closing = Closing::Void;
                }
                return Ok(element);
            }
            if self.eat('/') {
                continue;
            }
            attrs.push(self.take_attr(start)?);
        }
    }

    fn take_attr(&mut self, start: usize) -> Result<Attr, ParseError> {
        let name = self.take_name();
        if name.is_empty() {
            return Err(ParseError::UnterminatedTag { offset: start });
        }
        self.skip_whitespace();
        if !self.eat('=') {
            return Ok(Attr { name, value: None });
        }
        self.skip_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let Some(len) = self.rest().find(quote) else {
                    return Err(ParseError::UnterminatedTag { offset: start });
                };
                let value = &self.rest()[..len];
                self.pos += len + 1;
                value
            }
            _ => {
                let rest = self.rest();
                let len = rest
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(rest.len());
                self.pos += len;
                &rest[..len]
            }
        };
        Ok(Attr {
            name,
            value: Some(value.to_string()),
        })
    }
}
