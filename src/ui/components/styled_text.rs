use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use readcoach::annotate::HighlightColor;
use readcoach::annotate::mark::{COLOR_ATTR, is_marker};
use readcoach::markup::{Element, Fragment};
use readcoach::paraphrase::TextField;

use crate::ui::layout::wrap_ranges;
use crate::ui::theme::Theme;

pub type StyledChar = (char, Style);

pub fn styled(text: &str, style: Style) -> Vec<StyledChar> {
    text.chars().map(|c| (c, style)).collect()
}

/// Wrap styled chars to `width`, prefixing each line with `indent` spaces.
/// Also returns the `[start, end)` char range each line covers.
pub fn wrap_styled(chars: &[StyledChar], width: usize, indent: usize) -> (Vec<Line<'static>>, Vec<(usize, usize)>) {
    let plain: Vec<char> = chars.iter().map(|(c, _)| *c).collect();
    let ranges = wrap_ranges(&plain, width.saturating_sub(indent).max(1));
    let lines = ranges
        .iter()
        .map(|&(start, end)| {
            let mut spans = Vec::new();
            if indent > 0 {
                spans.push(Span::raw(" ".repeat(indent)));
            }
            spans.extend(group_spans(&chars[start..end]));
            Line::from(spans)
        })
        .collect();
    (lines, ranges)
}

pub fn text_lines(text: &str, style: Style, width: usize, indent: usize) -> Vec<Line<'static>> {
    wrap_styled(&styled(text, style), width, indent).0
}

/// Style one element contributes to the text beneath it.
fn element_style(element: &Element, style: Style, theme: &Theme) -> Style {
    if is_marker(element) {
        return match element.attr(COLOR_ATTR).and_then(|c| c.parse::<HighlightColor>().ok()) {
            Some(color) => style.bg(theme.colors.highlight(color)),
            None => style,
        };
    }
    match element.tag.to_ascii_lowercase().as_str() {
        "strong" | "b" => style.add_modifier(Modifier::BOLD),
        "em" | "i" => style.add_modifier(Modifier::ITALIC),
        "u" => style.add_modifier(Modifier::UNDERLINED),
        _ => style,
    }
}

/// Flatten a paragraph into styled chars, one per char of its text content.
pub fn fragment_chars(fragment: &Fragment, base: Style, theme: &Theme) -> Vec<StyledChar> {
    let mut out = Vec::with_capacity(fragment.text_len());
    for segment in fragment.text_segments() {
        let style = segment
            .path
            .ancestors()
            .filter_map(|path| fragment.node(&path).and_then(|n| n.as_element()))
            .fold(base, |style, element| element_style(element, style, theme));
        if let Some(text) = fragment.node(&segment.path).and_then(|n| n.as_text()) {
            out.extend(text.chars().map(|c| (c, style)));
        }
    }
    out
}

/// Merge runs of equal style into spans. Control whitespace renders as a space.
fn group_spans(chars: &[StyledChar]) -> Vec<Span<'static>> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut run_style: Option<Style> = None;
    for &(c, style) in chars {
        let c = if c.is_whitespace() { ' ' } else { c };
        if run_style != Some(style) {
            if let Some(prev) = run_style {
                spans.push(Span::styled(std::mem::take(&mut run), prev));
            }
            run_style = Some(style);
        }
        run.push(c);
    }
    if let Some(style) = run_style {
        spans.push(Span::styled(run, style));
    }
    spans
}

/// Text field contents with a block cursor when focused.
pub fn field_chars(field: &TextField, base: Style, cursor: Style, focused: bool, placeholder: &str) -> Vec<StyledChar> {
    if field.value().is_empty() && !focused {
        return styled(placeholder, base.add_modifier(Modifier::DIM));
    }
    let (before, at, after) = field.render_parts();
    let mut chars = styled(before, base);
    if focused {
        chars.push((at.unwrap_or(' '), cursor));
    } else if let Some(c) = at {
        chars.push((c, base));
    }
    chars.extend(styled(after, base));
    chars
}

/// Index of the wrapped line holding char `index`.
pub fn line_of(ranges: &[(usize, usize)], index: usize) -> usize {
    ranges
        .iter()
        .position(|&(start, end)| index >= start && index < end)
        .unwrap_or(ranges.len().saturating_sub(1))
}
