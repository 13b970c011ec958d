use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph, Widget};

use readcoach::session::GateState;
use readcoach::session::checkpoint::FAILURE_MESSAGE;

use crate::reader::{Focus, WeekReader};
use crate::ui::components::styled_text::{field_chars, fragment_chars, line_of, text_lines, wrap_styled};
use crate::ui::layout::scroll_to;
use crate::ui::theme::Theme;

const INDENT: usize = 1;

/// The reading pane of a week: annotated paragraphs with caret, selection
/// and the checkpoint under the last unlocked paragraph.
pub struct PassageView<'a> {
    reader: &'a WeekReader,
    title: &'a str,
    theme: &'a Theme,
}

impl<'a> PassageView<'a> {
    pub fn new(reader: &'a WeekReader, title: &'a str, theme: &'a Theme) -> Self {
        Self { reader, title, theme }
    }

    fn gate_lines(&self, state: GateState, width: usize) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let dim = Style::default().fg(colors.text_dim());
        let mut lines = vec![Line::from(""), Line::styled(" ".to_string() + &"-".repeat(width.saturating_sub(2)), dim)];
        match state {
            GateState::Locked => {
                lines.extend(text_lines("Highlight a key sentence to unlock", dim, width, INDENT));
            }
            GateState::Collapsed => {
                lines.extend(text_lines(
                    "Answer question to continue... [Enter]",
                    Style::default().fg(colors.accent()),
                    width,
                    INDENT,
                ));
            }
            GateState::Expanded => {
                let Some((gate, _)) = self.reader.pending_gate() else {
                    return lines;
                };
                lines.extend(text_lines(
                    "Comprehension Check",
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                    width,
                    INDENT,
                ));
                lines.extend(text_lines(
                    "In one sentence, what is the main point of the paragraph above?",
                    Style::default().fg(colors.fg()),
                    width,
                    INDENT,
                ));
                let focused = self.reader.focus() == Focus::Checkpoint;
                let input = field_chars(
                    gate.summary(),
                    Style::default().fg(colors.fg()).bg(colors.accent_dim()),
                    Style::default().fg(colors.cursor_fg()).bg(colors.cursor_bg()),
                    focused,
                    "Type your summary...",
                );
                lines.extend(wrap_styled(&input, width, INDENT + 1).0);
                let action = if gate.summary_is_valid() {
                    Style::default().fg(colors.success())
                } else {
                    dim
                };
                lines.extend(text_lines("[Enter] Continue Reading  [Ctrl+X] I'm not sure", action, width, INDENT));
            }
            GateState::Failed => {
                lines.extend(text_lines(FAILURE_MESSAGE, Style::default().fg(colors.error()), width, INDENT));
                lines.extend(text_lines("[r] Retry", dim, width, INDENT));
            }
            GateState::Unlocked => {}
        }
        lines
    }
}

impl Widget for PassageView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let focused = matches!(self.reader.focus(), Focus::Passage | Focus::Checkpoint);
        let border = if focused { colors.border_focused() } else { colors.border() };

        let reader = self.reader;
        let index = reader.quiz.active_passage();
        let title = if reader.passage_count() > 1 {
            format!(" {} ({}/{}) ", self.title, index + 1, reader.passage_count())
        } else {
            format!(" {} ", self.title)
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width < 4 || inner.height == 0 {
            return;
        }
        let width = inner.width as usize - 1;

        let base = Style::default().fg(colors.fg());
        let selected = Style::default().bg(colors.accent_dim());
        let caret = Style::default().fg(colors.cursor_fg()).bg(colors.cursor_bg());
        let cursor = reader.cursor();

        let mut lines: Vec<Line<'static>> = Vec::new();
        let mut focus_line = 0;
        for p in 0..reader.visible_paragraphs() {
            let Ok(fragment) = reader.passage().fragment(p) else {
                lines.extend(text_lines("(unreadable paragraph)", Style::default().fg(colors.error()), width, INDENT));
                continue;
            };
            let mut chars = fragment_chars(&fragment, base, self.theme);
            for (offset, (_, style)) in chars.iter_mut().enumerate() {
                if reader.is_selected(p, offset) {
                    *style = style.patch(selected);
                }
            }
            if focused && cursor.paragraph == p {
                match chars.get_mut(cursor.offset) {
                    Some((_, style)) => *style = style.patch(caret),
                    None => chars.push((' ', caret)),
                }
            }
            let (wrapped, ranges) = wrap_styled(&chars, width, INDENT);
            if cursor.paragraph == p {
                focus_line = lines.len() + line_of(&ranges, cursor.offset);
            }
            lines.extend(wrapped);
            lines.push(Line::from(""));
        }

        if let Some((_, state)) = reader.pending_gate() {
            let gate_start = lines.len();
            lines.extend(self.gate_lines(state, width));
            if reader.focus() == Focus::Checkpoint {
                focus_line = lines.len().saturating_sub(1).max(gate_start);
            }
        }

        let scroll = scroll_to(focus_line, inner.height as usize);
        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .render(inner, buf);
    }
}

/// Read-only rendering of passage HTML, used by the trainer.
pub struct StaticPassage<'a> {
    html: &'a str,
    title: &'a str,
    theme: &'a Theme,
}

impl<'a> StaticPassage<'a> {
    pub fn new(html: &'a str, title: &'a str, theme: &'a Theme) -> Self {
        Self { html, title, theme }
    }
}

impl Widget for StaticPassage<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width < 4 {
            return;
        }
        let width = inner.width as usize - 1;
        let base = Style::default().fg(colors.fg());

        let mut lines: Vec<Line<'static>> = Vec::new();
        for chunk in readcoach::markup::split_paragraphs(self.html) {
            match readcoach::markup::parse_fragment(&chunk) {
                Ok(fragment) => {
                    let chars = fragment_chars(&fragment, base, self.theme);
                    lines.extend(wrap_styled(&chars, width, INDENT).0);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "trainer paragraph failed to parse");
                    lines.extend(text_lines(&chunk, base, width, INDENT));
                }
            }
            lines.push(Line::from(""));
        }
        Paragraph::new(lines).render(inner, buf);
    }
}
