use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use readcoach::session::ReviewItem;

use crate::ui::components::styled_text::text_lines;
use crate::ui::layout::scroll_to;
use crate::ui::theme::Theme;

/// Questions answered wrong, newest first, with the answer to learn.
pub struct MistakesView<'a> {
    pub items: &'a [ReviewItem],
    pub selected: usize,
    pub theme: &'a Theme,
}

impl Widget for MistakesView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" Mistakes Review ({}) ", self.items.len()))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.items.is_empty() {
            Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  No mistakes to review. Great job!",
                    Style::default().fg(colors.success()),
                )),
            ])
            .render(inner, buf);
            return;
        }
        let width = inner.width.saturating_sub(1) as usize;

        let mut lines: Vec<Line> = Vec::new();
        let mut focus_line = 0;
        for (i, item) in self.items.iter().enumerate() {
            let is_selected = i == self.selected;
            let title_style = if is_selected {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            let mut header = vec![
                Span::styled(if is_selected { " \u{25b6} " } else { "   " }, title_style),
                Span::styled(item.week_title.clone(), title_style),
            ];
            if let Some(kind) = item.kind {
                header.push(Span::styled(
                    format!("  [{}]", kind.label()),
                    Style::default().fg(colors.text_dim()),
                ));
            }
            lines.push(Line::from(header));
            lines.extend(text_lines(&item.question_text, Style::default().fg(colors.fg()), width, 3));
            if is_selected && !item.correct_answer.is_empty() {
                lines.extend(text_lines(
                    &format!("Answer: {}", item.correct_answer),
                    Style::default().fg(colors.success()),
                    width,
                    3,
                ));
            }
            if is_selected {
                focus_line = lines.len().saturating_sub(1);
            }
            lines.push(Line::from(""));
        }

        let scroll = scroll_to(focus_line, inner.height as usize);
        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .render(inner, buf);
    }
}
