use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use readcoach::curriculum::TrainerScenario;
use readcoach::paraphrase::AnswerBuffer;

use crate::ui::components::styled_text::{field_chars, text_lines, wrap_styled};
use crate::ui::theme::Theme;

/// The rewrite pane of the no-copy trainer. The scenario text itself is
/// drawn by `StaticPassage`.
pub struct TrainerPanel<'a> {
    pub scenario: &'a TrainerScenario,
    pub position: (usize, usize),
    pub answer: &'a AnswerBuffer,
    pub finished: bool,
    pub theme: &'a Theme,
}

impl Widget for TrainerPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let (index, total) = self.position;

        let block = Block::bordered()
            .title(format!(" Challenge {}/{} ", index + 1, total))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width < 6 {
            return;
        }
        let width = inner.width as usize - 1;

        let mut lines: Vec<Line> = vec![Line::from(Span::styled(
            " Rewrite the underlined sentence in your own words:",
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        ))];
        lines.extend(text_lines(
            &self.scenario.underlined_sentence,
            Style::default()
                .fg(colors.fg())
                .add_modifier(Modifier::UNDERLINED),
            width,
            2,
        ));
        lines.push(Line::from(""));

        if self.finished {
            lines.extend(text_lines(
                "All scenarios done! Use [Tab] and [Shift+Tab] to practise any challenge again.",
                Style::default().fg(colors.success()),
                width,
                1,
            ));
        } else {
            let input = field_chars(
                self.answer.field(),
                Style::default().fg(colors.fg()).bg(colors.accent_dim()),
                Style::default().fg(colors.cursor_fg()).bg(colors.cursor_bg()),
                true,
                "",
            );
            lines.extend(wrap_styled(&input, width, 2).0);
            lines.push(Line::from(""));

            let validation = self.answer.validation();
            lines.push(Line::from(Span::styled(
                format!("  {}/{} words", self.answer.word_count(), self.answer.min_words()),
                Style::default().fg(colors.text_dim()),
            )));
            if let Some(err) = validation.error() {
                lines.extend(text_lines(&err.to_string(), Style::default().fg(colors.error()), width, 2));
            } else if validation.is_valid() {
                lines.push(Line::from(Span::styled("  [Enter] Submit", Style::default().fg(colors.success()))));
            }
        }

        Paragraph::new(lines).render(inner, buf);
    }
}
