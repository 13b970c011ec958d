use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use readcoach::paraphrase::TextField;

use crate::ui::components::styled_text::field_chars;
use crate::ui::theme::Theme;

pub struct LoginView<'a> {
    pub field: &'a TextField,
    pub error: Option<&'a str>,
    pub theme: &'a Theme,
}

impl Widget for LoginView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Sign In ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let input = field_chars(
            self.field,
            Style::default().fg(colors.fg()).bg(colors.accent_dim()),
            Style::default().fg(colors.cursor_fg()).bg(colors.cursor_bg()),
            true,
            "",
        );
        let mut input_spans: Vec<Span> = input
            .into_iter()
            .map(|(c, style)| Span::styled(c.to_string(), style))
            .collect();
        input_spans.insert(0, Span::styled("Name: ", Style::default().fg(colors.fg())));

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "readcoach",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Reading Comprehension Coach",
                Style::default().fg(colors.text_dim()),
            )),
            Line::from(""),
            Line::from(input_spans),
            Line::from(""),
        ];
        if let Some(error) = self.error {
            lines.push(Line::from(Span::styled(error.to_string(), Style::default().fg(colors.error()))));
        }
        lines.push(Line::from(Span::styled(
            "[Enter] Sign in  [Esc] Quit",
            Style::default().fg(colors.text_dim()),
        )));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}
