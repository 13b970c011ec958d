use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use readcoach::dictionary::LookupResult;

use crate::ui::theme::Theme;

pub struct DefinitionPopup<'a> {
    pub word: &'a str,
    pub result: &'a LookupResult,
    pub theme: &'a Theme,
}

impl Widget for DefinitionPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        Clear.render(area, buf);

        let block = Block::bordered()
            .title(" Definition ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = Vec::new();
        match self.result {
            LookupResult::Found(def) => {
                let mut title = vec![Span::styled(
                    def.word.clone(),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                )];
                if let Some(phonetic) = &def.phonetic {
                    title.push(Span::styled(format!("  {phonetic}"), Style::default().fg(colors.text_dim())));
                }
                if def.offline {
                    title.push(Span::styled("  (curated)", Style::default().fg(colors.text_dim())));
                }
                lines.push(Line::from(title));
                for meaning in &def.meanings {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        meaning.part_of_speech.clone(),
                        Style::default()
                            .fg(colors.warning())
                            .add_modifier(Modifier::ITALIC),
                    )));
                    for (i, text) in meaning.definitions.iter().enumerate() {
                        lines.push(Line::from(Span::styled(
                            format!("{}. {text}", i + 1),
                            Style::default().fg(colors.fg()),
                        )));
                    }
                }
            }
            LookupResult::NotFound => {
                lines.push(Line::from(Span::styled(
                    self.word.to_string(),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Definition not found.",
                    Style::default().fg(colors.text_dim()),
                )));
            }
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("[Esc] Close", Style::default().fg(colors.accent()))));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
