use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use readcoach::curriculum::VocabItem;
use readcoach::paraphrase::TextField;

use crate::ui::components::styled_text::field_chars;
use crate::ui::layout::scroll_to;
use crate::ui::theme::Theme;

/// Searchable list of every week's key terms.
pub struct VocabularyList<'a> {
    pub items: &'a [&'a VocabItem],
    pub total: usize,
    pub query: &'a TextField,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl Widget for VocabularyList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" Vocabulary ({}/{} terms) ", self.items.len(), self.total))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let [search_area, list_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(1)]).areas(inner);

        let mut search: Vec<Span> = vec![Span::styled(" Search: ", Style::default().fg(colors.text_dim()))];
        search.extend(
            field_chars(
                self.query,
                Style::default().fg(colors.fg()),
                Style::default().fg(colors.cursor_fg()).bg(colors.cursor_bg()),
                true,
                "",
            )
            .into_iter()
            .map(|(c, style)| Span::styled(c.to_string(), style)),
        );
        Paragraph::new(Line::from(search)).render(search_area, buf);

        let mut lines: Vec<Line> = Vec::new();
        for (i, item) in self.items.iter().enumerate() {
            let is_selected = i == self.selected;
            let prefix = if is_selected { " \u{25b6} " } else { "   " };
            let label_style = if is_selected {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            lines.push(Line::from(vec![
                Span::styled(prefix, label_style),
                Span::styled(item.word.clone(), label_style),
                Span::styled(format!("  Week {}", item.week_id), Style::default().fg(colors.text_dim())),
            ]));
            lines.push(Line::from(Span::styled(
                format!("      {}", item.definition),
                Style::default().fg(colors.text_dim()),
            )));
        }
        if lines.is_empty() {
            lines.push(Line::from(Span::styled(
                "  No matching vocabulary found.",
                Style::default().fg(colors.text_dim()),
            )));
        }

        let scroll = scroll_to(self.selected * 2 + 1, list_area.height as usize);
        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .render(list_area, buf);
    }
}
