use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use readcoach::curriculum::{Week, phase_for_week};

use crate::ui::layout::scroll_to;
use crate::ui::theme::Theme;

/// Curriculum weeks with phase, theme and completion.
pub struct WeekList<'a> {
    pub weeks: &'a [Week],
    pub completed: &'a [u32],
    pub selected: usize,
    pub theme: &'a Theme,
}

impl Widget for WeekList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let done = self.completed.len().min(self.weeks.len());

        let block = Block::bordered()
            .title(format!(" Curriculum ({done}/{} complete) ", self.weeks.len()))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();
        for (i, week) in self.weeks.iter().enumerate() {
            let is_selected = i == self.selected;
            let is_done = self.completed.contains(&week.id);
            let prefix = if is_selected { " \u{25b6} " } else { "   " };
            let check = if is_done { "\u{2713} " } else { "  " };
            let label_style = if is_selected {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            lines.push(Line::from(vec![
                Span::styled(prefix, label_style),
                Span::styled(check, Style::default().fg(colors.success())),
                Span::styled(format!("Week {:>2}  {}", week.id, week.title), label_style),
            ]));
            lines.push(Line::from(Span::styled(
                format!(
                    "        {} \u{00b7} {}",
                    week.theme.label(),
                    phase_for_week(week.id).name()
                ),
                Style::default().fg(colors.text_dim()),
            )));
        }
        if lines.is_empty() {
            lines.push(Line::from(Span::styled(
                "  No weeks available.",
                Style::default().fg(colors.text_dim()),
            )));
        }

        let scroll = scroll_to(self.selected * 2 + 1, inner.height as usize);
        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .render(inner, buf);
    }
}
