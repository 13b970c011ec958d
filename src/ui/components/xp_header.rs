use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use readcoach::engine::scoring;
use readcoach::engine::xp::XpState;

use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;

/// Title bar: screen name, learner, level badge, progress to the next level.
pub struct XpHeader<'a> {
    title: &'a str,
    user: Option<&'a str>,
    state: Option<&'a XpState>,
    theme: &'a Theme,
}

impl<'a> XpHeader<'a> {
    pub fn new(title: &'a str, user: Option<&'a str>, state: Option<&'a XpState>, theme: &'a Theme) -> Self {
        Self {
            title,
            user,
            state,
            theme,
        }
    }
}

impl Widget for XpHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.header_bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(50)])
            .split(inner);

        let mut title = vec![
            Span::styled(
                " readcoach ",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("| {}", self.title), Style::default().fg(colors.header_fg())),
        ];
        if let Some(user) = self.user {
            title.push(Span::styled(format!("  ({user})"), Style::default().fg(colors.text_dim())));
        }
        Paragraph::new(Line::from(title)).render(columns[0], buf);

        let Some(state) = self.state else {
            return;
        };
        let parts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(9),
                Constraint::Min(10),
                Constraint::Length(12),
                Constraint::Length(9),
            ])
            .split(columns[1]);

        let level = state.level();
        Paragraph::new(Span::styled(
            format!(" Lvl {level} "),
            Style::default()
                .fg(colors.warning())
                .add_modifier(Modifier::BOLD),
        ))
        .render(parts[0], buf);

        let to_next = scoring::xp_to_next_level(state.xp);
        ProgressBar::new(scoring::level_progress(state.xp), self.theme)
            .caption(format!("{to_next} to go"))
            .render(parts[1], buf);

        Paragraph::new(Span::styled(
            format!(" {} XP", state.xp),
            Style::default().fg(colors.accent()),
        ))
        .render(parts[2], buf);

        Paragraph::new(Span::styled(
            format!("{}d streak", state.streak),
            Style::default().fg(colors.success()),
        ))
        .render(parts[3], buf);
    }
}
