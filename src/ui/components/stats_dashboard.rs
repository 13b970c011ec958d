use std::collections::BTreeMap;

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use readcoach::engine::analytics::ThemeProgress;
use readcoach::engine::scoring;
use readcoach::engine::xp::XpState;
use readcoach::engine::{SkillCategory, SkillStats};

use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::layout::LayoutTier;
use crate::ui::theme::Theme;

pub struct StatsDashboard<'a> {
    pub xp: &'a XpState,
    pub daily_goal: u64,
    pub skills: &'a BTreeMap<SkillCategory, SkillStats>,
    pub themes: &'a [ThemeProgress],
    pub weeks_completed: usize,
    pub weeks_total: usize,
    pub mistakes: usize,
    pub theme: &'a Theme,
}

impl<'a> StatsDashboard<'a> {
    pub fn new(
        xp: &'a XpState,
        daily_goal: u64,
        skills: &'a BTreeMap<SkillCategory, SkillStats>,
        themes: &'a [ThemeProgress],
        theme: &'a Theme,
    ) -> Self {
        Self {
            xp,
            daily_goal,
            skills,
            themes,
            weeks_completed: 0,
            weeks_total: 0,
            mistakes: 0,
            theme,
        }
    }

    pub fn weeks(mut self, completed: usize, total: usize) -> Self {
        self.weeks_completed = completed;
        self.weeks_total = total;
        self
    }

    pub fn mistakes(mut self, count: usize) -> Self {
        self.mistakes = count;
        self
    }

    fn render_overview(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Progress ")
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(inner);

        let label = Style::default().fg(colors.fg());
        let value = Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD);
        let lines = vec![
            Line::from(vec![
                Span::styled("  Level:   ", label),
                Span::styled(self.xp.level().to_string(), value),
            ]),
            Line::from(vec![
                Span::styled("  XP:      ", label),
                Span::styled(self.xp.xp.to_string(), value),
                Span::styled(
                    format!("  ({} to next level)", scoring::xp_to_next_level(self.xp.xp)),
                    Style::default().fg(colors.text_dim()),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Streak:  ", label),
                Span::styled(
                    format!("{} day{}", self.xp.streak, if self.xp.streak == 1 { "" } else { "s" }),
                    Style::default().fg(colors.success()),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Weeks:   ", label),
                Span::styled(format!("{}/{}", self.weeks_completed, self.weeks_total), label),
            ]),
            Line::from(vec![
                Span::styled("  Review:  ", label),
                Span::styled(
                    format!("{} mistake{} pending", self.mistakes, if self.mistakes == 1 { "" } else { "s" }),
                    Style::default().fg(if self.mistakes == 0 { colors.success() } else { colors.warning() }),
                ),
            ]),
        ];
        Paragraph::new(lines).render(layout[0], buf);

        ProgressBar::new(scoring::level_progress(self.xp.xp), self.theme)
            .label("Level Progress")
            .render(layout[1], buf);

        let daily = scoring::daily_progress(self.xp.daily_xp, self.daily_goal);
        let fill = if daily >= 1.0 { colors.success() } else { colors.bar_filled() };
        ProgressBar::new(daily, self.theme)
            .label("Daily Goal")
            .caption(format!("{}/{} XP", self.xp.daily_xp, self.daily_goal))
            .fill(fill)
            .render(layout[2], buf);
    }

    fn render_skills(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Skill Mastery ")
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(SkillCategory::ALL.iter().map(|_| Constraint::Length(2)).collect::<Vec<_>>())
            .split(inner);

        for (row, category) in rows.iter().zip(SkillCategory::ALL) {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Length(1)])
                .split(*row);
            match self.skills.get(&category) {
                Some(stats) => {
                    let color = colors.mastery(stats.band());
                    Paragraph::new(Line::from(vec![
                        Span::styled(format!(" {}", category.label()), Style::default().fg(colors.fg())),
                        Span::styled(
                            format!("  {}/{}", stats.correct_count, stats.total_attempts),
                            Style::default().fg(colors.text_dim()),
                        ),
                    ]))
                    .render(parts[0], buf);
                    ProgressBar::new(stats.accuracy as f64 / 100.0, self.theme)
                        .caption(format!("{}%", stats.accuracy))
                        .fill(color)
                        .render(parts[1], buf);
                }
                None => {
                    Paragraph::new(Line::from(vec![
                        Span::styled(format!(" {}", category.label()), Style::default().fg(colors.fg())),
                        Span::styled("  No attempts yet", Style::default().fg(colors.text_dim())),
                    ]))
                    .render(parts[0], buf);
                }
            }
        }
    }

    fn render_themes(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Themes ")
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(self.themes.iter().map(|_| Constraint::Length(1)).collect::<Vec<_>>())
            .split(inner);
        for (row, progress) in rows.iter().zip(self.themes) {
            let parts = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(22), Constraint::Min(10)])
                .split(*row);
            Paragraph::new(Span::styled(
                format!(" {}", progress.theme.label()),
                Style::default().fg(colors.fg()),
            ))
            .render(parts[0], buf);
            ProgressBar::new(progress.percent() as f64 / 100.0, self.theme)
                .caption(format!("{}/{} weeks", progress.completed, progress.total))
                .render(parts[1], buf);
        }
    }
}

impl Widget for StatsDashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Statistics ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let direction = match LayoutTier::from_area(inner) {
            LayoutTier::Wide => Direction::Horizontal,
            LayoutTier::Narrow => Direction::Vertical,
        };
        let columns = Layout::default()
            .direction(direction)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(inner);
        self.render_overview(columns[0], buf);

        let theme_rows = self.themes.len() as u16 + 2;
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(10), Constraint::Length(theme_rows)])
            .split(columns[1]);
        self.render_skills(right[0], buf);
        self.render_themes(right[1], buf);
    }
}
