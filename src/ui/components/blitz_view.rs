use rand::Rng;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use readcoach::session::{AnswerOutcome, BlitzGame, BlitzPhase};

use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;

const LETTERS: [char; 4] = ['a', 'b', 'c', 'd'];

pub struct BlitzView<'a, R: Rng> {
    pub game: &'a BlitzGame<R>,
    pub last: Option<AnswerOutcome>,
    pub duration_secs: u64,
    pub theme: &'a Theme,
}

impl<'a, R: Rng> BlitzView<'a, R> {
    pub fn new(game: &'a BlitzGame<R>, last: Option<AnswerOutcome>, duration_secs: u64, theme: &'a Theme) -> Self {
        Self {
            game,
            last,
            duration_secs,
            theme,
        }
    }

    fn render_intro(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Vocabulary Blitz",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("Match as many words to their definitions as you can in {} seconds.", self.duration_secs),
                Style::default().fg(colors.fg()),
            )),
            Line::from(Span::styled(
                "Each streak adds bonus points. Half your score becomes XP.",
                Style::default().fg(colors.text_dim()),
            )),
            Line::from(""),
            Line::from(Span::styled("[Enter] Start", Style::default().fg(colors.accent()))),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }

    fn render_playing(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let remaining = self.game.time_left();
        let ratio = if self.duration_secs == 0 {
            0.0
        } else {
            remaining as f64 / self.duration_secs as f64
        };
        let fill = if remaining <= 10 { colors.error() } else { colors.bar_filled() };
        ProgressBar::new(ratio, self.theme)
            .caption(format!("{remaining}s"))
            .fill(fill)
            .render(layout[0], buf);

        let score_line = Line::from(vec![
            Span::styled("  Score: ", Style::default().fg(colors.fg())),
            Span::styled(
                self.game.score().to_string(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("   Streak: ", Style::default().fg(colors.fg())),
            Span::styled(self.game.streak().to_string(), Style::default().fg(colors.warning())),
        ]);
        Paragraph::new(score_line).render(layout[1], buf);

        let Some(question) = self.game.question() else {
            Paragraph::new(Span::styled(
                "  No vocabulary available.",
                Style::default().fg(colors.error()),
            ))
            .render(layout[3], buf);
            return;
        };

        Paragraph::new(Line::from(Span::styled(
            question.word.clone(),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::bordered().border_style(Style::default().fg(colors.border())))
        .render(layout[3], buf);

        let mut options = Vec::new();
        for (i, option) in question.options.iter().enumerate() {
            let letter = LETTERS.get(i).copied().unwrap_or('?');
            options.push(Line::from(vec![
                Span::styled(format!("  [{letter}] "), Style::default().fg(colors.accent())),
                Span::styled(option.clone(), Style::default().fg(colors.fg())),
            ]));
            options.push(Line::from(""));
        }
        Paragraph::new(options)
            .wrap(Wrap { trim: false })
            .render(layout[4], buf);

        if let Some(last) = self.last {
            let (text, color) = if last.correct {
                (format!("  Correct! +{}", last.points), colors.success())
            } else {
                ("  Wrong. Streak reset.".to_string(), colors.error())
            };
            Paragraph::new(Span::styled(text, Style::default().fg(color))).render(layout[5], buf);
        }
    }

    fn render_results(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let score = self.game.score();
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Time's Up!",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Score:    ", Style::default().fg(colors.fg())),
                Span::styled(
                    score.to_string(),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Answered: ", Style::default().fg(colors.fg())),
                Span::styled(self.game.answered().to_string(), Style::default().fg(colors.fg())),
            ]),
            Line::from(vec![
                Span::styled("XP:       ", Style::default().fg(colors.fg())),
                Span::styled(format!("+{}", score / 2), Style::default().fg(colors.success())),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "[Enter] Play Again  [Esc] Menu",
                Style::default().fg(colors.accent()),
            )),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

impl<R: Rng> Widget for BlitzView<'_, R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Vocabulary Blitz ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        match self.game.phase() {
            BlitzPhase::Menu => self.render_intro(inner, buf),
            BlitzPhase::Playing => self.render_playing(inner, buf),
            BlitzPhase::Finished => self.render_results(inner, buf),
        }
    }
}
