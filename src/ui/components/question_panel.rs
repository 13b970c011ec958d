use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use readcoach::curriculum::phases::EXAM_PHASE_NAME;
use readcoach::curriculum::{Question, interview_prompts};

use crate::reader::{Focus, WeekReader};
use crate::ui::components::styled_text::{field_chars, text_lines, wrap_styled};
use crate::ui::layout::scroll_to;
use crate::ui::theme::Theme;

pub const DEFAULT_HINT: &str = "Focus on the author's argument. Identify the core conflict.";

const LETTERS: [char; 6] = ['a', 'b', 'c', 'd', 'e', 'f'];

/// Score, phase and timer, the hint box, then each question of the passage.
pub struct QuestionPanel<'a> {
    reader: &'a WeekReader,
    theme: &'a Theme,
}

impl<'a> QuestionPanel<'a> {
    pub fn new(reader: &'a WeekReader, theme: &'a Theme) -> Self {
        Self { reader, theme }
    }

    fn status_line(&self) -> Line<'static> {
        let colors = &self.theme.colors;
        let quiz = &self.reader.quiz;
        let (correct, total) = self.reader.passage_score();
        let percent = if total == 0 { 0 } else { correct * 100 / total };

        let phase = if quiz.is_exam_mode() {
            EXAM_PHASE_NAME
        } else {
            self.reader.phase().name()
        };
        let mut spans = vec![
            Span::styled(format!(" {phase} "), Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD)),
            Span::styled(format!(" Score {correct}/{total} ({percent}%)"), Style::default().fg(colors.fg())),
        ];
        if quiz.has_timer() {
            let style = if quiz.is_time_up() {
                Style::default().fg(colors.error()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.warning())
            };
            spans.push(Span::styled(format!("  {}", quiz.countdown().display()), style));
        }
        if quiz.is_complete() {
            spans.push(Span::styled("  Completed", Style::default().fg(colors.success()).add_modifier(Modifier::BOLD)));
        }
        Line::from(spans)
    }

    fn question_lines(&self, index: usize, question: &Question, width: usize) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let reader = self.reader;
        let quiz = &reader.quiz;
        let current = index == reader.question_index() && reader.focus() == Focus::Questions;

        let marker = if current { ">" } else { " " };
        let title_style = if current {
            Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD)
        };
        let mut lines = vec![Line::from(vec![
            Span::styled(format!("{marker}Q{} ", index + 1), title_style),
            Span::styled(format!("[{}]", question.kind.label()), Style::default().fg(colors.text_dim())),
        ])];
        lines.extend(text_lines(&question.text, Style::default().fg(colors.fg()), width, 2));

        if question.is_multiple_choice() {
            let chosen = quiz.selected(&question.id);
            for (i, option) in question.options.iter().enumerate() {
                let letter = LETTERS.get(i).copied().unwrap_or('?');
                let style = match chosen {
                    Some(_) if question.is_correct(option) => Style::default().fg(colors.success()),
                    Some(c) if c == option => Style::default().fg(colors.error()).add_modifier(Modifier::CROSSED_OUT),
                    Some(_) => Style::default().fg(colors.text_dim()),
                    None if current && i == reader.option_index() => {
                        Style::default().fg(colors.fg()).bg(colors.accent_dim())
                    }
                    None => Style::default().fg(colors.fg()),
                };
                lines.extend(text_lines(&format!("{letter}) {option}"), style, width, 3));
            }
            if let Some(choice) = chosen {
                let (message, color) = if question.is_correct(choice) {
                    ("Correct!", colors.success())
                } else {
                    ("Incorrect. Added to Mistakes Review.", colors.error())
                };
                lines.extend(text_lines(message, Style::default().fg(color), width, 3));
            }
        } else if quiz.is_paraphrased(&question.id) {
            lines.extend(text_lines(
                "Paraphrase submitted.",
                Style::default().fg(colors.success()),
                width,
                3,
            ));
        } else if let Some(answer) = reader.answer(&question.id) {
            let input = field_chars(
                answer.field(),
                Style::default().fg(colors.fg()).bg(colors.accent_dim()),
                Style::default().fg(colors.cursor_fg()).bg(colors.cursor_bg()),
                current,
                "Write it in your own words...",
            );
            lines.extend(wrap_styled(&input, width, 3).0);
            let validation = answer.validation();
            let count = format!("{}/{} words", answer.word_count(), answer.min_words());
            let status = match validation.error() {
                Some(err) => Span::styled(format!("  {err}"), Style::default().fg(colors.error())),
                None if validation.is_valid() => {
                    Span::styled("  [Enter] Submit", Style::default().fg(colors.success()))
                }
                None => Span::raw(""),
            };
            lines.push(Line::from(vec![
                Span::styled(format!("   {count}"), Style::default().fg(colors.text_dim())),
                status,
            ]));
        }
        lines.push(Line::from(""));
        lines
    }
}

impl Widget for QuestionPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let reader = self.reader;
        let border = if reader.focus() == Focus::Questions {
            colors.border_focused()
        } else {
            colors.border()
        };
        let block = Block::bordered()
            .title(" Questions ")
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width < 6 || inner.height == 0 {
            return;
        }
        let width = inner.width as usize - 1;

        let mut lines = vec![self.status_line(), Line::from("")];

        if reader.phase().show_hint_box {
            let hint = reader
                .quiz
                .passage()
                .and_then(|p| p.main_idea_hint.as_deref())
                .unwrap_or(DEFAULT_HINT);
            lines.push(Line::styled(
                " Hint",
                Style::default().fg(colors.warning()).add_modifier(Modifier::BOLD),
            ));
            lines.extend(text_lines(hint, Style::default().fg(colors.warning()), width, 2));
            lines.push(Line::from(""));
        }

        let mut focus_line = 0;
        for (i, question) in reader.questions().iter().enumerate() {
            if i == reader.question_index() {
                focus_line = lines.len();
            }
            let block_lines = self.question_lines(i, question, width);
            if i == reader.question_index() {
                focus_line += block_lines.len().saturating_sub(1);
            }
            lines.extend(block_lines);
        }

        if reader.show_interview {
            let theme = reader.quiz.week().theme;
            lines.push(Line::styled(
                " Interview Practice",
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
            ));
            for (i, prompt) in interview_prompts(theme).iter().enumerate() {
                lines.extend(text_lines(&format!("{}. {prompt}", i + 1), Style::default().fg(colors.fg()), width, 2));
            }
            lines.extend(text_lines(
                "Press [c] again to finish the week.",
                Style::default().fg(colors.text_dim()),
                width,
                2,
            ));
            focus_line = lines.len().saturating_sub(1);
        }

        let scroll = scroll_to(focus_line, inner.height as usize);
        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .render(inner, buf);
    }
}
