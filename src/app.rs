use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;

use readcoach::annotate::{HighlightColor, HighlightStore};
use readcoach::auth::{self, Session, User};
use readcoach::clock::{Clock, LocalClock};
use readcoach::config::Config;
use readcoach::curriculum::vocab;
use readcoach::curriculum::{Curriculum, TrainerScenario, VocabItem, Week};
use readcoach::dictionary::{Dictionary, DictionaryLookup, LookupResult};
use readcoach::engine::analytics::{SkillDashboard, ThemeProgress, theme_progress};
use readcoach::engine::xp::XpTracker;
use readcoach::feedback::{Cue, Feedback, TerminalBell};
use readcoach::paraphrase::{AnswerBuffer, TextField};
use readcoach::progress::ProgressStore;
use readcoach::session::{
    AnswerOutcome, BlitzGame, QuizRewards, QuizSession, ReviewItem, review_items,
};
use readcoach::store::SharedStore;

use crate::reader::{Focus, WeekReader};
use crate::ui::components::menu::Menu;
use crate::ui::theme::Theme;

const TOAST_DURATION: Duration = Duration::from_secs(3);
pub const COPY_WARNING: &str = "NO COPYING ALLOWED!";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Login,
    Menu,
    WeekSelect,
    Week,
    Blitz,
    Trainer,
    Mistakes,
    Vocabulary,
    Stats,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
}

pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    expires: Instant,
}

/// The word-definition popup.
pub struct DefinitionPopup {
    pub word: String,
    pub result: LookupResult,
}

pub struct App {
    pub screen: AppScreen,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub should_quit: bool,
    pub curriculum: Rc<Curriculum>,
    pub progress: Rc<ProgressStore>,
    pub user: Option<User>,
    pub xp: Option<XpTracker>,
    pub dashboard: Option<SkillDashboard>,
    pub login: TextField,
    pub login_error: Option<String>,
    pub week_selected: usize,
    pub reader: Option<WeekReader>,
    pub definition: Option<DefinitionPopup>,
    pub blitz: BlitzGame<SmallRng>,
    pub blitz_last: Option<AnswerOutcome>,
    pub trainer_index: usize,
    pub trainer_answer: AnswerBuffer,
    pub trainer_submitted: bool,
    pub mistakes_selected: usize,
    pub vocab_query: TextField,
    pub vocab_selected: usize,
    pub toast: Option<Toast>,
    store: SharedStore,
    clock: Rc<dyn Clock>,
    highlights: HighlightStore,
    session: Session,
    feedback: Rc<dyn Feedback>,
    dictionary: Dictionary,
    copy_alert: Rc<Cell<bool>>,
    level_up: Rc<Cell<Option<u32>>>,
    vocabulary: Vec<VocabItem>,
}

impl App {
    pub fn new(config: Config, store: SharedStore, theme: &'static Theme) -> anyhow::Result<Self> {
        let clock: Rc<dyn Clock> = Rc::new(LocalClock);
        let curriculum = Rc::new(Curriculum::load()?);
        let namespace = config.storage_namespace.clone();
        let progress = Rc::new(ProgressStore::new(Rc::clone(&store), &namespace, Rc::clone(&clock)));
        let dictionary = Dictionary::new(curriculum.all_vocabulary(), config.dictionary_lookups_enabled);
        let blitz = BlitzGame::new(curriculum.all_vocabulary(), SmallRng::from_entropy())
            .with_duration(Duration::from_secs(config.blitz_duration_secs));
        let copy_alert = Rc::new(Cell::new(false));
        let vocabulary = curriculum.vocabulary_repository();
        let trainer_answer = trainer_buffer(config.trainer_min_words, &copy_alert);

        let mut app = Self {
            screen: AppScreen::Login,
            menu: Menu::new(theme),
            theme,
            should_quit: false,
            curriculum,
            progress,
            user: None,
            xp: None,
            dashboard: None,
            login: TextField::new(""),
            login_error: None,
            week_selected: 0,
            reader: None,
            definition: None,
            blitz,
            blitz_last: None,
            trainer_index: 0,
            trainer_answer,
            trainer_submitted: false,
            mistakes_selected: 0,
            vocab_query: TextField::new(""),
            vocab_selected: 0,
            toast: None,
            highlights: HighlightStore::new(Rc::clone(&store), &namespace),
            session: Session::new(Rc::clone(&store), &namespace),
            store,
            clock,
            feedback: Rc::new(TerminalBell::stdout()),
            dictionary,
            copy_alert,
            level_up: Rc::new(Cell::new(None)),
            vocabulary,
            config,
        };

        if let Some(user) = app.session.restore() {
            match auth::login(&user.name, &app.config.allowed_users) {
                Ok(user) => app.enter_as(user),
                Err(_) => app.session.logout(),
            }
        }
        Ok(app)
    }

    pub fn user_id(&self) -> &str {
        self.user.as_ref().map_or("", |u| u.id.as_str())
    }

    // --- login ---

    pub fn try_login(&mut self) {
        match auth::login(self.login.value(), &self.config.allowed_users) {
            Ok(user) => {
                self.login.clear();
                self.login_error = None;
                self.enter_as(user);
            }
            Err(e) => self.login_error = Some(e.to_string()),
        }
    }

    pub fn enter_as(&mut self, user: User) {
        self.session.remember(&user);

        let mut xp = XpTracker::load(
            Rc::clone(&self.store),
            &self.config.storage_namespace,
            &user.id,
            Rc::clone(&self.clock),
        )
        .with_daily_goal(self.config.daily_goal_xp);
        let level_up = Rc::clone(&self.level_up);
        xp.set_level_up_hook(move |level| level_up.set(Some(level)));
        xp.begin_session();

        let index = Rc::new(self.curriculum.question_index().clone());
        self.dashboard = Some(SkillDashboard::attach(Rc::clone(&self.progress), index, &user.id));
        self.xp = Some(xp);
        self.user = Some(user);
        self.screen = AppScreen::Menu;
    }

    pub fn logout(&mut self) {
        self.reader = None;
        self.blitz.back_to_menu();
        self.dashboard = None;
        self.xp = None;
        self.user = None;
        self.session.logout();
        self.screen = AppScreen::Login;
    }

    // --- navigation ---

    pub fn go_to_menu(&mut self) {
        self.reader = None;
        self.definition = None;
        self.blitz.back_to_menu();
        self.screen = AppScreen::Menu;
    }

    pub fn go_to_week_select(&mut self) {
        self.reader = None;
        self.definition = None;
        self.screen = AppScreen::WeekSelect;
    }

    pub fn go_to_blitz(&mut self) {
        self.blitz.back_to_menu();
        self.blitz_last = None;
        self.screen = AppScreen::Blitz;
    }

    pub fn go_to_trainer(&mut self) {
        self.reset_trainer_answer();
        self.screen = AppScreen::Trainer;
    }

    pub fn go_to_mistakes(&mut self) {
        self.mistakes_selected = 0;
        self.screen = AppScreen::Mistakes;
    }

    pub fn go_to_vocabulary(&mut self) {
        self.vocab_query.clear();
        self.vocab_selected = 0;
        self.screen = AppScreen::Vocabulary;
    }

    pub fn go_to_stats(&mut self) {
        self.screen = AppScreen::Stats;
    }

    pub fn toggle_theme(&mut self) {
        let next = if self.theme.name == "light" { "dark" } else { "light" };
        let Some(theme) = Theme::load(next) else {
            return;
        };
        let theme: &'static Theme = Box::leak(Box::new(theme));
        self.theme = theme;
        self.menu.theme = theme;
        self.config.theme = next.to_string();
        if let Err(e) = self.config.save() {
            tracing::warn!(error = %e, "failed to save config");
        }
    }

    // --- weeks ---

    pub fn weeks(&self) -> &[Week] {
        self.curriculum.weeks()
    }

    pub fn week_select_next(&mut self) {
        if self.week_selected + 1 < self.weeks().len() {
            self.week_selected += 1;
        }
    }

    pub fn week_select_prev(&mut self) {
        self.week_selected = self.week_selected.saturating_sub(1);
    }

    pub fn open_selected_week(&mut self) {
        let Some(week) = self.weeks().get(self.week_selected).cloned() else {
            return;
        };
        tracing::debug!(week_id = week.id, "opening week");
        let quiz = QuizSession::new(week, self.user_id(), Rc::clone(&self.progress), Rc::clone(&self.feedback))
            .with_rewards(QuizRewards::from_config(&self.config))
            .with_exam_minutes(self.config.exam_minutes);
        self.reader = Some(WeekReader::open(
            quiz,
            self.user_id(),
            &self.highlights,
            self.config.paraphrase_min_words,
            Rc::clone(&self.copy_alert),
        ));
        self.screen = AppScreen::Week;
    }

    pub fn highlight(&mut self, color: HighlightColor) {
        if let Some(reader) = self.reader.as_mut() {
            reader.highlight(&self.highlights, color);
        }
    }

    pub fn clear_highlight(&mut self) {
        if let Some(reader) = self.reader.as_mut() {
            reader.clear(&self.highlights);
        }
    }

    pub fn switch_passage(&mut self, delta: isize) {
        let Some(reader) = self.reader.as_mut() else {
            return;
        };
        let target = reader.quiz.active_passage().saturating_add_signed(delta);
        reader.switch_passage(&self.highlights, target);
    }

    pub fn choose_option(&mut self, option: usize) {
        let (Some(reader), Some(xp)) = (self.reader.as_mut(), self.xp.as_mut()) else {
            return;
        };
        if let Some(outcome) = reader.choose(xp, option) {
            let message = if outcome.correct {
                ("Correct!", ToastKind::Success)
            } else {
                ("Incorrect. Added to Mistakes Review.", ToastKind::Warning)
            };
            self.show_toast(message.0, message.1);
        }
    }

    pub fn submit_paraphrase(&mut self) {
        let (Some(reader), Some(xp)) = (self.reader.as_mut(), self.xp.as_mut()) else {
            return;
        };
        if let Some(award) = reader.submit_answer(xp) {
            self.show_toast(&format!("Paraphrase saved. +{} XP", award.amount), ToastKind::Success);
        }
    }

    /// The interview prompts come first; confirming them completes the week.
    pub fn complete_week(&mut self) {
        let (Some(reader), Some(xp)) = (self.reader.as_mut(), self.xp.as_mut()) else {
            return;
        };
        if !reader.show_interview {
            reader.show_interview = true;
            return;
        }
        reader.show_interview = false;
        match reader.quiz.complete_week(xp) {
            Some(award) => {
                self.show_toast(&format!("Week complete! +{} XP", award.amount), ToastKind::Success);
            }
            None => self.show_toast("Week already completed", ToastKind::Info),
        }
    }

    pub fn lookup_word_at_cursor(&mut self) {
        let Some(word) = self.reader.as_ref().and_then(WeekReader::word_at_cursor) else {
            return;
        };
        let result = self.dictionary.lookup(&word);
        self.definition = Some(DefinitionPopup { word, result });
    }

    pub fn copy_attempt(&mut self) {
        tracing::debug!("copy attempt blocked");
        self.show_toast(COPY_WARNING, ToastKind::Warning);
    }

    pub fn paste_into_focus(&mut self, text: &str) {
        match self.screen {
            AppScreen::Week => {
                if let Some(reader) = self.reader.as_mut() {
                    match reader.focus() {
                        Focus::Checkpoint => reader.reject_paste(),
                        Focus::Questions => {
                            if let Some(answer) = reader.current_answer_mut() {
                                answer.paste(text);
                            }
                        }
                        Focus::Passage => {}
                    }
                }
            }
            AppScreen::Trainer => {
                self.trainer_answer.paste(text);
            }
            AppScreen::Vocabulary => {
                for ch in text.chars().filter(|c| !c.is_control()) {
                    self.vocab_query.insert(ch);
                }
                self.vocab_selected = 0;
            }
            _ => {}
        }
    }

    // --- blitz ---

    pub fn start_blitz(&mut self) {
        self.blitz_last = None;
        self.blitz.start();
    }

    pub fn blitz_answer(&mut self, index: usize) {
        if let Some(outcome) = self.blitz.answer_index(index) {
            self.feedback.play(if outcome.correct { Cue::Correct } else { Cue::Incorrect });
            self.blitz_last = Some(outcome);
        }
    }

    fn collect_blitz_reward(&mut self) {
        let Some(reward) = self.blitz.take_reward() else {
            return;
        };
        if let Some(xp) = self.xp.as_mut() {
            xp.add_xp(reward);
        }
        self.show_toast(&format!("Time's up! +{reward} XP"), ToastKind::Success);
    }

    // --- trainer ---

    pub fn trainer_scenarios(&self) -> &[TrainerScenario] {
        self.curriculum.trainer_scenarios()
    }

    pub fn trainer_scenario(&self) -> Option<&TrainerScenario> {
        self.trainer_scenarios().get(self.trainer_index)
    }

    pub fn reset_trainer_answer(&mut self) {
        self.trainer_answer = trainer_buffer(self.config.trainer_min_words, &self.copy_alert);
        self.trainer_submitted = false;
    }

    pub fn trainer_next(&mut self) {
        if self.trainer_index + 1 < self.trainer_scenarios().len() {
            self.trainer_index += 1;
            self.reset_trainer_answer();
        }
    }

    pub fn trainer_prev(&mut self) {
        if self.trainer_index > 0 {
            self.trainer_index -= 1;
            self.reset_trainer_answer();
        }
    }

    /// A valid rewrite moves straight on to the next scenario.
    pub fn trainer_submit(&mut self) {
        if self.trainer_answer.submit().is_none() {
            return;
        }
        self.feedback.play(Cue::Correct);
        if self.trainer_index + 1 < self.trainer_scenarios().len() {
            self.trainer_next();
            self.show_toast("Nice rewrite. Next challenge!", ToastKind::Success);
        } else {
            self.trainer_submitted = true;
            self.show_toast("All scenarios done!", ToastKind::Success);
        }
    }

    // --- mistakes ---

    pub fn review_items(&self) -> Vec<ReviewItem> {
        review_items(&self.curriculum, &self.progress.mistakes(self.user_id()))
    }

    pub fn mistakes_next(&mut self) {
        let count = self.progress.mistakes(self.user_id()).len();
        if self.mistakes_selected + 1 < count {
            self.mistakes_selected += 1;
        }
    }

    pub fn mistakes_prev(&mut self) {
        self.mistakes_selected = self.mistakes_selected.saturating_sub(1);
    }

    pub fn mark_mastered(&mut self) {
        let items = self.review_items();
        let Some(item) = items.get(self.mistakes_selected) else {
            return;
        };
        self.progress
            .clear_mistake(self.user_id(), item.mistake.week_id, &item.mistake.question_id);
        let remaining = items.len() - 1;
        if self.mistakes_selected >= remaining {
            self.mistakes_selected = remaining.saturating_sub(1);
        }
        self.show_toast("Marked as mastered", ToastKind::Success);
    }

    // --- vocabulary ---

    pub fn vocab_matches(&self) -> Vec<&VocabItem> {
        vocab::search(&self.vocabulary, self.vocab_query.value())
    }

    pub fn vocab_total(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vocab_type(&mut self, ch: char) {
        self.vocab_query.insert(ch);
        self.vocab_selected = 0;
    }

    pub fn vocab_backspace(&mut self) {
        self.vocab_query.backspace();
        self.vocab_selected = 0;
    }

    pub fn vocab_next(&mut self) {
        if self.vocab_selected + 1 < self.vocab_matches().len() {
            self.vocab_selected += 1;
        }
    }

    pub fn vocab_prev(&mut self) {
        self.vocab_selected = self.vocab_selected.saturating_sub(1);
    }

    /// Clears a non-empty search first; a second Esc leaves the screen.
    pub fn vocab_escape(&mut self) {
        if self.vocab_query.value().is_empty() {
            self.go_to_menu();
        } else {
            self.vocab_query.clear();
            self.vocab_selected = 0;
        }
    }

    /// Open the week the selected term comes from.
    pub fn vocab_open_source(&mut self) {
        let Some(week_id) = self.vocab_matches().get(self.vocab_selected).map(|v| v.week_id) else {
            return;
        };
        let Some(index) = self.weeks().iter().position(|w| w.id == week_id) else {
            return;
        };
        self.week_selected = index;
        self.open_selected_week();
    }

    // --- stats ---

    pub fn theme_progress(&self) -> Vec<ThemeProgress> {
        let completed = self.progress.completed_weeks(self.user_id());
        theme_progress(self.weeks(), &completed)
    }

    // --- time and notifications ---

    pub fn show_toast(&mut self, message: &str, kind: ToastKind) {
        self.toast = Some(Toast {
            message: message.to_string(),
            kind,
            expires: Instant::now() + TOAST_DURATION,
        });
    }

    /// Advance every running countdown and surface pending notifications.
    pub fn tick(&mut self, elapsed: Duration) {
        if let Some(reader) = self.reader.as_mut()
            && reader.quiz.tick(elapsed)
        {
            self.show_toast("Time is up!", ToastKind::Warning);
        }
        if self.blitz.tick(elapsed) {
            self.collect_blitz_reward();
        }

        if self.copy_alert.replace(false) {
            self.copy_attempt();
        }
        if let Some(level) = self.level_up.take() {
            self.feedback.play(Cue::LevelUp);
            self.show_toast(&format!("Level up! You reached level {level}"), ToastKind::Success);
        }
        if self.toast.as_ref().is_some_and(|t| Instant::now() >= t.expires) {
            self.toast = None;
        }
    }
}

fn trainer_buffer(min_words: usize, alert: &Rc<Cell<bool>>) -> AnswerBuffer {
    let alert = Rc::clone(alert);
    AnswerBuffer::new(min_words).on_paste(move || alert.set(true))
}
