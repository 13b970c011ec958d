use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::time::Duration;

use crate::config::Config;
use crate::curriculum::{Passage, PhaseConfig, Week, exam_config, phase_for_week};
use crate::engine::xp::{XpAward, XpTracker};
use crate::feedback::{Cue, Feedback};
use crate::progress::ProgressStore;
use crate::session::countdown::{Countdown, Tick};

/// XP handed out by the week reader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuizRewards {
    pub correct_answer: u64,
    pub paraphrase: u64,
    pub week_complete: u64,
}

impl QuizRewards {
    pub fn from_config(config: &Config) -> Self {
        Self {
            correct_answer: config.xp_correct_answer,
            paraphrase: config.xp_paraphrase,
            week_complete: config.xp_week_complete,
        }
    }
}

impl Default for QuizRewards {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuestionOutcome {
    pub correct: bool,
    pub award: Option<XpAward>,
}

/// One learner working through one week: answers, rewards and the timer.
pub struct QuizSession {
    week: Week,
    user_id: String,
    progress: Rc<ProgressStore>,
    feedback: Rc<dyn Feedback>,
    rewards: QuizRewards,
    exam_minutes: u64,
    active_passage: usize,
    selected: HashMap<String, String>,
    paraphrased: HashSet<String>,
    exam_mode: bool,
    countdown: Countdown,
    time_up: bool,
}

impl QuizSession {
    pub fn new(week: Week, user_id: &str, progress: Rc<ProgressStore>, feedback: Rc<dyn Feedback>) -> Self {
        let countdown = phase_for_week(week.id)
            .timer
            .map(Countdown::start)
            .unwrap_or_else(Countdown::stopped);
        Self {
            week,
            user_id: user_id.to_string(),
            progress,
            feedback,
            rewards: QuizRewards::default(),
            exam_minutes: Config::default().exam_minutes,
            active_passage: 0,
            selected: HashMap::new(),
            paraphrased: HashSet::new(),
            exam_mode: false,
            countdown,
            time_up: false,
        }
    }

    pub fn with_rewards(mut self, rewards: QuizRewards) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn with_exam_minutes(mut self, minutes: u64) -> Self {
        self.exam_minutes = minutes;
        self
    }

    pub fn week(&self) -> &Week {
        &self.week
    }

    pub fn phase(&self) -> PhaseConfig {
        if self.exam_mode {
            exam_config(self.exam_minutes)
        } else {
            phase_for_week(self.week.id)
        }
    }

    pub fn active_passage(&self) -> usize {
        self.active_passage
    }

    pub fn passage(&self) -> Option<&Passage> {
        self.week.passages.get(self.active_passage)
    }

    pub fn set_active_passage(&mut self, index: usize) -> bool {
        if index >= self.week.passages.len() {
            return false;
        }
        self.active_passage = index;
        true
    }

    pub fn selected(&self, question_id: &str) -> Option<&str> {
        self.selected.get(question_id).map(String::as_str)
    }

    pub fn is_checked(&self, question_id: &str) -> bool {
        self.selected.contains_key(question_id)
    }

    pub fn is_paraphrased(&self, question_id: &str) -> bool {
        self.paraphrased.contains(question_id)
    }

    /// Correct and answered multiple-choice counts for the whole week.
    pub fn score(&self) -> (usize, usize) {
        let correct = self
            .week
            .questions()
            .filter(|q| self.selected(&q.id).is_some_and(|s| q.is_correct(s)))
            .count();
        (correct, self.selected.len())
    }

    /// First selection for a question sticks; later ones are ignored.
    pub fn select_option(&mut self, xp: &mut XpTracker, question_id: &str, option: &str) -> Option<QuestionOutcome> {
        if self.is_checked(question_id) {
            return None;
        }
        let question = self.week.question(question_id)?;
        if !question.is_multiple_choice() {
            return None;
        }
        let correct = question.is_correct(option);
        self.selected.insert(question_id.to_string(), option.to_string());

        let week_id = self.week.id;
        self.progress.log_attempt(&self.user_id, week_id, question_id, correct);
        let award = if correct {
            self.progress.clear_mistake(&self.user_id, week_id, question_id);
            self.feedback.play(Cue::Correct);
            xp.add_xp(self.rewards.correct_answer)
        } else {
            self.progress.record_mistake(&self.user_id, week_id, question_id);
            self.feedback.play(Cue::Incorrect);
            None
        };
        Some(QuestionOutcome { correct, award })
    }

    /// Rewards a validated paraphrase once per question. Free-text answers are
    /// not graded, so nothing goes into the attempt history.
    pub fn submit_paraphrase(&mut self, xp: &mut XpTracker, question_id: &str) -> Option<XpAward> {
        let question = self.week.question(question_id)?;
        if question.is_multiple_choice() || !self.paraphrased.insert(question_id.to_string()) {
            return None;
        }
        self.feedback.play(Cue::Correct);
        xp.add_xp(self.rewards.paraphrase)
    }

    pub fn is_complete(&self) -> bool {
        self.progress.is_week_complete(&self.user_id, self.week.id)
    }

    /// Marks the week done. The bonus is paid only the first time.
    pub fn complete_week(&mut self, xp: &mut XpTracker) -> Option<XpAward> {
        if !self.progress.mark_week_complete(&self.user_id, self.week.id) {
            return None;
        }
        self.feedback.play(Cue::LevelUp);
        xp.add_xp(self.rewards.week_complete)
    }

    pub fn is_exam_mode(&self) -> bool {
        self.exam_mode
    }

    /// Exam mode restarts the clock at the exam length; leaving it falls back
    /// to the week's own timer, if any.
    pub fn toggle_exam_mode(&mut self) {
        self.exam_mode = !self.exam_mode;
        self.countdown.cancel();
        self.time_up = false;
        self.countdown = self
            .phase()
            .timer
            .map(Countdown::start)
            .unwrap_or_else(Countdown::stopped);
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn has_timer(&self) -> bool {
        self.countdown.is_running() || self.time_up
    }

    pub fn is_time_up(&self) -> bool {
        self.time_up
    }

    /// Returns true on the tick that runs the timer out.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if self.countdown.advance(elapsed) == Tick::Expired {
            self.time_up = true;
            tracing::info!(week_id = self.week.id, exam = self.exam_mode, "time is up");
            return true;
        }
        false
    }
}

impl Drop for QuizSession {
    fn drop(&mut self) {
        self.countdown.cancel();
    }
}
