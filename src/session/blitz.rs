use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::curriculum::VocabItem;
use crate::curriculum::vocab::distractors;
use crate::session::countdown::{Countdown, Tick};

pub const DEFAULT_DURATION: Duration = Duration::from_secs(60);
pub const DISTRACTORS: usize = 3;
const BASE_POINTS: u64 = 100;
const STREAK_BONUS: u64 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlitzPhase {
    Menu,
    Playing,
    Finished,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlitzQuestion {
    pub word: String,
    pub correct: String,
    pub options: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub points: u64,
}

/// Points for a correct answer given the streak before it.
pub fn points_for(streak: u32) -> u64 {
    BASE_POINTS + streak as u64 * STREAK_BONUS
}

/// Timed vocabulary quiz: `Menu -> Playing -> Finished -> Menu`.
pub struct BlitzGame<R: Rng> {
    pool: Vec<VocabItem>,
    rng: R,
    duration: Duration,
    phase: BlitzPhase,
    score: u64,
    streak: u32,
    answered: u32,
    question: Option<BlitzQuestion>,
    countdown: Countdown,
    reward: Option<u64>,
}

impl<R: Rng> BlitzGame<R> {
    pub fn new(pool: Vec<VocabItem>, rng: R) -> Self {
        Self {
            pool,
            rng,
            duration: DEFAULT_DURATION,
            phase: BlitzPhase::Menu,
            score: 0,
            streak: 0,
            answered: 0,
            question: None,
            countdown: Countdown::stopped(),
            reward: None,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn phase(&self) -> BlitzPhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn answered(&self) -> u32 {
        self.answered
    }

    pub fn question(&self) -> Option<&BlitzQuestion> {
        self.question.as_ref()
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn time_left(&self) -> u64 {
        self.countdown.remaining_secs()
    }

    /// Reset score and streak and start the clock. Allowed from the menu and
    /// from the results screen.
    pub fn start(&mut self) {
        if self.phase == BlitzPhase::Playing {
            return;
        }
        self.score = 0;
        self.streak = 0;
        self.answered = 0;
        self.reward = None;
        self.countdown = Countdown::start(self.duration);
        self.phase = BlitzPhase::Playing;
        self.next_question();
        tracing::debug!(pool = self.pool.len(), "blitz started");
    }

    /// Returns true when this tick ended the game.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if self.phase != BlitzPhase::Playing {
            return false;
        }
        match self.countdown.advance(elapsed) {
            Tick::Expired => {
                self.finish();
                true
            }
            Tick::Running(_) | Tick::Idle => false,
        }
    }

    /// Score the answer and immediately draw the next question.
    pub fn answer(&mut self, option: &str) -> Option<AnswerOutcome> {
        if self.phase != BlitzPhase::Playing {
            return None;
        }
        let question = self.question.as_ref()?;
        let outcome = if option == question.correct {
            let points = points_for(self.streak);
            self.score += points;
            self.streak += 1;
            AnswerOutcome { correct: true, points }
        } else {
            self.streak = 0;
            AnswerOutcome {
                correct: false,
                points: 0,
            }
        };
        self.answered += 1;
        self.next_question();
        Some(outcome)
    }

    pub fn answer_index(&mut self, index: usize) -> Option<AnswerOutcome> {
        let option = self.question.as_ref()?.options.get(index)?.clone();
        self.answer(&option)
    }

    pub fn back_to_menu(&mut self) {
        self.countdown.cancel();
        self.question = None;
        self.phase = BlitzPhase::Menu;
    }

    /// XP earned by the finished game: half the score, handed out once.
    pub fn take_reward(&mut self) -> Option<u64> {
        self.reward.take()
    }

    fn finish(&mut self) {
        self.countdown.cancel();
        self.question = None;
        self.phase = BlitzPhase::Finished;
        self.reward = Some(self.score / 2);
        tracing::info!(score = self.score, answered = self.answered, "blitz finished");
    }

    fn next_question(&mut self) {
        let Some(item) = self.pool.choose(&mut self.rng) else {
            self.question = None;
            return;
        };
        let word = item.word.clone();
        let correct = item.definition.clone();
        let mut options = distractors(&correct, &self.pool, DISTRACTORS, &mut self.rng);
        options.push(correct.clone());
        options.shuffle(&mut self.rng);
        self.question = Some(BlitzQuestion {
            word,
            correct,
            options,
        });
    }
}

impl<R: Rng> Drop for BlitzGame<R> {
    fn drop(&mut self) {
        self.countdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::curriculum::vocab::curated_vocabulary;

    fn game() -> BlitzGame<SmallRng> {
        BlitzGame::new(curated_vocabulary(), SmallRng::seed_from_u64(42))
    }

    fn wrong_option(q: &BlitzQuestion) -> String {
        q.options.iter().find(|o| **o != q.correct).cloned().unwrap()
    }

    #[test]
    fn questions_have_four_distinct_options() {
        let mut g = game();
        g.start();
        let q = g.question().unwrap().clone();
        assert_eq!(q.options.len(), 4);
        assert!(q.options.contains(&q.correct));
        let mut unique = q.options.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn streak_bonus_scoring() {
        let mut g = game();
        g.start();

        let correct = g.question().unwrap().correct.clone();
        assert_eq!(g.answer(&correct), Some(AnswerOutcome { correct: true, points: 100 }));
        assert_eq!(g.streak(), 1);

        let correct = g.question().unwrap().correct.clone();
        assert_eq!(g.answer(&correct), Some(AnswerOutcome { correct: true, points: 110 }));
        assert_eq!(g.streak(), 2);

        let wrong = wrong_option(g.question().unwrap());
        assert_eq!(g.answer(&wrong), Some(AnswerOutcome { correct: false, points: 0 }));
        assert_eq!(g.streak(), 0);
        assert_eq!(g.score(), 210);
        assert!(g.question().is_some());
    }

    #[test]
    fn timeout_finishes_and_rewards_once() {
        let mut g = game();
        g.start();
        let correct = g.question().unwrap().correct.clone();
        g.answer(&correct);
        let correct = g.question().unwrap().correct.clone();
        g.answer(&correct);
        let correct = g.question().unwrap().correct.clone();
        g.answer(&correct);
        assert_eq!(g.score(), 330);

        assert!(!g.tick(Duration::from_secs(59)));
        assert_eq!(g.time_left(), 1);
        assert!(g.tick(Duration::from_secs(1)));
        assert_eq!(g.phase(), BlitzPhase::Finished);
        assert!(!g.countdown().is_running());
        assert_eq!(g.take_reward(), Some(165));
        assert_eq!(g.take_reward(), None);
        assert!(!g.tick(Duration::from_secs(1)));
        assert_eq!(g.answer("anything"), None);
    }

    #[test]
    fn replay_resets_state() {
        let mut g = game().with_duration(Duration::from_secs(5));
        g.start();
        let correct = g.question().unwrap().correct.clone();
        g.answer(&correct);
        g.tick(Duration::from_secs(5));
        g.start();
        assert_eq!(g.phase(), BlitzPhase::Playing);
        assert_eq!(g.score(), 0);
        assert_eq!(g.time_left(), 5);
        assert_eq!(g.take_reward(), None);
    }

    #[test]
    fn back_to_menu_cancels_clock() {
        let mut g = game();
        g.start();
        g.back_to_menu();
        assert_eq!(g.phase(), BlitzPhase::Menu);
        assert!(!g.countdown().is_running());
        assert!(!g.tick(Duration::from_secs(120)));
        assert_eq!(g.take_reward(), None);
    }

    #[test]
    fn empty_pool_plays_without_questions() {
        let mut g = BlitzGame::new(Vec::new(), SmallRng::seed_from_u64(1));
        g.start();
        assert_eq!(g.phase(), BlitzPhase::Playing);
        assert!(g.question().is_none());
        assert_eq!(g.answer("x"), None);
        assert!(g.tick(Duration::from_secs(60)));
        assert_eq!(g.take_reward(), Some(0));
    }

    #[test]
    fn points_grow_with_streak() {
        assert_eq!(points_for(0), 100);
        assert_eq!(points_for(1), 110);
        assert_eq!(points_for(5), 150);
    }
}
