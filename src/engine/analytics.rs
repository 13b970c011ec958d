use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::curriculum::{Theme, Week};
use crate::progress::{Attempt, ProgressStore, SubscriptionId, Topic};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Detail,
    Inference,
    Vocab,
    Paraphrase,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 4] = [
        SkillCategory::Detail,
        SkillCategory::Inference,
        SkillCategory::Vocab,
        SkillCategory::Paraphrase,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SkillCategory::Detail => "Detail Retention",
            SkillCategory::Inference => "Inference & Logic",
            SkillCategory::Vocab => "Vocab Context",
            SkillCategory::Paraphrase => "Paraphrasing",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Question id to skill category, built once from curriculum content.
#[derive(Clone, Debug, Default)]
pub struct QuestionIndex {
    categories: HashMap<String, SkillCategory>,
}

impl QuestionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_weeks(weeks: &[Week]) -> Self {
        let mut index = Self::new();
        for week in weeks {
            for question in week.passages.iter().flat_map(|p| p.questions.iter()) {
                index.insert(&question.id, question.kind);
            }
        }
        index
    }

    pub fn insert(&mut self, question_id: &str, category: SkillCategory) {
        self.categories.insert(question_id.to_string(), category);
    }

    pub fn category(&self, question_id: &str) -> Option<SkillCategory> {
        self.categories.get(question_id).copied()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkillStats {
    pub total_attempts: u32,
    pub correct_count: u32,
    /// Whole percent, rounded half up.
    pub accuracy: u32,
}

impl SkillStats {
    pub fn band(&self) -> MasteryBand {
        MasteryBand::from_accuracy(self.accuracy)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MasteryBand {
    Strong,
    Developing,
    NeedsWork,
}

impl MasteryBand {
    pub fn from_accuracy(accuracy: u32) -> Self {
        if accuracy >= 80 {
            MasteryBand::Strong
        } else if accuracy >= 60 {
            MasteryBand::Developing
        } else {
            MasteryBand::NeedsWork
        }
    }
}

fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    let (part, whole) = (part as u64, whole as u64);
    ((200 * part + whole) / (2 * whole)) as u32
}

/// Every attempt counts, repeats included. Attempts on unknown question ids
/// are skipped and categories nobody attempted are absent.
pub fn skill_stats(index: &QuestionIndex, history: &[Attempt]) -> BTreeMap<SkillCategory, SkillStats> {
    let mut tallies: BTreeMap<SkillCategory, (u32, u32)> = BTreeMap::new();
    for attempt in history {
        let Some(category) = index.category(&attempt.question_id) else {
            continue;
        };
        let tally = tallies.entry(category).or_default();
        tally.0 += 1;
        if attempt.is_correct {
            tally.1 += 1;
        }
    }

    tallies
        .into_iter()
        .map(|(category, (total, correct))| {
            (
                category,
                SkillStats {
                    total_attempts: total,
                    correct_count: correct,
                    accuracy: percent(correct, total),
                },
            )
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThemeProgress {
    pub theme: Theme,
    pub completed: u32,
    pub total: u32,
}

impl ThemeProgress {
    pub fn percent(&self) -> u32 {
        percent(self.completed, self.total)
    }
}

/// Completion per curriculum theme, always in `Theme::ALL` order.
pub fn theme_progress(weeks: &[Week], completed: &[u32]) -> Vec<ThemeProgress> {
    Theme::ALL
        .iter()
        .map(|&theme| {
            let in_theme = weeks.iter().filter(|w| w.theme == theme);
            let total = in_theme.clone().count() as u32;
            let done = in_theme.filter(|w| completed.contains(&w.id)).count() as u32;
            ThemeProgress {
                theme,
                completed: done,
                total,
            }
        })
        .collect()
}

/// Skill stats for one user, recomputed in full whenever that user's
/// attempt history changes.
pub struct SkillDashboard {
    progress: Rc<ProgressStore>,
    index: Rc<QuestionIndex>,
    user_id: String,
    stale: Rc<Cell<bool>>,
    subscription: SubscriptionId,
    stats: BTreeMap<SkillCategory, SkillStats>,
}

impl SkillDashboard {
    pub fn attach(progress: Rc<ProgressStore>, index: Rc<QuestionIndex>, user_id: &str) -> Self {
        let stale = Rc::new(Cell::new(true));
        let stale_in = Rc::clone(&stale);
        let owner = user_id.to_string();
        let subscription = progress.events().subscribe(move |event| {
            if event.topic() == Topic::History && event.user_id() == owner {
                stale_in.set(true);
            }
        });
        Self {
            progress,
            index,
            user_id: user_id.to_string(),
            stale,
            subscription,
            stats: BTreeMap::new(),
        }
    }

    pub fn is_stale(&self) -> bool {
        self.stale.get()
    }

    pub fn stats(&mut self) -> &BTreeMap<SkillCategory, SkillStats> {
        if self.stale.replace(false) {
            let history = self.progress.history(&self.user_id);
            self.stats = skill_stats(&self.index, &history);
        }
        &self.stats
    }
}

impl Drop for SkillDashboard {
    fn drop(&mut self) {
        self.progress.events().unsubscribe(self.subscription);
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::clock::FixedClock;
    use crate::curriculum::{Passage, Question};
    use crate::store::kv::MemoryStore;

    fn attempt(id: &str, ok: bool) -> Attempt {
        Attempt {
            week_id: 1,
            question_id: id.to_string(),
            is_correct: ok,
            timestamp: 0,
        }
    }

    fn index() -> QuestionIndex {
        let mut index = QuestionIndex::new();
        index.insert("d1", SkillCategory::Detail);
        index.insert("i1", SkillCategory::Inference);
        index.insert("v1", SkillCategory::Vocab);
        index
    }

    #[test]
    fn seven_of_ten_detail_attempts_is_seventy_percent() {
        let history: Vec<Attempt> = (0..10).map(|i| attempt("d1", i < 7)).collect();
        let stats = skill_stats(&index(), &history);
        let detail = stats[&SkillCategory::Detail];
        assert_eq!(detail.total_attempts, 10);
        assert_eq!(detail.correct_count, 7);
        assert_eq!(detail.accuracy, 70);
        assert_eq!(detail.band(), MasteryBand::Developing);
    }

    #[test]
    fn unattempted_categories_are_omitted() {
        let stats = skill_stats(&index(), &[attempt("i1", true)]);
        assert_eq!(stats.len(), 1);
        assert!(!stats.contains_key(&SkillCategory::Detail));
        assert!(!stats.contains_key(&SkillCategory::Paraphrase));
    }

    #[test]
    fn unknown_question_ids_are_skipped() {
        let stats = skill_stats(&index(), &[attempt("ghost", true), attempt("v1", false)]);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[&SkillCategory::Vocab].accuracy, 0);
    }

    #[test]
    fn accuracy_rounds_half_up() {
        let history = vec![attempt("d1", true), attempt("d1", true), attempt("d1", false)];
        assert_eq!(skill_stats(&index(), &history)[&SkillCategory::Detail].accuracy, 67);

        let history: Vec<Attempt> = (0..8).map(|i| attempt("d1", i < 1)).collect();
        // 12.5 rounds to 13
        assert_eq!(skill_stats(&index(), &history)[&SkillCategory::Detail].accuracy, 13);
    }

    #[test]
    fn mastery_bands() {
        assert_eq!(MasteryBand::from_accuracy(80), MasteryBand::Strong);
        assert_eq!(MasteryBand::from_accuracy(79), MasteryBand::Developing);
        assert_eq!(MasteryBand::from_accuracy(60), MasteryBand::Developing);
        assert_eq!(MasteryBand::from_accuracy(59), MasteryBand::NeedsWork);
    }

    fn week(id: u32, theme: Theme, question_id: &str, kind: SkillCategory) -> Week {
        Week {
            id,
            title: format!("Week {id}"),
            theme,
            passages: vec![Passage {
                title: "P".to_string(),
                content_html: "<p>Text.</p>".to_string(),
                questions: vec![Question {
                    id: question_id.to_string(),
                    kind,
                    text: "Q?".to_string(),
                    options: vec!["a".to_string(), "b".to_string()],
                    correct_answer: "a".to_string(),
                }],
                main_idea_hint: None,
            }],
            vocabulary: Vec::new(),
        }
    }

    #[test]
    fn question_index_covers_every_passage() {
        let weeks = vec![
            week(1, Theme::Ethics, "w1-q1", SkillCategory::Inference),
            week(2, Theme::Media, "w2-q1", SkillCategory::Paraphrase),
        ];
        let index = QuestionIndex::from_weeks(&weeks);
        assert_eq!(index.len(), 2);
        assert_eq!(index.category("w2-q1"), Some(SkillCategory::Paraphrase));
    }

    #[test]
    fn theme_progress_counts_per_theme() {
        let weeks = vec![
            week(1, Theme::Ethics, "a", SkillCategory::Detail),
            week(2, Theme::Global, "b", SkillCategory::Detail),
            week(5, Theme::Ethics, "c", SkillCategory::Detail),
        ];
        let progress = theme_progress(&weeks, &[1, 2]);
        assert_eq!(progress.len(), 4);
        assert_eq!(progress[0].theme, Theme::Ethics);
        assert_eq!((progress[0].completed, progress[0].total), (1, 2));
        assert_eq!(progress[0].percent(), 50);
        let media = progress.iter().find(|p| p.theme == Theme::Media).unwrap();
        assert_eq!(media.total, 0);
        assert_eq!(media.percent(), 0);
    }

    #[test]
    fn dashboard_recomputes_after_history_event() {
        let kv = Rc::new(MemoryStore::new());
        let clock = Rc::new(FixedClock::on(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
        let progress = Rc::new(ProgressStore::new(kv, "mita", clock));
        let mut dashboard = SkillDashboard::attach(progress.clone(), Rc::new(index()), "aio");

        assert!(dashboard.stats().is_empty());
        assert!(!dashboard.is_stale());

        progress.log_attempt("jalil", 1, "d1", true);
        assert!(!dashboard.is_stale());

        progress.log_attempt("aio", 1, "d1", true);
        assert!(dashboard.is_stale());
        assert_eq!(dashboard.stats()[&SkillCategory::Detail].accuracy, 100);

        drop(dashboard);
        assert_eq!(progress.events().listener_count(), 0);
    }
}
