use std::rc::Rc;

use chrono::NaiveDate;
use tempfile::TempDir;

use readcoach::clock::{Clock, FixedClock};
use readcoach::curriculum::Curriculum;
use readcoach::engine::analytics::{MasteryBand, QuestionIndex, SkillDashboard};
use readcoach::engine::xp::XpTracker;
use readcoach::progress::ProgressStore;
use readcoach::store::{JsonStore, SharedStore};

const NS: &str = "readcoach_test";

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

fn open_store(dir: &TempDir) -> SharedStore {
    Rc::new(JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap())
}

#[test]
fn progress_survives_reopening_the_store() {
    let dir = TempDir::new().unwrap();
    let clock: Rc<dyn Clock> = Rc::new(FixedClock::on(day(2)));

    {
        let progress = ProgressStore::new(open_store(&dir), NS, Rc::clone(&clock));
        assert!(progress.mark_week_complete("ada", 1));
        assert!(!progress.mark_week_complete("ada", 1));
        assert!(progress.record_mistake("ada", 1, "w1q2"));
        progress.log_attempt("ada", 1, "w1q1", true);
        progress.log_attempt("ada", 1, "w1q2", false);
    }

    let progress = ProgressStore::new(open_store(&dir), NS, clock);
    assert_eq!(progress.completed_weeks("ada"), vec![1]);
    assert_eq!(progress.mistakes("ada").len(), 1);
    assert_eq!(progress.history("ada").len(), 2);
    // Another learner sees nothing.
    assert!(progress.completed_weeks("grace").is_empty());
    assert!(progress.history("grace").is_empty());
}

#[test]
fn xp_streak_carries_across_days_and_resets_after_a_gap() {
    let dir = TempDir::new().unwrap();
    let clock = Rc::new(FixedClock::on(day(2)));
    let shared: Rc<dyn Clock> = clock.clone();

    let mut xp = XpTracker::load(open_store(&dir), NS, "ada", Rc::clone(&shared));
    let award = xp.add_xp(150).unwrap();
    assert!(award.leveled_up);
    assert_eq!(xp.level(), 2);
    assert_eq!(xp.streak(), 1);

    clock.advance_days(1);
    let mut xp = XpTracker::load(open_store(&dir), NS, "ada", Rc::clone(&shared));
    xp.add_xp(10);
    assert_eq!(xp.streak(), 2);
    assert_eq!(xp.daily_xp(), 10);
    assert_eq!(xp.xp(), 160);

    clock.advance_days(3);
    let mut xp = XpTracker::load(open_store(&dir), NS, "ada", shared);
    xp.begin_session();
    assert_eq!(xp.streak(), 1);
    assert_eq!(xp.daily_xp(), 0);
    assert_eq!(xp.xp(), 160);
}

#[test]
fn dashboard_tracks_history_written_after_it_attached() {
    let dir = TempDir::new().unwrap();
    let curriculum = Curriculum::load().unwrap();
    let week = &curriculum.weeks()[0];
    let question = week
        .questions()
        .find(|q| q.is_multiple_choice())
        .unwrap();

    let clock: Rc<dyn Clock> = Rc::new(FixedClock::on(day(2)));
    let progress = Rc::new(ProgressStore::new(open_store(&dir), NS, clock));
    let index = Rc::new(QuestionIndex::from_weeks(curriculum.weeks()));
    let mut dashboard = SkillDashboard::attach(Rc::clone(&progress), index, "ada");
    assert!(dashboard.stats().is_empty());

    progress.log_attempt("ada", week.id, &question.id, true);
    progress.log_attempt("ada", week.id, &question.id, false);
    assert!(dashboard.is_stale());

    let stats = dashboard.stats()[&question.kind];
    assert_eq!(stats.total_attempts, 2);
    assert_eq!(stats.correct_count, 1);
    assert_eq!(stats.accuracy, 50);
    assert_eq!(stats.band(), MasteryBand::NeedsWork);
}
