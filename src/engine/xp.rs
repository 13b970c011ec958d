use std::rc::Rc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::engine::scoring::{self, DAILY_GOAL_XP};
use crate::store::keys::{RecordKind, user_key};
use crate::store::kv::{KeyValueStore, SharedStore, read_u64};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XpState {
    pub xp: u64,
    pub daily_xp: u64,
    pub streak: u32,
    pub last_active: Option<NaiveDate>,
}

impl XpState {
    pub fn level(&self) -> u32 {
        scoring::level_from_xp(self.xp)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivityDay {
    NoActivityToday,
    ActiveToday,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DayTransition {
    SameDay,
    ContinuedStreak,
    StreakReset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct XpAward {
    pub amount: u64,
    pub previous_level: u32,
    pub level: u32,
    pub leveled_up: bool,
}

/// Pure streak rule: compare the last active day against today.
pub fn next_streak(state: &XpState, today: NaiveDate) -> (XpState, DayTransition) {
    let mut next = state.clone();
    match state.last_active {
        Some(last) if last == today => {
            next.streak = state.streak.max(1);
            (next, DayTransition::SameDay)
        }
        Some(last) if today.pred_opt() == Some(last) => {
            next.streak = state.streak.saturating_add(1);
            next.daily_xp = 0;
            next.last_active = Some(today);
            (next, DayTransition::ContinuedStreak)
        }
        _ => {
            next.streak = 1;
            next.daily_xp = 0;
            next.last_active = Some(today);
            (next, DayTransition::StreakReset)
        }
    }
}

/// Cumulative XP, daily XP and day streak for one user.
pub struct XpTracker {
    store: SharedStore,
    namespace: String,
    user_id: String,
    clock: Rc<dyn Clock>,
    state: XpState,
    daily_goal: u64,
    on_level_up: Option<Box<dyn FnMut(u32)>>,
}

impl XpTracker {
    /// Load persisted values as-is. The calendar-day transition happens on
    /// `begin_session` or on the first award, whichever comes first.
    pub fn load(store: SharedStore, namespace: &str, user_id: &str, clock: Rc<dyn Clock>) -> Self {
        let state = if user_id.is_empty() {
            XpState::default()
        } else {
            read_state(store.as_ref(), namespace, user_id)
        };
        Self {
            store,
            namespace: namespace.to_string(),
            user_id: user_id.to_string(),
            clock,
            state,
            daily_goal: DAILY_GOAL_XP,
            on_level_up: None,
        }
    }

    pub fn with_daily_goal(mut self, goal: u64) -> Self {
        self.daily_goal = goal;
        self
    }

    pub fn set_level_up_hook(&mut self, hook: impl FnMut(u32) + 'static) {
        self.on_level_up = Some(Box::new(hook));
    }

    pub fn state(&self) -> &XpState {
        &self.state
    }

    pub fn xp(&self) -> u64 {
        self.state.xp
    }

    pub fn daily_xp(&self) -> u64 {
        self.state.daily_xp
    }

    pub fn streak(&self) -> u32 {
        self.state.streak
    }

    pub fn level(&self) -> u32 {
        self.state.level()
    }

    pub fn daily_goal(&self) -> u64 {
        self.daily_goal
    }

    pub fn daily_progress(&self) -> f64 {
        scoring::daily_progress(self.state.daily_xp, self.daily_goal)
    }

    pub fn activity(&self) -> ActivityDay {
        if self.state.last_active == Some(self.clock.today()) {
            ActivityDay::ActiveToday
        } else {
            ActivityDay::NoActivityToday
        }
    }

    /// Apply the day transition for session start.
    pub fn begin_session(&mut self) -> Option<DayTransition> {
        self.ensure_today()
    }

    fn ensure_today(&mut self) -> Option<DayTransition> {
        if self.user_id.is_empty() {
            return None;
        }
        let today = self.clock.today();
        let (next, transition) = next_streak(&self.state, today);
        let changed = next != self.state;
        self.state = next;
        if transition != DayTransition::SameDay {
            tracing::info!(
                user_id = %self.user_id,
                streak = self.state.streak,
                ?transition,
                "new activity day"
            );
        }
        if changed {
            self.persist();
        }
        Some(transition)
    }

    pub fn add_xp(&mut self, amount: u64) -> Option<XpAward> {
        if self.user_id.is_empty() {
            return None;
        }
        self.ensure_today();

        let previous_level = self.state.level();
        self.state.xp = self.state.xp.saturating_add(amount);
        self.state.daily_xp = self.state.daily_xp.saturating_add(amount);
        let level = self.state.level();
        self.persist();

        let leveled_up = level > previous_level;
        if leveled_up {
            tracing::info!(user_id = %self.user_id, level, "level up");
            if let Some(hook) = self.on_level_up.as_mut() {
                hook(level);
            }
        }
        Some(XpAward {
            amount,
            previous_level,
            level,
            leveled_up,
        })
    }

    /// Overwrite the whole state, e.g. after an import.
    pub fn replace_state(&mut self, state: XpState) {
        self.state = state;
        self.persist();
    }

    fn persist(&self) {
        for (key, value) in state_entries(&self.namespace, &self.user_id, &self.state) {
            if let Err(e) = self.store.set(&key, &value) {
                tracing::warn!(key, error = %e, "failed to persist xp state");
            }
        }
    }
}

/// Stored XP values for one user. Unparsable or out-of-range entries read
/// as zero / never.
pub fn read_state(store: &dyn KeyValueStore, namespace: &str, user_id: &str) -> XpState {
    let key = |kind| user_key(namespace, kind, user_id);
    XpState {
        xp: read_u64(store, &key(RecordKind::Xp)),
        daily_xp: read_u64(store, &key(RecordKind::DailyXp)),
        streak: u32::try_from(read_u64(store, &key(RecordKind::Streak))).unwrap_or(0),
        last_active: store
            .get(&key(RecordKind::LastActive))
            .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()),
    }
}

/// Key/value pairs that persist `state`, integers as decimal strings and the
/// last active day as `YYYY-MM-DD`.
pub fn state_entries(namespace: &str, user_id: &str, state: &XpState) -> Vec<(String, String)> {
    let key = |kind| user_key(namespace, kind, user_id);
    let mut entries = vec![
        (key(RecordKind::Xp), state.xp.to_string()),
        (key(RecordKind::DailyXp), state.daily_xp.to_string()),
        (key(RecordKind::Streak), state.streak.to_string()),
    ];
    if let Some(day) = state.last_active {
        entries.push((key(RecordKind::LastActive), day.format(DATE_FORMAT).to_string()));
    }
    entries
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::clock::FixedClock;
    use crate::store::kv::{KeyValueStore, MemoryStore};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn state(streak: u32, daily_xp: u64, last_active: Option<NaiveDate>) -> XpState {
        XpState {
            xp: 500,
            daily_xp,
            streak,
            last_active,
        }
    }

    #[test]
    fn streak_continues_from_yesterday() {
        let today = day(2025, 1, 1);
        let (next, t) = next_streak(&state(4, 70, Some(day(2024, 12, 31))), today);
        assert_eq!(t, DayTransition::ContinuedStreak);
        assert_eq!(next.streak, 5);
        assert_eq!(next.daily_xp, 0);
        assert_eq!(next.last_active, Some(today));
        assert_eq!(next.xp, 500);
    }

    #[test]
    fn streak_unchanged_on_same_day() {
        let today = day(2025, 1, 1);
        let (next, t) = next_streak(&state(4, 70, Some(today)), today);
        assert_eq!(t, DayTransition::SameDay);
        assert_eq!(next.streak, 4);
        assert_eq!(next.daily_xp, 70);
    }

    #[test]
    fn streak_resets_after_gap_or_first_time() {
        let today = day(2025, 1, 10);
        let (gap, t) = next_streak(&state(9, 30, Some(day(2025, 1, 7))), today);
        assert_eq!(t, DayTransition::StreakReset);
        assert_eq!(gap.streak, 1);
        assert_eq!(gap.daily_xp, 0);

        let (fresh, _) = next_streak(&state(0, 0, None), today);
        assert_eq!(fresh.streak, 1);
    }

    #[test]
    fn same_day_with_zero_streak_is_at_least_one() {
        let today = day(2025, 1, 1);
        let (next, _) = next_streak(&state(0, 10, Some(today)), today);
        assert_eq!(next.streak, 1);
    }

    fn tracker_on(today: NaiveDate) -> (Rc<MemoryStore>, Rc<FixedClock>, XpTracker) {
        let kv = Rc::new(MemoryStore::new());
        let clock = Rc::new(FixedClock::on(today));
        let tracker = XpTracker::load(kv.clone(), "mita", "aio", clock.clone());
        (kv, clock, tracker)
    }

    #[test]
    fn add_xp_accumulates_and_persists() {
        let (kv, _clock, mut tracker) = tracker_on(day(2025, 5, 5));
        tracker.add_xp(15);
        tracker.add_xp(30);
        assert_eq!(tracker.xp(), 45);
        assert_eq!(tracker.daily_xp(), 45);
        assert_eq!(tracker.streak(), 1);
        assert_eq!(kv.get("mita_xp_aio").as_deref(), Some("45"));
        assert_eq!(kv.get("mita_daily_xp_aio").as_deref(), Some("45"));
        assert_eq!(kv.get("mita_last_active_aio").as_deref(), Some("2025-05-05"));
    }

    #[test]
    fn level_up_hook_fires_only_when_crossing_threshold() {
        let (_kv, _clock, mut tracker) = tracker_on(day(2025, 5, 5));
        let fired = Rc::new(Cell::new(0u32));
        let fired_in = Rc::clone(&fired);
        tracker.set_level_up_hook(move |level| fired_in.set(level));

        let award = tracker.add_xp(99).unwrap();
        assert!(!award.leveled_up);
        assert_eq!(fired.get(), 0);

        let award = tracker.add_xp(1).unwrap();
        assert!(award.leveled_up);
        assert_eq!(award.previous_level, 1);
        assert_eq!(award.level, 2);
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn daily_xp_resets_on_next_day_but_total_keeps() {
        let (_kv, clock, mut tracker) = tracker_on(day(2025, 5, 5));
        tracker.add_xp(80);
        clock.advance_days(1);
        tracker.add_xp(10);
        assert_eq!(tracker.xp(), 90);
        assert_eq!(tracker.daily_xp(), 10);
        assert_eq!(tracker.streak(), 2);
    }

    #[test]
    fn reload_after_two_day_gap_resets_streak_on_session_start() {
        let (kv, clock, mut tracker) = tracker_on(day(2025, 5, 5));
        tracker.add_xp(20);
        clock.advance_days(1);
        tracker.add_xp(20);
        assert_eq!(tracker.streak(), 2);

        clock.advance_days(3);
        let mut reloaded = XpTracker::load(kv.clone(), "mita", "aio", clock.clone());
        assert_eq!(reloaded.streak(), 2);
        assert_eq!(reloaded.activity(), ActivityDay::NoActivityToday);
        assert_eq!(reloaded.begin_session(), Some(DayTransition::StreakReset));
        assert_eq!(reloaded.streak(), 1);
        assert_eq!(reloaded.daily_xp(), 0);
        assert_eq!(reloaded.xp(), 40);
        assert_eq!(reloaded.activity(), ActivityDay::ActiveToday);
        assert_eq!(kv.get("mita_streak_aio").as_deref(), Some("1"));
    }

    #[test]
    fn blank_user_earns_nothing() {
        let kv = Rc::new(MemoryStore::new());
        let clock = Rc::new(FixedClock::on(day(2025, 5, 5)));
        let mut tracker = XpTracker::load(kv.clone(), "mita", "", clock);
        assert!(tracker.add_xp(100).is_none());
        assert_eq!(tracker.xp(), 0);
        assert!(kv.is_empty());
    }

    #[test]
    fn corrupt_persisted_values_load_as_zero() {
        let kv = Rc::new(MemoryStore::new());
        kv.set("mita_xp_aio", "lots").unwrap();
        kv.set("mita_last_active_aio", "yesterday-ish").unwrap();
        let clock = Rc::new(FixedClock::on(day(2025, 5, 5)));
        let tracker = XpTracker::load(kv, "mita", "aio", clock);
        assert_eq!(tracker.xp(), 0);
        assert_eq!(tracker.state().last_active, None);
    }

    #[test]
    fn stored_streak_at_the_ceiling_stays_there() {
        let kv = Rc::new(MemoryStore::new());
        kv.set("mita_streak_aio", "4294967295").unwrap();
        kv.set("mita_last_active_aio", "2024-12-31").unwrap();
        let clock = Rc::new(FixedClock::on(day(2025, 1, 1)));
        let mut tracker = XpTracker::load(kv.clone(), "mita", "aio", clock);
        assert_eq!(tracker.begin_session(), Some(DayTransition::ContinuedStreak));
        assert_eq!(tracker.streak(), u32::MAX);
        assert_eq!(kv.get("mita_streak_aio").as_deref(), Some("4294967295"));
    }

    #[test]
    fn stored_streak_past_u32_reads_as_zero() {
        let kv = Rc::new(MemoryStore::new());
        kv.set("mita_streak_aio", "4294967296").unwrap();
        assert_eq!(read_state(kv.as_ref(), "mita", "aio").streak, 0);
    }

    #[test]
    fn xp_near_the_ceiling_saturates() {
        let kv = Rc::new(MemoryStore::new());
        kv.set("mita_xp_aio", &(u64::MAX - 5).to_string()).unwrap();
        kv.set("mita_daily_xp_aio", &(u64::MAX - 5).to_string()).unwrap();
        kv.set("mita_last_active_aio", "2025-05-05").unwrap();
        let clock = Rc::new(FixedClock::on(day(2025, 5, 5)));
        let mut tracker = XpTracker::load(kv, "mita", "aio", clock);
        let award = tracker.add_xp(30).unwrap();
        assert_eq!(tracker.xp(), u64::MAX);
        assert_eq!(tracker.daily_xp(), u64::MAX);
        assert!(!award.leveled_up);
    }
}
