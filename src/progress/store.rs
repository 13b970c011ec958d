use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::progress::events::{EventBus, ProgressEvent};
use crate::store::keys::{RecordKind, user_key};
use crate::store::kv::{SharedStore, read_json, write_json};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mistake {
    pub week_id: u32,
    pub question_id: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

/// One answer submission. The history is append-only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub week_id: u32,
    pub question_id: String,
    pub is_correct: bool,
    pub timestamp: i64,
}

/// Per-user completed weeks, outstanding mistakes and attempt history.
///
/// Listeners may write back into the store from their callback. The event
/// that write raises is queued and reaches every listener, the writer
/// included, once the current notification has been delivered.
pub struct ProgressStore {
    store: SharedStore,
    namespace: String,
    clock: Rc<dyn Clock>,
    events: EventBus,
}

impl ProgressStore {
    pub fn new(store: SharedStore, namespace: &str, clock: Rc<dyn Clock>) -> Self {
        Self {
            store,
            namespace: namespace.to_string(),
            clock,
            events: EventBus::new(),
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    fn key(&self, kind: RecordKind, user_id: &str) -> String {
        user_key(&self.namespace, kind, user_id)
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        match write_json(self.store.as_ref(), key, value) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to persist progress");
                false
            }
        }
    }

    // --- Completed weeks ---

    pub fn completed_weeks(&self, user_id: &str) -> Vec<u32> {
        if user_id.is_empty() {
            return Vec::new();
        }
        read_json(self.store.as_ref(), &self.key(RecordKind::Progress, user_id))
    }

    pub fn is_week_complete(&self, user_id: &str, week_id: u32) -> bool {
        self.completed_weeks(user_id).contains(&week_id)
    }

    /// Returns true when the week was newly marked.
    pub fn mark_week_complete(&self, user_id: &str, week_id: u32) -> bool {
        if user_id.is_empty() {
            return false;
        }
        let mut completed = self.completed_weeks(user_id);
        if completed.contains(&week_id) {
            return false;
        }
        completed.push(week_id);
        if !self.write(&self.key(RecordKind::Progress, user_id), &completed) {
            return false;
        }
        tracing::info!(user_id, week_id, "week completed");
        self.events.emit(&ProgressEvent::WeekCompleted {
            user_id: user_id.to_string(),
            week_id,
        });
        true
    }

    // --- Mistakes ---

    pub fn mistakes(&self, user_id: &str) -> Vec<Mistake> {
        if user_id.is_empty() {
            return Vec::new();
        }
        read_json(self.store.as_ref(), &self.key(RecordKind::Mistakes, user_id))
    }

    /// Idempotent per `(week_id, question_id)`. Returns true on an actual insert.
    pub fn record_mistake(&self, user_id: &str, week_id: u32, question_id: &str) -> bool {
        if user_id.is_empty() {
            return false;
        }
        let mut mistakes = self.mistakes(user_id);
        if mistakes
            .iter()
            .any(|m| m.week_id == week_id && m.question_id == question_id)
        {
            return false;
        }
        mistakes.push(Mistake {
            week_id,
            question_id: question_id.to_string(),
            timestamp: self.clock.now_ms(),
        });
        if !self.write(&self.key(RecordKind::Mistakes, user_id), &mistakes) {
            return false;
        }
        self.events.emit(&ProgressEvent::MistakeRecorded {
            user_id: user_id.to_string(),
            week_id,
            question_id: question_id.to_string(),
        });
        true
    }

    /// Removes the matching mistake if present and notifies regardless of
    /// whether anything matched.
    pub fn clear_mistake(&self, user_id: &str, week_id: u32, question_id: &str) {
        if user_id.is_empty() {
            return;
        }
        let mut mistakes = self.mistakes(user_id);
        mistakes.retain(|m| !(m.week_id == week_id && m.question_id == question_id));
        if !self.write(&self.key(RecordKind::Mistakes, user_id), &mistakes) {
            return;
        }
        self.events.emit(&ProgressEvent::MistakeCleared {
            user_id: user_id.to_string(),
            week_id,
            question_id: question_id.to_string(),
        });
    }

    // --- Attempt history ---

    pub fn history(&self, user_id: &str) -> Vec<Attempt> {
        if user_id.is_empty() {
            return Vec::new();
        }
        read_json(self.store.as_ref(), &self.key(RecordKind::History, user_id))
    }

    pub fn log_attempt(&self, user_id: &str, week_id: u32, question_id: &str, is_correct: bool) {
        if user_id.is_empty() {
            return;
        }
        let mut history = self.history(user_id);
        history.push(Attempt {
            week_id,
            question_id: question_id.to_string(),
            is_correct,
            timestamp: self.clock.now_ms(),
        });
        if !self.write(&self.key(RecordKind::History, user_id), &history) {
            return;
        }
        self.events.emit(&ProgressEvent::AttemptLogged {
            user_id: user_id.to_string(),
            week_id,
            question_id: question_id.to_string(),
            is_correct,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use chrono::NaiveDate;

    use super::*;
    use crate::clock::FixedClock;
    use crate::progress::events::Topic;
    use crate::store::kv::{KeyValueStore, MemoryStore};

    fn make_store() -> (Rc<MemoryStore>, Rc<FixedClock>, ProgressStore) {
        let kv = Rc::new(MemoryStore::new());
        let clock = Rc::new(FixedClock::on(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()));
        let store = ProgressStore::new(kv.clone(), "mita", clock.clone());
        (kv, clock, store)
    }

    fn record_events(store: &ProgressStore) -> Rc<RefCell<Vec<ProgressEvent>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in = Rc::clone(&seen);
        store
            .events()
            .subscribe(move |e| seen_in.borrow_mut().push(e.clone()));
        seen
    }

    #[test]
    fn mark_week_complete_is_idempotent_and_notifies_once() {
        let (_kv, _clock, store) = make_store();
        let seen = record_events(&store);

        assert!(store.mark_week_complete("aio", 3));
        assert!(!store.mark_week_complete("aio", 3));
        assert_eq!(store.completed_weeks("aio"), vec![3]);
        assert!(store.is_week_complete("aio", 3));
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].topic(), Topic::Progress);
    }

    #[test]
    fn repeated_record_mistake_keeps_one_entry() {
        let (_kv, _clock, store) = make_store();
        let seen = record_events(&store);
        for _ in 0..5 {
            store.record_mistake("aio", 1, "w1-q2");
        }
        assert_eq!(store.mistakes("aio").len(), 1);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn clear_then_record_restores_single_entry_with_new_timestamp() {
        let (_kv, clock, store) = make_store();
        store.record_mistake("aio", 1, "q");
        let first = store.mistakes("aio")[0].timestamp;

        clock.advance_ms(5_000);
        store.clear_mistake("aio", 1, "q");
        assert!(store.mistakes("aio").is_empty());
        store.record_mistake("aio", 1, "q");

        let mistakes = store.mistakes("aio");
        assert_eq!(mistakes.len(), 1);
        assert_eq!(mistakes[0].timestamp, first + 5_000);
    }

    #[test]
    fn clear_mistake_notifies_even_without_match() {
        let (_kv, _clock, store) = make_store();
        let seen = record_events(&store);
        store.clear_mistake("aio", 9, "never-recorded");
        assert_eq!(seen.borrow().len(), 1);
        assert!(matches!(seen.borrow()[0], ProgressEvent::MistakeCleared { .. }));
    }

    #[test]
    fn clear_mistake_only_removes_matching_pair() {
        let (_kv, _clock, store) = make_store();
        store.record_mistake("aio", 1, "q1");
        store.record_mistake("aio", 1, "q2");
        store.record_mistake("aio", 2, "q1");
        store.clear_mistake("aio", 1, "q1");
        let left: Vec<(u32, String)> = store
            .mistakes("aio")
            .into_iter()
            .map(|m| (m.week_id, m.question_id))
            .collect();
        assert_eq!(left, vec![(1, "q2".to_string()), (2, "q1".to_string())]);
    }

    #[test]
    fn log_attempt_appends_every_time() {
        let (_kv, _clock, store) = make_store();
        let seen = record_events(&store);
        for i in 0..7 {
            store.log_attempt("aio", 1, "q1", i % 2 == 0);
        }
        assert_eq!(store.history("aio").len(), 7);
        assert_eq!(seen.borrow().len(), 7);
    }

    #[test]
    fn corrupt_records_read_as_empty() {
        let (kv, _clock, store) = make_store();
        kv.set("mita_history_aio", "not json at all").unwrap();
        kv.set("mita_progress_aio", "[1, 2,").unwrap();
        assert!(store.history("aio").is_empty());
        assert!(store.completed_weeks("aio").is_empty());

        // Appending over a corrupt record starts a fresh log.
        store.log_attempt("aio", 1, "q", true);
        assert_eq!(store.history("aio").len(), 1);
    }

    #[test]
    fn users_are_partitioned() {
        let (_kv, _clock, store) = make_store();
        store.mark_week_complete("aio", 1);
        store.record_mistake("jalil", 2, "q");
        assert!(store.completed_weeks("jalil").is_empty());
        assert!(store.mistakes("aio").is_empty());
    }

    #[test]
    fn blank_user_is_ignored() {
        let (kv, _clock, store) = make_store();
        let seen = record_events(&store);
        assert!(!store.mark_week_complete("", 1));
        store.log_attempt("", 1, "q", true);
        store.clear_mistake("", 1, "q");
        assert!(kv.is_empty());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn stored_layout_uses_camel_case_fields() {
        let (kv, _clock, store) = make_store();
        store.log_attempt("aio", 4, "w4-q1", false);
        let raw = kv.get("mita_history_aio").unwrap();
        assert!(raw.contains("\"weekId\":4"));
        assert!(raw.contains("\"questionId\":\"w4-q1\""));
        assert!(raw.contains("\"isCorrect\":false"));
    }
}
