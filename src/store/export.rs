use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::annotate::persist::SavedHighlights;
use crate::auth::User;
use crate::engine::xp::{self, XpState};
use crate::progress::{Attempt, Mistake};
use crate::store::keys::{RecordKind, user_key};
use crate::store::kv::{KeyValueStore, read_json};

pub const EXPORT_VERSION: u32 = 1;

/// Everything persisted for one learner, as a single JSON document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserExport {
    pub readcoach_export_version: u32,
    pub exported_at: DateTime<Utc>,
    pub user: User,
    pub completed_weeks: Vec<u32>,
    pub mistakes: Vec<Mistake>,
    pub history: Vec<Attempt>,
    pub xp: XpState,
    #[serde(default)]
    pub highlights: SavedHighlights,
}

pub fn export_user(store: &dyn KeyValueStore, namespace: &str, user: &User) -> UserExport {
    let key = |kind| user_key(namespace, kind, &user.id);
    UserExport {
        readcoach_export_version: EXPORT_VERSION,
        exported_at: Utc::now(),
        user: user.clone(),
        completed_weeks: read_json(store, &key(RecordKind::Progress)),
        mistakes: read_json(store, &key(RecordKind::Mistakes)),
        history: read_json(store, &key(RecordKind::History)),
        xp: xp::read_state(store, namespace, &user.id),
        highlights: read_json(store, &key(RecordKind::Highlights)),
    }
}

/// Write an export back. Every value is serialized before the first write so
/// a bad document leaves the store untouched.
pub fn import_user(store: &dyn KeyValueStore, namespace: &str, data: &UserExport) -> Result<()> {
    if data.readcoach_export_version != EXPORT_VERSION {
        bail!(
            "Unsupported export version: {} (expected {})",
            data.readcoach_export_version,
            EXPORT_VERSION
        );
    }
    let user_id = data.user.id.trim();
    if user_id.is_empty() {
        bail!("Export has no user id");
    }

    let key = |kind| user_key(namespace, kind, user_id);
    let mut writes = vec![
        (key(RecordKind::Progress), serde_json::to_string(&data.completed_weeks)?),
        (key(RecordKind::Mistakes), serde_json::to_string(&data.mistakes)?),
        (key(RecordKind::History), serde_json::to_string(&data.history)?),
        (key(RecordKind::Highlights), serde_json::to_string(&data.highlights)?),
    ];
    writes.extend(xp::state_entries(namespace, user_id, &data.xp));
    if data.xp.last_active.is_none() {
        store.remove(&key(RecordKind::LastActive))?;
    }

    for (key, value) in &writes {
        store.set(key, value)?;
    }
    tracing::info!(user_id, records = writes.len(), "imported user data");
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::store::kv::MemoryStore;

    fn sample(user: &User) -> UserExport {
        UserExport {
            readcoach_export_version: EXPORT_VERSION,
            exported_at: Utc::now(),
            user: user.clone(),
            completed_weeks: vec![1, 2],
            mistakes: vec![Mistake {
                week_id: 2,
                question_id: "w2-q1".to_string(),
                timestamp: 10,
            }],
            history: vec![Attempt {
                week_id: 2,
                question_id: "w2-q1".to_string(),
                is_correct: false,
                timestamp: 10,
            }],
            xp: XpState {
                xp: 420,
                daily_xp: 30,
                streak: 3,
                last_active: NaiveDate::from_ymd_opt(2026, 3, 1),
            },
            highlights: SavedHighlights::new(),
        }
    }

    #[test]
    fn import_then_export_round_trips() {
        let user = User::from_name("Aio");
        let data = sample(&user);
        let store = MemoryStore::new();
        import_user(&store, "mita", &data).unwrap();

        assert_eq!(store.get("mita_xp_aio").as_deref(), Some("420"));
        assert_eq!(store.get("mita_last_active_aio").as_deref(), Some("2026-03-01"));

        let back = export_user(&store, "mita", &user);
        assert_eq!(back.completed_weeks, data.completed_weeks);
        assert_eq!(back.mistakes, data.mistakes);
        assert_eq!(back.history, data.history);
        assert_eq!(back.xp, data.xp);
    }

    #[test]
    fn unknown_version_is_rejected() {
        let user = User::from_name("Aio");
        let mut data = sample(&user);
        data.readcoach_export_version = 99;
        let store = MemoryStore::new();
        let err = import_user(&store, "mita", &data).unwrap_err().to_string();
        assert!(err.contains("Unsupported export version"));
        assert!(err.contains("99"));
        assert!(store.is_empty());
    }

    #[test]
    fn export_of_unknown_user_is_empty() {
        let store = MemoryStore::new();
        let export = export_user(&store, "mita", &User::from_name("Jalil"));
        assert!(export.completed_weeks.is_empty());
        assert_eq!(export.xp, XpState::default());
    }
}
