/// Per-user record kinds. Each one lives under its own storage key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Progress,
    Mistakes,
    History,
    Xp,
    Streak,
    DailyXp,
    LastActive,
    Highlights,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Progress => "progress",
            RecordKind::Mistakes => "mistakes",
            RecordKind::History => "history",
            RecordKind::Xp => "xp",
            RecordKind::Streak => "streak",
            RecordKind::DailyXp => "daily_xp",
            RecordKind::LastActive => "last_active",
            RecordKind::Highlights => "highlights",
        }
    }
}

/// `<namespace>_<kind>_<userId>`, e.g. `mita_daily_xp_jalil`.
pub fn user_key(namespace: &str, kind: RecordKind, user_id: &str) -> String {
    format!("{namespace}_{}_{user_id}", kind.as_str())
}

pub fn session_key(namespace: &str) -> String {
    format!("{namespace}_current_user")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_follow_namespace_kind_user_layout() {
        assert_eq!(user_key("mita", RecordKind::Progress, "aio"), "mita_progress_aio");
        assert_eq!(user_key("mita", RecordKind::DailyXp, "aio"), "mita_daily_xp_aio");
        assert_eq!(
            user_key("mita", RecordKind::LastActive, "jalil"),
            "mita_last_active_jalil"
        );
        assert_eq!(session_key("mita"), "mita_current_user");
    }

    #[test]
    fn different_users_never_share_keys() {
        assert_ne!(
            user_key("mita", RecordKind::History, "aio"),
            user_key("mita", RecordKind::History, "jalil")
        );
    }
}
