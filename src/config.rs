use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::auth::DEFAULT_ALLOWED_USERS;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_storage_namespace")]
    pub storage_namespace: String,
    #[serde(default = "default_allowed_users")]
    pub allowed_users: Vec<String>,
    #[serde(default = "default_paraphrase_min_words")]
    pub paraphrase_min_words: usize,
    #[serde(default = "default_trainer_min_words")]
    pub trainer_min_words: usize,
    #[serde(default = "default_blitz_duration_secs")]
    pub blitz_duration_secs: u64,
    #[serde(default = "default_daily_goal_xp")]
    pub daily_goal_xp: u64,
    #[serde(default = "default_xp_correct_answer")]
    pub xp_correct_answer: u64,
    #[serde(default = "default_xp_paraphrase")]
    pub xp_paraphrase: u64,
    #[serde(default = "default_xp_week_complete")]
    pub xp_week_complete: u64,
    #[serde(default = "default_exam_minutes")]
    pub exam_minutes: u64,
    #[serde(default = "default_dictionary_lookups_enabled")]
    pub dictionary_lookups_enabled: bool,
}

fn default_theme() -> String {
    "dark".to_string()
}
fn default_storage_namespace() -> String {
    "mita".to_string()
}
fn default_allowed_users() -> Vec<String> {
    DEFAULT_ALLOWED_USERS.iter().map(|s| s.to_string()).collect()
}
fn default_paraphrase_min_words() -> usize {
    10
}
fn default_trainer_min_words() -> usize {
    10
}
fn default_blitz_duration_secs() -> u64 {
    60
}
fn default_daily_goal_xp() -> u64 {
    100
}
fn default_xp_correct_answer() -> u64 {
    15
}
fn default_xp_paraphrase() -> u64 {
    30
}
fn default_xp_week_complete() -> u64 {
    100
}
fn default_exam_minutes() -> u64 {
    10
}
fn default_dictionary_lookups_enabled() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            storage_namespace: default_storage_namespace(),
            allowed_users: default_allowed_users(),
            paraphrase_min_words: default_paraphrase_min_words(),
            trainer_min_words: default_trainer_min_words(),
            blitz_duration_secs: default_blitz_duration_secs(),
            daily_goal_xp: default_daily_goal_xp(),
            xp_correct_answer: default_xp_correct_answer(),
            xp_paraphrase: default_xp_paraphrase(),
            xp_week_complete: default_xp_week_complete(),
            exam_minutes: default_exam_minutes(),
            dictionary_lookups_enabled: default_dictionary_lookups_enabled(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("readcoach")
            .join("config.toml")
    }

    /// Clamp numbers into usable ranges and restore empty identity fields.
    pub fn validate(&mut self) {
        self.paraphrase_min_words = self.paraphrase_min_words.clamp(1, 50);
        self.trainer_min_words = self.trainer_min_words.clamp(1, 100);
        self.blitz_duration_secs = self.blitz_duration_secs.clamp(10, 600);
        self.daily_goal_xp = self.daily_goal_xp.clamp(10, 10_000);
        self.xp_correct_answer = self.xp_correct_answer.min(1_000);
        self.xp_paraphrase = self.xp_paraphrase.min(1_000);
        self.xp_week_complete = self.xp_week_complete.min(10_000);
        self.exam_minutes = self.exam_minutes.clamp(1, 180);

        let namespace = self.storage_namespace.trim().to_string();
        self.storage_namespace = if namespace.is_empty() {
            default_storage_namespace()
        } else {
            namespace
        };
        self.allowed_users.retain(|u| !u.trim().is_empty());
        if self.allowed_users.is_empty() {
            self.allowed_users = default_allowed_users();
        }
    }
}
