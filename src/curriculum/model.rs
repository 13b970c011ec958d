use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::analytics::SkillCategory;

/// The four rotating curriculum themes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Theme {
    Ethics,
    Media,
    Global,
    Education,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Ethics, Theme::Media, Theme::Global, Theme::Education];

    pub fn label(self) -> &'static str {
        match self {
            Theme::Ethics => "Ethics & Society",
            Theme::Media => "Media & Tech",
            Theme::Global => "Global Citizenship",
            Theme::Education => "Education Theory",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SkillCategory,
    pub text: String,
    /// Empty for free-text (paraphrase) questions.
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answer: String,
}

impl Question {
    pub fn is_multiple_choice(&self) -> bool {
        self.kind != SkillCategory::Paraphrase && !self.options.is_empty()
    }

    pub fn is_correct(&self, option: &str) -> bool {
        self.correct_answer == option
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passage {
    pub title: String,
    /// Passage body as HTML paragraphs.
    #[serde(rename = "content")]
    pub content_html: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub main_idea_hint: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabItem {
    pub word: String,
    pub definition: String,
    /// Filled from the owning week when loaded from week content.
    #[serde(default)]
    pub week_id: u32,
}

impl VocabItem {
    pub fn new(word: &str, definition: &str, week_id: u32) -> Self {
        Self {
            word: word.to_string(),
            definition: definition.to_string(),
            week_id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Week {
    pub id: u32,
    pub title: String,
    pub theme: Theme,
    pub passages: Vec<Passage>,
    #[serde(default)]
    pub vocabulary: Vec<VocabItem>,
}

impl Week {
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.passages.iter().flat_map(|p| p.questions.iter())
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions().find(|q| q.id == id)
    }
}

/// A stand-alone rewrite exercise for the paraphrase trainer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerScenario {
    pub id: u32,
    pub title: String,
    #[serde(rename = "content")]
    pub content_html: String,
    pub underlined_sentence: String,
}

/// Spoken-answer prompts shown before a week is marked complete.
pub fn interview_prompts(theme: Theme) -> [String; 3] {
    [
        format!("How does the concept of {} apply to your daily life?", theme.label()),
        "Can you describe a time when you faced a similar dilemma?".to_string(),
        "Why do you think this issue is important for future leaders?".to_string(),
    ]
}
