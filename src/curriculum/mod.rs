//! Bundled curriculum: weeks, passages, questions and vocabulary.

pub mod model;
pub mod phases;
pub mod vocab;

use std::collections::HashSet;

use rust_embed::Embed;
use thiserror::Error;

use crate::engine::analytics::QuestionIndex;

pub use model::{Passage, Question, Theme, TrainerScenario, VocabItem, Week, interview_prompts};
pub use phases::{PhaseConfig, exam_config, phase_for_week};

#[derive(Embed)]
#[folder = "assets/curriculum/"]
struct CurriculumAssets;

const TRAINER_FILE: &str = "trainer.json";

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("{file} is not valid UTF-8")]
    Encoding { file: String },
    #[error("failed to parse {file}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("question id {id} appears more than once")]
    DuplicateQuestion { id: String },
    #[error("question {id} has a correct answer that is not one of its options")]
    AnswerNotAnOption { id: String },
}

#[derive(Clone, Debug, Default)]
pub struct Curriculum {
    weeks: Vec<Week>,
    trainer: Vec<TrainerScenario>,
    index: QuestionIndex,
}

impl Curriculum {
    /// Parse every bundled week file and the trainer scenarios.
    pub fn load() -> Result<Self, ContentError> {
        let mut weeks = Vec::new();
        let mut trainer = Vec::new();
        for file in CurriculumAssets::iter() {
            let Some(asset) = CurriculumAssets::get(&file) else {
                continue;
            };
            let text = std::str::from_utf8(asset.data.as_ref()).map_err(|_| ContentError::Encoding {
                file: file.to_string(),
            })?;
            let parse_err = |source| ContentError::Parse {
                file: file.to_string(),
                source,
            };
            if file == TRAINER_FILE {
                trainer = serde_json::from_str(text).map_err(parse_err)?;
            } else if file.ends_with(".json") {
                weeks.push(serde_json::from_str(text).map_err(parse_err)?);
            }
        }
        let curriculum = Self::from_parts(weeks, trainer)?;
        tracing::debug!(
            weeks = curriculum.weeks.len(),
            questions = curriculum.index.len(),
            "curriculum loaded"
        );
        Ok(curriculum)
    }

    pub fn from_parts(mut weeks: Vec<Week>, trainer: Vec<TrainerScenario>) -> Result<Self, ContentError> {
        weeks.sort_by_key(|w| w.id);
        for week in &mut weeks {
            let id = week.id;
            week.vocabulary.iter_mut().for_each(|v| v.week_id = id);
        }

        let mut seen = HashSet::new();
        for question in weeks.iter().flat_map(Week::questions) {
            if !seen.insert(question.id.as_str()) {
                return Err(ContentError::DuplicateQuestion {
                    id: question.id.clone(),
                });
            }
            if question.is_multiple_choice() && !question.options.contains(&question.correct_answer) {
                return Err(ContentError::AnswerNotAnOption {
                    id: question.id.clone(),
                });
            }
        }

        let index = QuestionIndex::from_weeks(&weeks);
        Ok(Self {
            weeks,
            trainer,
            index,
        })
    }

    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    pub fn week(&self, id: u32) -> Option<&Week> {
        self.weeks.iter().find(|w| w.id == id)
    }

    pub fn trainer_scenarios(&self) -> &[TrainerScenario] {
        &self.trainer
    }

    pub fn question_index(&self) -> &QuestionIndex {
        &self.index
    }

    pub fn find_question(&self, week_id: u32, question_id: &str) -> Option<&Question> {
        self.week(week_id)?.question(question_id)
    }

    pub fn all_vocabulary(&self) -> Vec<VocabItem> {
        vocab::all_vocabulary(&self.weeks)
    }

    /// Week vocabulary for browsing, ordered by week.
    pub fn vocabulary_repository(&self) -> Vec<VocabItem> {
        vocab::repository(&self.weeks)
    }
}
