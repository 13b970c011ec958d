use crate::curriculum::Curriculum;
use crate::engine::analytics::SkillCategory;
use crate::progress::Mistake;

pub const MISSING_QUESTION: &str = "Question not found";

/// A recorded mistake joined with the curriculum text it refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewItem {
    pub mistake: Mistake,
    pub week_title: String,
    pub question_text: String,
    pub kind: Option<SkillCategory>,
    pub correct_answer: String,
}

/// Mistakes whose week or question has since disappeared still show up,
/// with placeholder text.
pub fn review_items(curriculum: &Curriculum, mistakes: &[Mistake]) -> Vec<ReviewItem> {
    mistakes
        .iter()
        .map(|m| {
            let week = curriculum.week(m.week_id);
            let question = week.and_then(|w| w.question(&m.question_id));
            ReviewItem {
                mistake: m.clone(),
                week_title: week
                    .map(|w| w.title.clone())
                    .unwrap_or_else(|| format!("Week {}", m.week_id)),
                question_text: question
                    .map(|q| q.text.clone())
                    .unwrap_or_else(|| MISSING_QUESTION.to_string()),
                kind: question.map(|q| q.kind),
                correct_answer: question.map(|q| q.correct_answer.clone()).unwrap_or_default(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mistake(week_id: u32, question_id: &str) -> Mistake {
        Mistake {
            week_id,
            question_id: question_id.to_string(),
            timestamp: 0,
        }
    }

    #[test]
    fn joins_curriculum_text() {
        let curriculum = Curriculum::load().unwrap();
        let week = &curriculum.weeks()[0];
        let q = week.questions().next().unwrap();

        let items = review_items(&curriculum, &[mistake(week.id, &q.id), mistake(999, "gone")]);
        assert_eq!(items[0].week_title, week.title);
        assert_eq!(items[0].question_text, q.text);
        assert_eq!(items[0].kind, Some(q.kind));
        assert_eq!(items[1].week_title, "Week 999");
        assert_eq!(items[1].question_text, MISSING_QUESTION);
        assert!(items[1].correct_answer.is_empty());
    }
}
