use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use readcoach::annotate::{
    AnnotatedPassage, ApplyOutcome, ClearTarget, HighlightColor, HighlightStore, TextRange,
};
use readcoach::curriculum::{PhaseConfig, Question};
use readcoach::engine::xp::{XpAward, XpTracker};
use readcoach::paraphrase::AnswerBuffer;
use readcoach::session::{CheckpointGate, GateState, QuestionOutcome, QuizSession};

/// Caret in the passage: paragraph plus flat char offset into its text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Caret {
    pub paragraph: usize,
    pub offset: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Passage,
    Questions,
    Checkpoint,
}

/// Everything the week screen tracks on top of the quiz session: the
/// annotated passage, the caret and selection, the checkpoints between
/// paragraphs, and the answer boxes of the paraphrase questions.
pub struct WeekReader {
    pub quiz: QuizSession,
    user_id: String,
    passage: AnnotatedPassage,
    texts: Vec<Vec<char>>,
    cursor: Caret,
    anchor: Option<Caret>,
    gates: Vec<CheckpointGate>,
    focus: Focus,
    question: usize,
    option: usize,
    answers: HashMap<String, AnswerBuffer>,
    min_words: usize,
    paste_alert: Rc<Cell<bool>>,
    pub show_interview: bool,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '\'' || c == '-'
}

impl WeekReader {
    pub fn open(
        quiz: QuizSession,
        user_id: &str,
        highlights: &HighlightStore,
        min_words: usize,
        paste_alert: Rc<Cell<bool>>,
    ) -> Self {
        let mut reader = Self {
            quiz,
            user_id: user_id.to_string(),
            passage: AnnotatedPassage::default(),
            texts: Vec::new(),
            cursor: Caret::default(),
            anchor: None,
            gates: Vec::new(),
            focus: Focus::Passage,
            question: 0,
            option: 0,
            answers: HashMap::new(),
            min_words,
            paste_alert,
            show_interview: false,
        };
        reader.load_passage(highlights);
        reader
    }

    fn load_passage(&mut self, highlights: &HighlightStore) {
        let week_id = self.quiz.week().id;
        let index = self.quiz.active_passage();
        let Some(passage) = self.quiz.passage() else {
            return;
        };
        self.passage = highlights.open(&self.user_id, week_id, index, &passage.content_html);
        self.texts = (0..self.passage.len())
            .map(|i| {
                self.passage
                    .fragment(i)
                    .map(|f| f.text_content().chars().collect())
                    .unwrap_or_default()
            })
            .collect();
        self.gates = (1..self.passage.len()).map(CheckpointGate::new).collect();
        self.answers = passage
            .questions
            .iter()
            .filter(|q| !q.is_multiple_choice())
            .map(|q| {
                let alert = Rc::clone(&self.paste_alert);
                let buffer = AnswerBuffer::new(self.min_words).on_paste(move || alert.set(true));
                (q.id.clone(), buffer)
            })
            .collect();
        self.cursor = Caret::default();
        self.anchor = None;
        self.focus = Focus::Passage;
        self.question = 0;
        self.option = 0;
    }

    pub fn switch_passage(&mut self, highlights: &HighlightStore, index: usize) -> bool {
        if index == self.quiz.active_passage() || !self.quiz.set_active_passage(index) {
            return false;
        }
        self.load_passage(highlights);
        true
    }

    pub fn passage(&self) -> &AnnotatedPassage {
        &self.passage
    }

    pub fn passage_count(&self) -> usize {
        self.quiz.week().passages.len()
    }

    pub fn phase(&self) -> PhaseConfig {
        self.quiz.phase()
    }

    /// Gating follows the phase, so the caret is pulled back into view when
    /// leaving exam mode re-closes checkpoints.
    pub fn toggle_exam_mode(&mut self) {
        self.quiz.toggle_exam_mode();
        let visible = self.visible_paragraphs();
        if self.cursor.paragraph >= visible {
            self.cursor = Caret {
                paragraph: visible.saturating_sub(1),
                offset: 0,
            };
            self.anchor = None;
        }
        if self.focus == Focus::Checkpoint && !self.is_gated() {
            self.focus = Focus::Passage;
        }
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Passage => Focus::Questions,
            Focus::Questions | Focus::Checkpoint => Focus::Passage,
        };
    }

    pub fn cursor(&self) -> Caret {
        self.cursor
    }

    pub fn anchor(&self) -> Option<Caret> {
        self.anchor
    }

    // --- checkpoints ---

    /// Checkpoints only guard paragraphs while the phase shows hints.
    pub fn is_gated(&self) -> bool {
        self.phase().show_hint_box
    }

    /// Number of paragraphs the reader may see.
    pub fn visible_paragraphs(&self) -> usize {
        if !self.is_gated() {
            return self.passage.len();
        }
        self.gates
            .iter()
            .position(|g| !g.is_unlocked())
            .map(|i| i + 1)
            .unwrap_or(self.passage.len())
    }

    /// The checkpoint under the last visible paragraph, if one is still closed.
    pub fn pending_gate(&self) -> Option<(&CheckpointGate, GateState)> {
        if !self.is_gated() {
            return None;
        }
        let gate = self.gates.iter().find(|g| !g.is_unlocked())?;
        let guarded = gate.index() - 1;
        Some((gate, gate.state(self.passage.has_highlight(guarded))))
    }

    fn pending_gate_mut(&mut self) -> Option<(&mut CheckpointGate, bool)> {
        if !self.is_gated() {
            return None;
        }
        let passage = &self.passage;
        let gate = self.gates.iter_mut().find(|g| !g.is_unlocked())?;
        let has_highlight = passage.has_highlight(gate.index() - 1);
        Some((gate, has_highlight))
    }

    /// Expand the pending checkpoint once its paragraph has a highlight.
    pub fn open_checkpoint(&mut self) -> bool {
        let Some((gate, has_highlight)) = self.pending_gate_mut() else {
            return false;
        };
        gate.expand(has_highlight);
        if gate.state(has_highlight) == GateState::Expanded {
            self.focus = Focus::Checkpoint;
            return true;
        }
        false
    }

    pub fn checkpoint_insert(&mut self, ch: char) {
        if let Some((gate, _)) = self.pending_gate_mut() {
            gate.summary_mut().insert(ch);
        }
    }

    pub fn checkpoint_backspace(&mut self) {
        if let Some((gate, _)) = self.pending_gate_mut() {
            gate.summary_mut().backspace();
        }
    }

    /// On unlock the caret moves to the start of the revealed paragraph.
    pub fn submit_checkpoint(&mut self) -> bool {
        let Some((gate, has_highlight)) = self.pending_gate_mut() else {
            return false;
        };
        if !gate.submit(has_highlight) {
            return false;
        }
        let revealed = gate.index();
        self.cursor = Caret {
            paragraph: revealed,
            offset: 0,
        };
        self.anchor = None;
        self.focus = Focus::Passage;
        true
    }

    pub fn give_up_checkpoint(&mut self) {
        if let Some((gate, _)) = self.pending_gate_mut() {
            gate.give_up();
        }
    }

    pub fn retry_checkpoint(&mut self) {
        if let Some((gate, _)) = self.pending_gate_mut() {
            gate.retry();
        }
        self.focus = Focus::Passage;
    }

    pub fn reject_paste(&self) {
        tracing::debug!("paste into checkpoint rejected");
        self.paste_alert.set(true);
    }

    // --- caret and selection ---

    fn para_len(&self, paragraph: usize) -> usize {
        self.texts.get(paragraph).map_or(0, Vec::len)
    }

    fn last_offset(&self, paragraph: usize) -> usize {
        self.para_len(paragraph).saturating_sub(1)
    }

    pub fn move_left(&mut self) {
        if self.cursor.offset > 0 {
            self.cursor.offset -= 1;
        } else if self.cursor.paragraph > 0 {
            self.cursor.paragraph -= 1;
            self.cursor.offset = self.last_offset(self.cursor.paragraph);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor.offset < self.last_offset(self.cursor.paragraph) {
            self.cursor.offset += 1;
        } else if self.cursor.paragraph + 1 < self.visible_paragraphs() {
            self.cursor.paragraph += 1;
            self.cursor.offset = 0;
        }
    }

    pub fn paragraph_up(&mut self) {
        if self.cursor.paragraph > 0 {
            self.cursor.paragraph -= 1;
            self.cursor.offset = self.cursor.offset.min(self.last_offset(self.cursor.paragraph));
        }
    }

    pub fn paragraph_down(&mut self) {
        if self.cursor.paragraph + 1 < self.visible_paragraphs() {
            self.cursor.paragraph += 1;
            self.cursor.offset = self.cursor.offset.min(self.last_offset(self.cursor.paragraph));
        }
    }

    pub fn line_start(&mut self) {
        self.cursor.offset = 0;
    }

    pub fn line_end(&mut self) {
        self.cursor.offset = self.last_offset(self.cursor.paragraph);
    }

    /// Start of the next word, staying in the paragraph.
    pub fn word_forward(&mut self) {
        let Some(text) = self.texts.get(self.cursor.paragraph) else {
            return;
        };
        let mut i = self.cursor.offset;
        while i < text.len() && is_word_char(text[i]) {
            i += 1;
        }
        while i < text.len() && !is_word_char(text[i]) {
            i += 1;
        }
        self.cursor.offset = i.min(self.last_offset(self.cursor.paragraph));
    }

    pub fn word_back(&mut self) {
        let Some(text) = self.texts.get(self.cursor.paragraph) else {
            return;
        };
        let mut i = self.cursor.offset;
        while i > 0 && !is_word_char(text[i - 1]) {
            i -= 1;
        }
        while i > 0 && is_word_char(text[i - 1]) {
            i -= 1;
        }
        self.cursor.offset = i;
    }

    pub fn toggle_anchor(&mut self) {
        self.anchor = match self.anchor {
            Some(_) => None,
            None => Some(self.cursor),
        };
    }

    /// Ordered, inclusive char span of the selection.
    pub fn selection_span(&self) -> Option<(Caret, Caret)> {
        let anchor = self.anchor?;
        Some(if anchor <= self.cursor {
            (anchor, self.cursor)
        } else {
            (self.cursor, anchor)
        })
    }

    pub fn is_selected(&self, paragraph: usize, offset: usize) -> bool {
        let here = Caret { paragraph, offset };
        self.selection_span()
            .is_some_and(|(start, end)| start <= here && here <= end)
    }

    fn selection_range(&self) -> Option<TextRange> {
        let (start, end) = self.selection_span()?;
        let end_offset = (end.offset + 1).min(self.para_len(end.paragraph));
        Some(TextRange::new(
            self.passage.point_at(start.paragraph, start.offset)?,
            self.passage.point_at(end.paragraph, end_offset)?,
        ))
    }

    pub fn highlight(&mut self, highlights: &HighlightStore, color: HighlightColor) -> ApplyOutcome {
        let range = self.selection_range();
        let outcome = self.passage.apply_highlight(range.as_ref(), color);
        if outcome.clears_selection() {
            self.anchor = None;
            self.save(highlights);
        }
        outcome
    }

    /// Clears the selected span, or the highlight under the caret when
    /// nothing is selected. Returns how many paragraphs changed.
    pub fn clear(&mut self, highlights: &HighlightStore) -> usize {
        let target = match self.selection_range() {
            Some(range) => Some(ClearTarget::Range(range)),
            None => self
                .passage
                .point_at(self.cursor.paragraph, self.cursor.offset)
                .map(ClearTarget::Cursor),
        };
        let Some(target) = target else {
            return 0;
        };
        let changed = self.passage.clear_highlight(&target);
        self.anchor = None;
        if !changed.is_empty() {
            self.save(highlights);
        }
        changed.len()
    }

    fn save(&self, highlights: &HighlightStore) {
        highlights.save(
            &self.user_id,
            self.quiz.week().id,
            self.quiz.active_passage(),
            &self.passage,
        );
    }

    /// The word under the caret, if it is longer than one character.
    pub fn word_at_cursor(&self) -> Option<String> {
        let text = self.texts.get(self.cursor.paragraph)?;
        let at = self.cursor.offset;
        if !text.get(at).copied().is_some_and(is_word_char) {
            return None;
        }
        let mut start = at;
        while start > 0 && is_word_char(text[start - 1]) {
            start -= 1;
        }
        let mut end = at;
        while end < text.len() && is_word_char(text[end]) {
            end += 1;
        }
        let word: String = text[start..end].iter().collect();
        let word = word.trim_matches(|c| c == '\'' || c == '-').to_string();
        (word.chars().count() > 1).then_some(word)
    }

    // --- questions ---

    pub fn questions(&self) -> &[Question] {
        self.quiz.passage().map_or(&[], |p| p.questions.as_slice())
    }

    pub fn question_index(&self) -> usize {
        self.question
    }

    pub fn option_index(&self) -> usize {
        self.option
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions().get(self.question)
    }

    pub fn next_question(&mut self) {
        if self.question + 1 < self.questions().len() {
            self.question += 1;
            self.option = 0;
        }
    }

    pub fn prev_question(&mut self) {
        if self.question > 0 {
            self.question -= 1;
            self.option = 0;
        }
    }

    pub fn next_option(&mut self) {
        let count = self.current_question().map_or(0, |q| q.options.len());
        if self.option + 1 < count {
            self.option += 1;
        }
    }

    pub fn prev_option(&mut self) {
        self.option = self.option.saturating_sub(1);
    }

    /// Pick an option of the current multiple-choice question.
    pub fn choose(&mut self, xp: &mut XpTracker, option: usize) -> Option<QuestionOutcome> {
        let question = self.current_question()?;
        let id = question.id.clone();
        let choice = question.options.get(option)?.clone();
        self.option = option;
        self.quiz.select_option(xp, &id, &choice)
    }

    pub fn answer(&self, question_id: &str) -> Option<&AnswerBuffer> {
        self.answers.get(question_id)
    }

    pub fn current_answer_mut(&mut self) -> Option<&mut AnswerBuffer> {
        let id = self.current_question()?.id.clone();
        if self.quiz.is_paraphrased(&id) {
            return None;
        }
        self.answers.get_mut(&id)
    }

    /// Submit the current paraphrase answer if it validates.
    pub fn submit_answer(&mut self, xp: &mut XpTracker) -> Option<XpAward> {
        let id = self.current_question()?.id.clone();
        self.current_answer_mut()?.submit()?;
        self.quiz.submit_paraphrase(xp, &id)
    }

    /// Correct answers and question count for the active passage.
    pub fn passage_score(&self) -> (usize, usize) {
        let questions = self.questions();
        let correct = questions
            .iter()
            .filter(|q| self.quiz.selected(&q.id).is_some_and(|s| q.is_correct(s)))
            .count();
        (correct, questions.len())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use readcoach::clock::{Clock, FixedClock};
    use readcoach::curriculum::{Passage, Theme, Week};
    use readcoach::engine::SkillCategory;
    use readcoach::feedback::Silent;
    use readcoach::progress::ProgressStore;
    use readcoach::store::{MemoryStore, SharedStore};

    use super::*;

    const USER: &str = "aio";

    fn week(id: u32) -> Week {
        Week {
            id,
            title: "Test".to_string(),
            theme: Theme::Ethics,
            passages: vec![Passage {
                title: "P".to_string(),
                content_html: "<p>First <strong>bold</strong> words.</p><p>Second one.</p><p>Third.</p>"
                    .to_string(),
                questions: vec![
                    Question {
                        id: "t-q1".to_string(),
                        kind: SkillCategory::Detail,
                        text: "Pick".to_string(),
                        options: vec!["A".to_string(), "B".to_string()],
                        correct_answer: "B".to_string(),
                    },
                    Question {
                        id: "t-q2".to_string(),
                        kind: SkillCategory::Paraphrase,
                        text: "Rewrite".to_string(),
                        options: Vec::new(),
                        correct_answer: String::new(),
                    },
                ],
                main_idea_hint: None,
            }],
            vocabulary: Vec::new(),
        }
    }

    struct Fixture {
        store: SharedStore,
        clock: Rc<dyn Clock>,
        highlights: HighlightStore,
        alert: Rc<Cell<bool>>,
    }

    impl Fixture {
        fn new() -> Self {
            let store = MemoryStore::shared();
            Self {
                highlights: HighlightStore::new(Rc::clone(&store), "mita"),
                clock: Rc::new(FixedClock::on(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap())),
                store,
                alert: Rc::new(Cell::new(false)),
            }
        }

        fn reader(&self, week_id: u32) -> WeekReader {
            let progress = Rc::new(ProgressStore::new(
                Rc::clone(&self.store),
                "mita",
                Rc::clone(&self.clock),
            ));
            let quiz = QuizSession::new(week(week_id), USER, progress, Rc::new(Silent));
            WeekReader::open(quiz, USER, &self.highlights, 3, Rc::clone(&self.alert))
        }

        fn xp(&self) -> XpTracker {
            XpTracker::load(Rc::clone(&self.store), "mita", USER, Rc::clone(&self.clock))
        }
    }

    #[test]
    fn checkpoints_hide_later_paragraphs_until_unlocked() {
        let fx = Fixture::new();
        let mut r = fx.reader(1);
        assert!(r.is_gated());
        assert_eq!(r.visible_paragraphs(), 1);
        assert!(!r.open_checkpoint());

        r.toggle_anchor();
        r.word_forward();
        assert!(r.highlight(&fx.highlights, HighlightColor::Main).is_applied());
        assert!(r.open_checkpoint());
        assert_eq!(r.focus(), Focus::Checkpoint);

        for ch in "It is about words.".chars() {
            r.checkpoint_insert(ch);
        }
        assert!(r.submit_checkpoint());
        assert_eq!(r.visible_paragraphs(), 2);
        assert_eq!(r.cursor(), Caret { paragraph: 1, offset: 0 });
        assert_eq!(r.focus(), Focus::Passage);
    }

    #[test]
    fn later_phases_show_everything() {
        let fx = Fixture::new();
        let r = fx.reader(20);
        assert!(!r.is_gated());
        assert_eq!(r.visible_paragraphs(), 3);
        assert!(r.pending_gate().is_none());
    }

    #[test]
    fn highlight_spans_inline_markup_and_persists() {
        let fx = Fixture::new();
        let mut r = fx.reader(20);
        r.toggle_anchor();
        r.word_forward();
        r.word_forward();
        r.move_left();
        assert!(r.highlight(&fx.highlights, HighlightColor::Evidence).is_applied());
        assert!(r.anchor().is_none());
        let marks = r.passage().marks();
        assert!(marks.iter().any(|m| m.text.contains("bold")));

        let reopened = fx.reader(20);
        assert_eq!(reopened.passage().marks().len(), marks.len());

        let mut r = reopened;
        r.toggle_anchor();
        r.line_end();
        assert_eq!(r.clear(&fx.highlights), 1);
        assert!(r.passage().marks().is_empty());
    }

    #[test]
    fn highlight_without_selection_is_ignored() {
        let fx = Fixture::new();
        let mut r = fx.reader(20);
        assert!(!r.highlight(&fx.highlights, HighlightColor::Main).is_applied());
    }

    #[test]
    fn word_under_cursor() {
        let fx = Fixture::new();
        let mut r = fx.reader(20);
        assert_eq!(r.word_at_cursor().as_deref(), Some("First"));
        r.word_forward();
        assert_eq!(r.word_at_cursor().as_deref(), Some("bold"));
        r.line_end();
        assert_eq!(r.word_at_cursor(), None);
    }

    #[test]
    fn choose_and_paraphrase() {
        let fx = Fixture::new();
        let mut r = fx.reader(20);
        let mut xp = fx.xp();

        let outcome = r.choose(&mut xp, 1).unwrap();
        assert!(outcome.correct);
        assert_eq!(r.passage_score(), (1, 2));

        r.next_question();
        assert!(!r.current_answer_mut().unwrap().paste("copied"));
        assert!(fx.alert.get());
        for ch in "I rewrote it.".chars() {
            r.current_answer_mut().unwrap().insert(ch);
        }
        assert!(r.submit_answer(&mut xp).is_some());
        assert!(r.current_answer_mut().is_none());
        assert_eq!(xp.xp(), 15 + 30);
    }
}
