use thiserror::Error;

pub const DEFAULT_MIN_WORDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Must start with a capital letter.")]
    MissingCapital,
    #[error("Minimum {min} words required.")]
    TooFewWords { min: usize, found: usize },
    #[error("Must end with a period, question mark, or exclamation point.")]
    MissingPunctuation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// Nothing typed yet: no error shown, submit disabled.
    Empty,
    Invalid(ValidationError),
    Valid,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            Validation::Invalid(e) => Some(e),
            _ => None,
        }
    }
}

/// Whitespace-delimited word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Check the structural rules in order: capital first, then length, then
/// terminal punctuation. Only the first failure is reported.
pub fn validate(text: &str, min_words: usize) -> Validation {
    if text.is_empty() {
        return Validation::Empty;
    }
    if !text.starts_with(|c: char| c.is_ascii_uppercase()) {
        return Validation::Invalid(ValidationError::MissingCapital);
    }
    let found = word_count(text);
    if found < min_words {
        return Validation::Invalid(ValidationError::TooFewWords {
            min: min_words,
            found,
        });
    }
    if !text.trim().ends_with(['.', '!', '?']) {
        return Validation::Invalid(ValidationError::MissingPunctuation);
    }
    Validation::Valid
}

/// Single-line text with a char-indexed cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextField {
    text: String,
    /// Cursor position as a char index (0 = before first char).
    cursor: usize,
}

impl TextField {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    /// Returns (before_cursor, cursor_char, after_cursor) for styled rendering.
    pub fn render_parts(&self) -> (&str, Option<char>, &str) {
        let byte_offset = self.char_to_byte(self.cursor);
        match self.text[byte_offset..].chars().next() {
            Some(ch) => {
                let next_byte = byte_offset + ch.len_utf8();
                (&self.text[..byte_offset], Some(ch), &self.text[next_byte..])
            }
            None => (&self.text, None, ""),
        }
    }

    pub fn insert(&mut self, ch: char) {
        let byte_offset = self.char_to_byte(self.cursor);
        self.text.insert(byte_offset, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = self.char_to_byte(self.cursor - 1);
        let end = self.char_to_byte(self.cursor);
        self.text.replace_range(start..end, "");
        self.cursor -= 1;
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.len() {
            return;
        }
        let start = self.char_to_byte(self.cursor);
        let end = self.char_to_byte(self.cursor + 1);
        self.text.replace_range(start..end, "");
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.len();
    }

    /// Unix word rubout: skip whitespace, then non-whitespace.
    pub fn delete_word_back(&mut self) {
        let chars: Vec<char> = self.text.chars().collect();
        let mut pos = self.cursor;
        while pos > 0 && chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        while pos > 0 && !chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        let start = self.char_to_byte(pos);
        let end = self.char_to_byte(self.cursor);
        self.text.replace_range(start..end, "");
        self.cursor = pos;
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }
}

type PasteHook = Box<dyn FnMut()>;
type SubmitHook = Box<dyn FnMut(&str)>;

/// The answer box. Typing goes through `field_mut`; pasted text never lands.
pub struct AnswerBuffer {
    field: TextField,
    min_words: usize,
    on_paste: Option<PasteHook>,
    on_submit: Option<SubmitHook>,
}

impl AnswerBuffer {
    pub fn new(min_words: usize) -> Self {
        Self {
            field: TextField::default(),
            min_words,
            on_paste: None,
            on_submit: None,
        }
    }

    pub fn on_paste(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_paste = Some(Box::new(hook));
        self
    }

    pub fn on_submit(mut self, hook: impl FnMut(&str) + 'static) -> Self {
        self.on_submit = Some(Box::new(hook));
        self
    }

    pub fn text(&self) -> &str {
        self.field.value()
    }

    pub fn field(&self) -> &TextField {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut TextField {
        &mut self.field
    }

    pub fn min_words(&self) -> usize {
        self.min_words
    }

    pub fn word_count(&self) -> usize {
        word_count(self.field.value())
    }

    pub fn validation(&self) -> Validation {
        validate(self.field.value(), self.min_words)
    }

    pub fn insert(&mut self, ch: char) {
        self.field.insert(ch);
    }

    pub fn backspace(&mut self) {
        self.field.backspace();
    }

    /// Pasting is refused: the content is dropped and the paste hook fires.
    /// Always returns false.
    pub fn paste(&mut self, _content: &str) -> bool {
        tracing::debug!("paste into answer box rejected");
        if let Some(hook) = self.on_paste.as_mut() {
            hook();
        }
        false
    }

    /// Hand back the text and clear the box, but only when it validates.
    pub fn submit(&mut self) -> Option<String> {
        if !self.validation().is_valid() {
            return None;
        }
        let text = self.field.value().to_string();
        self.field.clear();
        if let Some(hook) = self.on_submit.as_mut() {
            hook(&text);
        }
        Some(text)
    }
}
