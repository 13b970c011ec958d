use crate::paraphrase::TextField;

/// A summary needs more than this many characters once trimmed.
pub const MIN_SUMMARY_CHARS: usize = 10;

pub const FAILURE_MESSAGE: &str = "Go back and re-read the paragraph, then try again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateState {
    /// No highlight in the guarded paragraph yet.
    Locked,
    Collapsed,
    Expanded,
    Failed,
    Unlocked,
}

/// Comprehension check between paragraphs. The reader must highlight
/// something in the paragraph above, then summarize it to continue.
#[derive(Clone, Debug)]
pub struct CheckpointGate {
    index: usize,
    expanded: bool,
    failed: bool,
    unlocked: bool,
    summary: TextField,
}

impl CheckpointGate {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            expanded: false,
            failed: false,
            unlocked: false,
            summary: TextField::new(""),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self, has_highlight: bool) -> GateState {
        if self.unlocked {
            GateState::Unlocked
        } else if !has_highlight {
            GateState::Locked
        } else if self.failed {
            GateState::Failed
        } else if self.expanded {
            GateState::Expanded
        } else {
            GateState::Collapsed
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn summary(&self) -> &TextField {
        &self.summary
    }

    pub fn summary_mut(&mut self) -> &mut TextField {
        &mut self.summary
    }

    pub fn summary_is_valid(&self) -> bool {
        self.summary.value().trim().chars().count() > MIN_SUMMARY_CHARS
    }

    pub fn expand(&mut self, has_highlight: bool) {
        if has_highlight && !self.unlocked {
            self.expanded = true;
        }
    }

    /// Unlocks when the summary is long enough; otherwise nothing happens.
    pub fn submit(&mut self, has_highlight: bool) -> bool {
        if self.state(has_highlight) != GateState::Expanded || !self.summary_is_valid() {
            return false;
        }
        self.unlocked = true;
        tracing::debug!(checkpoint = self.index, "checkpoint unlocked");
        true
    }

    pub fn give_up(&mut self) {
        if self.expanded && !self.unlocked {
            self.failed = true;
        }
    }

    /// Back to the collapsed prompt so the reader can re-read first.
    pub fn retry(&mut self) {
        self.expanded = false;
        self.failed = false;
    }
}
