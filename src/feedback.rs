use std::cell::RefCell;
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Correct,
    Incorrect,
    LevelUp,
}

/// Audible response to answers. Playback problems never surface to callers.
pub trait Feedback {
    fn play(&self, cue: Cue);
}

pub struct Silent;

impl Feedback for Silent {
    fn play(&self, _cue: Cue) {}
}

/// Rings the terminal bell: once for a wrong answer, twice for a level up.
pub struct TerminalBell<W: Write = io::Stdout> {
    out: RefCell<W>,
}

impl TerminalBell {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out: RefCell::new(out) }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write> Feedback for TerminalBell<W> {
    fn play(&self, cue: Cue) {
        let rings: &[u8] = match cue {
            Cue::Correct => return,
            Cue::Incorrect => b"\x07",
            Cue::LevelUp => b"\x07\x07",
        };
        let mut out = self.out.borrow_mut();
        let rung = out.write_all(rings);
        if let Err(e) = rung.and_then(|()| out.flush()) {
            tracing::debug!(error = %e, "terminal bell failed");
        }
    }
}
