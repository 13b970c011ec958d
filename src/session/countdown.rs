use std::time::Duration;

/// One-second-resolution countdown driven by elapsed time from the event loop.
///
/// The owner advances it on every tick and must `cancel` it on every exit
/// path; a cancelled countdown ignores further ticks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Countdown {
    remaining_secs: u64,
    carry: Duration,
    running: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    Idle,
    Running(u64),
    Expired,
}

impl Countdown {
    pub fn start(total: Duration) -> Self {
        Self {
            remaining_secs: total.as_secs(),
            carry: Duration::ZERO,
            running: total.as_secs() > 0,
        }
    }

    pub fn stopped() -> Self {
        Self {
            remaining_secs: 0,
            carry: Duration::ZERO,
            running: false,
        }
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn cancel(&mut self) {
        self.running = false;
        self.carry = Duration::ZERO;
    }

    /// `Expired` is reported once, on the tick that reaches zero.
    pub fn advance(&mut self, elapsed: Duration) -> Tick {
        if !self.running {
            return Tick::Idle;
        }
        self.carry += elapsed;
        let whole = self.carry.as_secs();
        self.carry -= Duration::from_secs(whole);
        self.remaining_secs = self.remaining_secs.saturating_sub(whole);
        if self.remaining_secs == 0 {
            self.cancel();
            Tick::Expired
        } else {
            Tick::Running(self.remaining_secs)
        }
    }

    /// `m:ss`, or `h:mm:ss` from an hour up.
    pub fn display(&self) -> String {
        let secs = self.remaining_secs;
        if secs >= 3600 {
            format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
        } else {
            format!("{}:{:02}", secs / 60, secs % 60)
        }
    }
}
