pub mod blitz;
pub mod checkpoint;
pub mod countdown;
pub mod quiz;
pub mod review;

pub use blitz::{AnswerOutcome, BlitzGame, BlitzPhase, BlitzQuestion};
pub use checkpoint::{CheckpointGate, GateState};
pub use countdown::Countdown;
pub use quiz::{QuestionOutcome, QuizRewards, QuizSession};
pub use review::{ReviewItem, review_items};
