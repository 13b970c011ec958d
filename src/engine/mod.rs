pub mod analytics;
pub mod scoring;
pub mod xp;

pub use analytics::{MasteryBand, QuestionIndex, SkillCategory, SkillDashboard, SkillStats};
pub use xp::{XpAward, XpState, XpTracker};
