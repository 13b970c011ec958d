use std::time::Duration;

/// Scaffolding for a week, by how far into the curriculum it sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseConfig {
    pub show_hint_box: bool,
    pub timer: Option<Duration>,
}

impl PhaseConfig {
    pub fn name(&self) -> &'static str {
        if self.show_hint_box { "Foundation" } else { "Precision" }
    }
}

pub const EXAM_PHASE_NAME: &str = "Exam Simulation";

/// Weeks 1-17 show hints; 18-35 drop them; 36 onward also run an hour timer.
pub fn phase_for_week(week_id: u32) -> PhaseConfig {
    match week_id {
        0..=17 => PhaseConfig {
            show_hint_box: true,
            timer: None,
        },
        18..=35 => PhaseConfig {
            show_hint_box: false,
            timer: None,
        },
        _ => PhaseConfig {
            show_hint_box: false,
            timer: Some(Duration::from_secs(60 * 60)),
        },
    }
}

/// Exam mode hides hints and forces its own countdown whatever the phase.
pub fn exam_config(exam_minutes: u64) -> PhaseConfig {
    PhaseConfig {
        show_hint_box: false,
        timer: Some(Duration::from_secs(exam_minutes * 60)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_boundaries() {
        assert!(phase_for_week(1).show_hint_box);
        assert!(phase_for_week(17).show_hint_box);
        assert!(!phase_for_week(18).show_hint_box);
        assert_eq!(phase_for_week(35).timer, None);
        assert_eq!(phase_for_week(36).timer, Some(Duration::from_secs(3600)));
        assert_eq!(phase_for_week(17).name(), "Foundation");
        assert_eq!(phase_for_week(20).name(), "Precision");
    }

    #[test]
    fn exam_overrides_phase() {
        let exam = exam_config(10);
        assert!(!exam.show_hint_box);
        assert_eq!(exam.timer, Some(Duration::from_secs(600)));
    }
}
