pub const DAILY_GOAL_XP: u64 = 100;

/// `floor(sqrt(xp / 100)) + 1`: level 1 covers 0..=99, level 2 covers
/// 100..=399, level 3 covers 400..=899.
pub fn level_from_xp(xp: u64) -> u32 {
    // Integer square root avoids float rounding right at the thresholds.
    let mut root = ((xp / 100) as f64).sqrt() as u64;
    while root * root > xp / 100 {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= xp / 100 {
        root += 1;
    }
    root as u32 + 1
}

/// Minimum cumulative XP for `level`.
pub fn xp_for_level(level: u32) -> u64 {
    let steps = level.saturating_sub(1) as u64;
    steps.saturating_mul(steps).saturating_mul(100)
}

pub fn xp_to_next_level(xp: u64) -> u64 {
    xp_for_level(level_from_xp(xp) + 1).saturating_sub(xp)
}

/// Fraction of the way through the current level, in `0.0..1.0`.
pub fn level_progress(xp: u64) -> f64 {
    let level = level_from_xp(xp);
    let floor = xp_for_level(level);
    let span = xp_for_level(level + 1) - floor;
    if span == 0 {
        return 1.0;
    }
    (xp - floor) as f64 / span as f64
}

/// Daily goal bar fill. Display only; nothing is gated on it.
pub fn daily_progress(daily_xp: u64, goal: u64) -> f64 {
    if goal == 0 {
        return 1.0;
    }
    (daily_xp as f64 / goal as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_starts_at_one() {
        assert_eq!(level_from_xp(0), 1);
    }

    #[test]
    fn test_level_thresholds_are_quadratic() {
        assert_eq!(level_from_xp(99), 1);
        assert_eq!(level_from_xp(100), 2);
        assert_eq!(level_from_xp(399), 2);
        assert_eq!(level_from_xp(400), 3);
        assert_eq!(level_from_xp(899), 3);
        assert_eq!(level_from_xp(900), 4);
    }

    #[test]
    fn test_level_matches_threshold_table() {
        for level in 1..60 {
            let floor = xp_for_level(level);
            assert_eq!(level_from_xp(floor), level);
            if floor > 0 {
                assert_eq!(level_from_xp(floor - 1), level - 1);
            }
        }
    }

    #[test]
    fn test_xp_to_next_level() {
        assert_eq!(xp_to_next_level(0), 100);
        assert_eq!(xp_to_next_level(150), 250);
    }

    #[test]
    fn test_level_progress_midway() {
        assert!((level_progress(250) - 0.5).abs() < 1e-9);
        assert_eq!(level_progress(0), 0.0);
    }

    #[test]
    fn test_daily_progress_caps_at_full() {
        assert_eq!(daily_progress(50, DAILY_GOAL_XP), 0.5);
        assert_eq!(daily_progress(250, DAILY_GOAL_XP), 1.0);
        assert_eq!(daily_progress(10, 0), 1.0);
    }

    #[test]
    fn test_level_math_holds_at_max_xp() {
        let level = level_from_xp(u64::MAX);
        assert_eq!(level, 429_496_730);
        assert_eq!(xp_for_level(level + 1), u64::MAX);
        assert!(xp_to_next_level(u64::MAX) == 0);
        let progress = level_progress(u64::MAX);
        assert!((0.0..=1.0).contains(&progress));
    }
}
