//! Post-pass outcome scoring.

use crate::tables::{AGE_RESEARCH_SECS, TRAIN_INTERVAL_SECS};
use crate::world::Milestones;

/// Share of the score surrendered at 100% idle time.
const IDLE_PENALTY_WEIGHT: f64 = 0.25;

/// Fastest theoretically possible transition: uninterrupted villager
/// production straight to the target, then the advancement research.
pub fn baseline_transition_secs(starting_population: u32, target_population: u32) -> f64 {
    let trained = target_population.saturating_sub(starting_population) as f64;
    trained * TRAIN_INTERVAL_SECS + AGE_RESEARCH_SECS
}

/// Bounded efficiency score for a finished pass. A pass that never reached
/// the transition scores zero; a perfect pass approaches one.
pub fn efficiency_score(
    starting_population: u32,
    target_population: u32,
    milestones: &Milestones,
    idle_secs: f64,
) -> f64 {
    let Some(reached) = milestones.age_reached_secs else {
        return 0.0;
    };
    if reached <= 0.0 {
        return 0.0;
    }
    let baseline = baseline_transition_secs(starting_population, target_population);
    let pace = (baseline / reached).clamp(0.0, 1.0);
    let idle_share = (idle_secs / reached).clamp(0.0, 1.0);
    pace * (1.0 - IDLE_PENALTY_WEIGHT * idle_share)
}

/// Render a simulated-second stamp as mm:ss for the summary.
pub fn format_time(secs: f64) -> String {
    let total = secs.max(0.0).round() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reached(at: f64, idle: f64) -> (Milestones, f64) {
        (
            Milestones {
                age_click_secs: Some(at - AGE_RESEARCH_SECS),
                age_reached_secs: Some(at),
                age_click: None,
                age_reached: None,
            },
            idle,
        )
    }

    #[test]
    fn unfinished_passes_score_zero() {
        let score = efficiency_score(4, 21, &Milestones::default(), 0.0);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn score_stays_bounded() {
        let (milestones, idle) = reached(300.0, 0.0);
        // Faster than the theoretical floor still caps at one.
        let score = efficiency_score(4, 21, &milestones, idle);
        assert!(score <= 1.0 && score > 0.0);
    }

    #[test]
    fn idle_time_drags_the_score_down() {
        let (milestones, _) = reached(700.0, 0.0);
        let clean = efficiency_score(4, 21, &milestones, 0.0);
        let idle = efficiency_score(4, 21, &milestones, 200.0);
        assert!(idle < clean);
    }

    #[test]
    fn timestamps_format_as_minutes_and_seconds() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(61.4), "01:01");
        assert_eq!(format_time(754.0), "12:34");
    }
}
