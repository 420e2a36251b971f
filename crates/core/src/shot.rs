//! Draft shot rows inside a quote version (PRD-21).

use serde::Serialize;

use crate::budget::round2;
use crate::companion::AnimationComplexity;

/// One shot type in a version draft.
///
/// `base_hours_each` is copied from the rate card when the shot is added or
/// a template is applied; it does not track later rate card edits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuilderShot {
    pub shot_type: String,
    pub quantity: u32,
    pub base_hours_each: f64,
    pub efficiency_multiplier: f64,
    /// User-set target share of the total shot count, 0-100. Only meaningful
    /// for percentage-driven distribution.
    pub percentage: f64,
    /// Set once the quantity has been hand-edited; freezes the shot out of
    /// automatic redistribution until explicitly unlocked.
    pub manual_override: bool,
    /// Transient UI selection state for batch efficiency edits.
    pub selected: bool,
    /// True for the single synthetic animation-companion row.
    pub is_companion: bool,
    /// Per-shot complexity override feeding the companion calculation;
    /// `None` falls back to the module-level default.
    pub animation_override: Option<AnimationComplexity>,
}

impl BuilderShot {
    /// A freshly added shot: zero quantity and percentage, neutral
    /// efficiency. The user sets a percentage or a manual quantity next.
    pub fn new(shot_type: impl Into<String>, base_hours_each: f64) -> Self {
        Self {
            shot_type: shot_type.into(),
            quantity: 0,
            base_hours_each,
            efficiency_multiplier: 1.0,
            percentage: 0.0,
            manual_override: false,
            selected: false,
            is_companion: false,
            animation_override: None,
        }
    }

    /// This shot's contribution to total hours:
    /// quantity x base hours x efficiency, at persisted precision.
    pub fn adjusted_hours(&self) -> f64 {
        round2(self.quantity as f64 * self.base_hours_each * self.efficiency_multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_shot_defaults() {
        let shot = BuilderShot::new("Wide", 3.0);
        assert_eq!(shot.quantity, 0);
        assert!((shot.percentage - 0.0).abs() < f64::EPSILON);
        assert!((shot.efficiency_multiplier - 1.0).abs() < f64::EPSILON);
        assert!(!shot.manual_override);
        assert!(!shot.is_companion);
        assert!(shot.animation_override.is_none());
    }

    #[test]
    fn adjusted_hours_is_quantity_times_base_times_efficiency() {
        let mut shot = BuilderShot::new("Wide", 3.0);
        shot.quantity = 4;
        shot.efficiency_multiplier = 1.5;
        assert!((shot.adjusted_hours() - 18.0).abs() < 1e-9);
    }

    #[test]
    fn adjusted_hours_zero_quantity_is_zero() {
        let shot = BuilderShot::new("Wide", 3.0);
        assert!((shot.adjusted_hours() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn adjusted_hours_rounds_to_pennies() {
        let mut shot = BuilderShot::new("Comp", 0.333);
        shot.quantity = 1;
        assert!((shot.adjusted_hours() - 0.33).abs() < 1e-9);
    }
}
