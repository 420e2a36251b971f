//! Animation companion synchronization (PRD-23).
//!
//! Animation effort is never entered directly: each scene-category shot
//! implies a matching animation pass, surfaced as a single synthetic
//! "companion" row. The synchronizer strips any previous companion row and
//! recomputes it from scratch, so it is idempotent and safe to run after
//! every edit.

use serde::{Deserialize, Serialize};

use crate::budget::round2;
use crate::catalog::{RateCard, ShotCategory};
use crate::error::CoreError;
use crate::shot::BuilderShot;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Shot type name of the synthetic companion row.
pub const COMPANION_SHOT_TYPE: &str = "Animation Companion";

/// Animation hours implied per scene shot at regular complexity.
pub const REGULAR_HOURS_PER_UNIT: f64 = 16.0;

/// Animation hours implied per scene shot at complex complexity.
pub const COMPLEX_HOURS_PER_UNIT: f64 = 32.0;

/// All valid animation complexity values.
pub const VALID_ANIMATION_COMPLEXITIES: &[&str] = &["regular", "complex"];

// ---------------------------------------------------------------------------
// Complexity
// ---------------------------------------------------------------------------

/// Animation complexity, set per module with optional per-shot overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationComplexity {
    Regular,
    Complex,
}

impl AnimationComplexity {
    /// Return the complexity name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Complex => "complex",
        }
    }

    /// Parse a complexity string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "regular" => Ok(Self::Regular),
            "complex" => Ok(Self::Complex),
            _ => Err(CoreError::Validation(format!(
                "Invalid animation complexity '{s}'. Must be one of: {}",
                VALID_ANIMATION_COMPLEXITIES.join(", ")
            ))),
        }
    }

    /// Animation hours implied per scene shot at this complexity.
    pub fn hours_per_unit(&self) -> f64 {
        match self {
            Self::Regular => REGULAR_HOURS_PER_UNIT,
            Self::Complex => COMPLEX_HOURS_PER_UNIT,
        }
    }
}

impl Default for AnimationComplexity {
    fn default() -> Self {
        Self::Regular
    }
}

// ---------------------------------------------------------------------------
// Synchronizer
// ---------------------------------------------------------------------------

/// Strip any existing companion row and recompute it from the current
/// scene-shot quantities.
///
/// Only shots the card categorizes as `scene` feed the companion; unknown
/// shot types and `animation`-category shots are excluded so animation
/// effort is never counted twice. Each scene shot contributes at its own
/// override complexity, falling back to the module default. When the
/// contributing quantity sums to zero no companion row is appended at all.
///
/// The companion's `base_hours_each` is the 2-decimal rounding of the
/// weighted average, and its adjusted hours derive from that rounded value.
/// The hundredth-unit drift versus the raw total matches what a persisted
/// and reloaded row would show.
pub fn sync_companion(
    shots: Vec<BuilderShot>,
    module_complexity: AnimationComplexity,
    card: &RateCard,
) -> Vec<BuilderShot> {
    let mut shots: Vec<BuilderShot> = shots.into_iter().filter(|s| !s.is_companion).collect();

    let mut quantity: u32 = 0;
    let mut total_hours: f64 = 0.0;
    for shot in &shots {
        if card.category_of(&shot.shot_type) != Some(ShotCategory::Scene) {
            continue;
        }
        let complexity = shot.animation_override.unwrap_or(module_complexity);
        quantity += shot.quantity;
        total_hours += shot.quantity as f64 * complexity.hours_per_unit();
    }

    if quantity == 0 {
        return shots;
    }

    let base_hours_each = round2(total_hours / quantity as f64);
    shots.push(BuilderShot {
        shot_type: COMPANION_SHOT_TYPE.to_string(),
        quantity,
        base_hours_each,
        efficiency_multiplier: 1.0,
        percentage: 0.0,
        manual_override: false,
        selected: false,
        is_companion: true,
        animation_override: None,
    });
    shots
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
