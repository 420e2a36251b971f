//! Version draft boundary records (PRD-21).
//!
//! Hydration inputs, template records, and the persistence payload. All
//! string-to-number coercion from HTML-origin payloads happens here, in a
//! single normalization step; the calculation modules only ever see clean
//! numeric fields.

use serde::{Deserialize, Deserializer, Serialize};

use crate::budget::{MAX_DURATION_SECS, MIN_DURATION_SECS};
use crate::companion::AnimationComplexity;
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Lenient numeric coercion
// ---------------------------------------------------------------------------

/// A numeric field that may arrive as a number or an HTML-input string.
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Num(f64),
    Str(String),
}

impl LenientNumber {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            Self::Num(v) => Ok(v),
            Self::Str(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return Ok(0.0);
                }
                s.parse()
                    .map_err(|_| E::custom(format!("invalid numeric string: '{s}'")))
            }
        }
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Option::<LenientNumber>::deserialize(deserializer)? {
        Some(n) => n.into_f64(),
        None => Ok(0.0),
    }
}

/// Missing, null, and empty quantities normalize to 0 — never 1. A freshly
/// added shot legitimately has quantity 0 before its first distribution
/// pass, and that 0 must survive a round trip.
fn lenient_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = match Option::<LenientNumber>::deserialize(deserializer)? {
        Some(n) => n.into_f64()?,
        None => 0.0,
    };
    if value.is_finite() && value > 0.0 {
        Ok(value.floor() as u32)
    } else {
        Ok(0)
    }
}

/// Efficiency is the one numeric where "absent" means neutral, not zero.
fn lenient_efficiency<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Option::<LenientNumber>::deserialize(deserializer)? {
        Some(LenientNumber::Str(s)) if s.trim().is_empty() => Ok(1.0),
        Some(n) => n.into_f64(),
        None => Ok(1.0),
    }
}

fn default_efficiency() -> f64 {
    1.0
}

// ---------------------------------------------------------------------------
// Hydration records
// ---------------------------------------------------------------------------

/// One persisted shot row, as returned by the version store.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionShotRecord {
    pub shot_type: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub percentage: f64,
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub base_hours_each: f64,
    #[serde(default = "default_efficiency", deserialize_with = "lenient_efficiency")]
    pub efficiency_multiplier: f64,
    /// Stored derived value; the builder recomputes it and only uses this
    /// field for interoperability with older payload shapes.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub adjusted_hours: f64,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub is_companion: bool,
    #[serde(default)]
    pub animation_override: Option<AnimationComplexity>,
}

/// A persisted quote version, as returned by the version store.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionRecord {
    #[serde(default)]
    pub id: Option<DbId>,
    pub duration_seconds: i32,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub shots: Vec<VersionShotRecord>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Template records
// ---------------------------------------------------------------------------

/// Maximum length of a template name.
pub const MAX_TEMPLATE_NAME_LEN: usize = 200;

/// One shot row in a stored template. Templates carry percentages, never
/// absolute quantities; quantities are derived at application time against
/// the applying session's target count.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateShotRecord {
    pub shot_type: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub percentage: f64,
    #[serde(default = "default_efficiency", deserialize_with = "lenient_efficiency")]
    pub efficiency_multiplier: f64,
    #[serde(default)]
    pub sort_order: i32,
}

/// A stored shot-breakdown template.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateRecord {
    pub name: String,
    pub duration_seconds: i32,
    #[serde(default)]
    pub shots: Vec<TemplateShotRecord>,
}

/// Validate a template before it is written to the store.
///
/// The builder clamps whatever it is handed; rejection belongs at the
/// persistence boundary, and this is the check the CRUD layer runs there.
pub fn validate_template(template: &TemplateRecord) -> Result<(), CoreError> {
    if template.name.is_empty() {
        return Err(CoreError::Validation(
            "Template name must not be empty".to_string(),
        ));
    }
    if template.name.len() > MAX_TEMPLATE_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Template name too long: {} chars (max {MAX_TEMPLATE_NAME_LEN})",
            template.name.len()
        )));
    }
    if template.duration_seconds < MIN_DURATION_SECS || template.duration_seconds > MAX_DURATION_SECS
    {
        return Err(CoreError::Validation(format!(
            "Template duration must be between {MIN_DURATION_SECS} and {MAX_DURATION_SECS} seconds, got {}",
            template.duration_seconds
        )));
    }
    for shot in &template.shots {
        if !(0.0..=100.0).contains(&shot.percentage) {
            return Err(CoreError::Validation(format!(
                "Template shot '{}' percentage must be between 0 and 100, got {}",
                shot.shot_type, shot.percentage
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Persistence payload
// ---------------------------------------------------------------------------

/// One shot row in the persistence payload. Derived numeric fields are
/// rounded to 2 decimal places before serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShotPayload {
    pub shot_type: String,
    pub quantity: u32,
    pub base_hours_each: f64,
    pub efficiency_multiplier: f64,
    pub adjusted_hours: f64,
    pub sort_order: i32,
}

/// The payload a finished editing session hands to the version store.
#[derive(Debug, Clone, Serialize)]
pub struct VersionPayload {
    pub duration_seconds: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub shots: Vec<ShotPayload>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- Lenient coercion --

    #[test]
    fn shot_record_accepts_string_numerics() {
        let record: VersionShotRecord = serde_json::from_value(json!({
            "shot_type": "Wide",
            "percentage": "45.5",
            "quantity": "3",
            "base_hours_each": "2.25",
            "efficiency_multiplier": "1.5"
        }))
        .unwrap();

        assert!((record.percentage - 45.5).abs() < f64::EPSILON);
        assert_eq!(record.quantity, 3);
        assert!((record.base_hours_each - 2.25).abs() < f64::EPSILON);
        assert!((record.efficiency_multiplier - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_quantity_defaults_to_zero_not_one() {
        let record: VersionShotRecord =
            serde_json::from_value(json!({ "shot_type": "Wide" })).unwrap();
        assert_eq!(record.quantity, 0);
    }

    #[test]
    fn null_and_empty_quantity_default_to_zero() {
        let record: VersionShotRecord =
            serde_json::from_value(json!({ "shot_type": "Wide", "quantity": null })).unwrap();
        assert_eq!(record.quantity, 0);

        let record: VersionShotRecord =
            serde_json::from_value(json!({ "shot_type": "Wide", "quantity": "" })).unwrap();
        assert_eq!(record.quantity, 0);
    }

    #[test]
    fn explicit_zero_quantity_is_preserved() {
        let record: VersionShotRecord =
            serde_json::from_value(json!({ "shot_type": "Wide", "quantity": 0 })).unwrap();
        assert_eq!(record.quantity, 0);
    }

    #[test]
    fn negative_quantity_normalizes_to_zero() {
        let record: VersionShotRecord =
            serde_json::from_value(json!({ "shot_type": "Wide", "quantity": -4 })).unwrap();
        assert_eq!(record.quantity, 0);
    }

    #[test]
    fn missing_efficiency_defaults_to_neutral() {
        let record: VersionShotRecord =
            serde_json::from_value(json!({ "shot_type": "Wide" })).unwrap();
        assert!((record.efficiency_multiplier - 1.0).abs() < f64::EPSILON);

        let record: VersionShotRecord =
            serde_json::from_value(json!({ "shot_type": "Wide", "efficiency_multiplier": "" }))
                .unwrap();
        assert!((record.efficiency_multiplier - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn garbage_numeric_string_is_rejected() {
        let result: Result<VersionShotRecord, _> =
            serde_json::from_value(json!({ "shot_type": "Wide", "percentage": "lots" }));
        assert!(result.is_err());
    }

    #[test]
    fn version_record_minimal_shape() {
        let record: VersionRecord = serde_json::from_value(json!({
            "duration_seconds": 90,
            "shots": [{ "shot_type": "Wide", "is_companion": false }]
        }))
        .unwrap();
        assert_eq!(record.duration_seconds, 90);
        assert!(record.id.is_none());
        assert!(record.notes.is_none());
        assert_eq!(record.shots.len(), 1);
    }

    #[test]
    fn animation_override_parses_from_snake_case() {
        let record: VersionShotRecord = serde_json::from_value(json!({
            "shot_type": "Wide",
            "animation_override": "complex"
        }))
        .unwrap();
        assert_eq!(record.animation_override, Some(AnimationComplexity::Complex));
    }

    // -- Template validation --

    fn template(name: &str, duration: i32, percentage: f64) -> TemplateRecord {
        TemplateRecord {
            name: name.to_string(),
            duration_seconds: duration,
            shots: vec![TemplateShotRecord {
                shot_type: "Wide".to_string(),
                percentage,
                efficiency_multiplier: 1.0,
                sort_order: 0,
            }],
        }
    }

    #[test]
    fn template_valid() {
        assert!(validate_template(&template("Commercial 60s", 60, 40.0)).is_ok());
    }

    #[test]
    fn template_empty_name_rejected() {
        assert!(validate_template(&template("", 60, 40.0)).is_err());
    }

    #[test]
    fn template_long_name_rejected() {
        let name = "x".repeat(MAX_TEMPLATE_NAME_LEN + 1);
        assert!(validate_template(&template(&name, 60, 40.0)).is_err());
    }

    #[test]
    fn template_duration_out_of_range_rejected() {
        assert!(validate_template(&template("T", 0, 40.0)).is_err());
        assert!(validate_template(&template("T", 601, 40.0)).is_err());
    }

    #[test]
    fn template_percentage_out_of_range_rejected() {
        assert!(validate_template(&template("T", 60, 120.0)).is_err());
        assert!(validate_template(&template("T", 60, -1.0)).is_err());
    }

    // -- Payload serialization --

    #[test]
    fn payload_omits_absent_notes() {
        let payload = VersionPayload {
            duration_seconds: 60,
            notes: None,
            shots: vec![],
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("notes").is_none());
    }
}
