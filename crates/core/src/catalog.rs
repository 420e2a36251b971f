//! Rate card catalog: shot types, categories, and card-level rates (PRD-14).
//!
//! The rate card is owned by the surrounding CRUD layer and supplied to the
//! engine per session; the engine never mutates it. Shot type lookup is
//! case-insensitive.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Card-level rate defaults
// ---------------------------------------------------------------------------

/// Default average shot length used to derive a module's target shot count.
pub const DEFAULT_SECONDS_PER_SHOT: f64 = 5.0;

// ---------------------------------------------------------------------------
// Shot category
// ---------------------------------------------------------------------------

/// All valid shot category values, as stored on rate card rows.
pub const VALID_SHOT_CATEGORIES: &[&str] = &["scene", "animation", "post", "material"];

/// Category of a rate card item.
///
/// `Scene` shots imply a matching animation pass (see the companion
/// synchronizer); `Animation` shots are excluded from that derivation to
/// avoid double-counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotCategory {
    Scene,
    Animation,
    Post,
    Material,
}

impl ShotCategory {
    /// Return the category name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scene => "scene",
            Self::Animation => "animation",
            Self::Post => "post",
            Self::Material => "material",
        }
    }

    /// Parse a category string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "scene" => Ok(Self::Scene),
            "animation" => Ok(Self::Animation),
            "post" => Ok(Self::Post),
            "material" => Ok(Self::Material),
            _ => Err(CoreError::Validation(format!(
                "Invalid shot category '{s}'. Must be one of: {}",
                VALID_SHOT_CATEGORIES.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Rate card item
// ---------------------------------------------------------------------------

/// One priced shot type on a rate card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateCardItem {
    pub shot_type: String,
    pub category: ShotCategory,
    pub hours: f64,
}

// ---------------------------------------------------------------------------
// Rate card
// ---------------------------------------------------------------------------

/// A rate card: priced shot types plus the card-level rates the budget math
/// runs on. Immutable within one calculation pass.
#[derive(Debug, Clone)]
pub struct RateCard {
    hours_per_second: f64,
    editing_hours_per_30s: f64,
    seconds_per_shot: f64,
    items: Vec<RateCardItem>,
    /// Lowercase shot_type -> index into `items`.
    index: HashMap<String, usize>,
}

impl RateCard {
    /// Build a rate card, validating rates and item uniqueness.
    ///
    /// Duplicate shot types (case-insensitive) are rejected with
    /// `CoreError::Conflict`; negative hours and non-positive rates with
    /// `CoreError::Validation`.
    pub fn new(
        hours_per_second: f64,
        editing_hours_per_30s: f64,
        seconds_per_shot: f64,
        items: Vec<RateCardItem>,
    ) -> Result<Self, CoreError> {
        if hours_per_second <= 0.0 {
            return Err(CoreError::Validation(format!(
                "hours_per_second must be positive, got {hours_per_second}"
            )));
        }
        if editing_hours_per_30s < 0.0 {
            return Err(CoreError::Validation(format!(
                "editing_hours_per_30s must be non-negative, got {editing_hours_per_30s}"
            )));
        }
        if seconds_per_shot <= 0.0 {
            return Err(CoreError::Validation(format!(
                "seconds_per_shot must be positive, got {seconds_per_shot}"
            )));
        }

        let mut index = HashMap::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            if item.hours < 0.0 {
                return Err(CoreError::Validation(format!(
                    "Rate card item '{}' has negative hours: {}",
                    item.shot_type, item.hours
                )));
            }
            let key = item.shot_type.to_lowercase();
            if index.insert(key, i).is_some() {
                return Err(CoreError::Conflict(format!(
                    "Duplicate shot type on rate card: '{}'",
                    item.shot_type
                )));
            }
        }

        Ok(Self {
            hours_per_second,
            editing_hours_per_30s,
            seconds_per_shot,
            items,
            index,
        })
    }

    /// Build a card with the default average shot length.
    pub fn with_default_shot_length(
        hours_per_second: f64,
        editing_hours_per_30s: f64,
        items: Vec<RateCardItem>,
    ) -> Result<Self, CoreError> {
        Self::new(
            hours_per_second,
            editing_hours_per_30s,
            DEFAULT_SECONDS_PER_SHOT,
            items,
        )
    }

    pub fn hours_per_second(&self) -> f64 {
        self.hours_per_second
    }

    pub fn editing_hours_per_30s(&self) -> f64 {
        self.editing_hours_per_30s
    }

    pub fn seconds_per_shot(&self) -> f64 {
        self.seconds_per_shot
    }

    pub fn items(&self) -> &[RateCardItem] {
        &self.items
    }

    /// Look up an item by shot type, case-insensitively.
    pub fn find(&self, shot_type: &str) -> Option<&RateCardItem> {
        self.index
            .get(&shot_type.to_lowercase())
            .map(|&i| &self.items[i])
    }

    /// Category of a shot type, if the card prices it.
    pub fn category_of(&self, shot_type: &str) -> Option<ShotCategory> {
        self.find(shot_type).map(|item| item.category)
    }

    /// Base hours of a shot type, if the card prices it.
    pub fn base_hours_of(&self, shot_type: &str) -> Option<f64> {
        self.find(shot_type).map(|item| item.hours)
    }

    /// Target shot count for a module of the given duration: one shot per
    /// `seconds_per_shot` of film, any partial shot counting as a full one.
    /// Never less than 1 for a positive duration.
    pub fn target_shot_count(&self, duration_secs: i32) -> u32 {
        if duration_secs <= 0 {
            return 0;
        }
        let count = (duration_secs as f64 / self.seconds_per_shot).ceil() as u32;
        count.max(1)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
