//! Flat line item additions outside the shot/percentage model (PRD-25).

use serde::{Deserialize, Serialize};

use crate::budget::round2;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minimum line item quantity.
pub const MIN_LINE_ITEM_QUANTITY: u32 = 1;

/// Maximum line item quantity.
pub const MAX_LINE_ITEM_QUANTITY: u32 = 999;

/// All valid line item category values.
pub const VALID_LINE_ITEM_CATEGORIES: &[&str] = &["service", "deliverable", "pre_production"];

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Category of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemCategory {
    Service,
    Deliverable,
    PreProduction,
}

impl LineItemCategory {
    /// Return the category name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Deliverable => "deliverable",
            Self::PreProduction => "pre_production",
        }
    }

    /// Parse a category string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "service" => Ok(Self::Service),
            "deliverable" => Ok(Self::Deliverable),
            "pre_production" => Ok(Self::PreProduction),
            _ => Err(CoreError::Validation(format!(
                "Invalid line item category '{s}'. Must be one of: {}",
                VALID_LINE_ITEM_CATEGORIES.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Line item
// ---------------------------------------------------------------------------

/// A flat addition to a version draft: services, deliverables, or
/// pre-production work billed outside the shot breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuilderLineItem {
    pub name: String,
    pub category: LineItemCategory,
    pub hours_each: f64,
    pub quantity: u32,
    pub notes: Option<String>,
}

impl BuilderLineItem {
    /// Build a line item, clamping hours to non-negative and quantity into
    /// `[MIN_LINE_ITEM_QUANTITY, MAX_LINE_ITEM_QUANTITY]`.
    pub fn new(
        name: impl Into<String>,
        category: LineItemCategory,
        hours_each: f64,
        quantity: u32,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            hours_each: hours_each.max(0.0),
            quantity: quantity.clamp(MIN_LINE_ITEM_QUANTITY, MAX_LINE_ITEM_QUANTITY),
            notes: None,
        }
    }

    /// Total hours this line item contributes.
    pub fn total_hours(&self) -> f64 {
        round2(self.hours_each * self.quantity as f64)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
