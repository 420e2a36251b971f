//! "What could fit" shot suggestions against the remaining budget (PRD-26).
//!
//! Advisory only: the scorer reads the remaining-budget figure and the rate
//! card and never mutates the draft.

use serde::Serialize;

use crate::budget::round2;
use crate::catalog::RateCard;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum number of suggestions returned.
pub const MAX_SUGGESTIONS: usize = 5;

/// Category label used for the fixed line-item candidates.
pub const SUGGESTION_CATEGORY_SERVICE: &str = "service";

/// Fixed line-item candidates offered alongside rate card items.
pub const LINE_ITEM_CANDIDATES: &[(&str, f64)] = &[
    ("Additional Editing", 4.0),
    ("Creative Direction", 6.0),
    ("Pre-Production", 8.0),
];

// ---------------------------------------------------------------------------
// Scoring weights
// ---------------------------------------------------------------------------

/// Category weight applied to a candidate's total fitting hours.
///
/// Post and animation work soak up leftover budget with the least
/// coordination overhead, so they rank above plain scene or material shots.
pub fn category_weight(category: &str) -> f64 {
    match category {
        "post" => 3.0,
        "animation" => 2.0,
        "service" => 2.0,
        _ => 1.0,
    }
}

// ---------------------------------------------------------------------------
// Suggestion
// ---------------------------------------------------------------------------

/// One ranked suggestion for spending the remaining budget.
#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub name: String,
    pub category: String,
    pub hours_each: f64,
    /// How many units fit in the remaining budget.
    pub quantity: u32,
    pub total_hours: f64,
    pub score: f64,
}

// ---------------------------------------------------------------------------
// Scorer
// ---------------------------------------------------------------------------

/// Rank what could still fit in `remaining` hours: every priced rate card
/// item plus the fixed service line items, scored by fitting hours times
/// category weight. Returns at most [`MAX_SUGGESTIONS`], best first; empty
/// when there is no budget left to spend.
pub fn build_suggestions(remaining: Option<f64>, card: &RateCard) -> Vec<Suggestion> {
    let remaining = match remaining {
        Some(r) if r > 0.0 => r,
        _ => return Vec::new(),
    };

    let mut suggestions: Vec<Suggestion> = Vec::new();

    for item in card.items() {
        if item.hours <= 0.0 {
            continue;
        }
        push_candidate(
            &mut suggestions,
            remaining,
            &item.shot_type,
            item.category.as_str(),
            item.hours,
        );
    }
    for &(name, hours) in LINE_ITEM_CANDIDATES {
        push_candidate(
            &mut suggestions,
            remaining,
            name,
            SUGGESTION_CATEGORY_SERVICE,
            hours,
        );
    }

    suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

fn push_candidate(
    suggestions: &mut Vec<Suggestion>,
    remaining: f64,
    name: &str,
    category: &str,
    hours_each: f64,
) {
    let quantity = (remaining / hours_each).floor();
    if quantity < 1.0 {
        return;
    }
    let quantity = quantity as u32;
    let total_hours = round2(quantity as f64 * hours_each);
    suggestions.push(Suggestion {
        name: name.to_string(),
        category: category.to_string(),
        hours_each,
        quantity,
        total_hours,
        score: total_hours * category_weight(category),
    });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
