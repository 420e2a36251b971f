//! Quote version builder: the editing session for a version draft (PRD-21).
//!
//! One `QuoteBuilder` per open version-editing session. A draft enters
//! either empty ([`QuoteBuilder::new`]) or loaded from a persisted version
//! ([`QuoteBuilder::hydrate`]), mutates exclusively through the operations
//! here, and ends by producing a persistence payload for the external
//! version store. Every quantity-affecting operation re-runs the percentage
//! distributor and the companion synchronizer before returning, so callers
//! always observe a fully derived draft.
//!
//! Multi-film ("Add Film") quotes are the general case: a flat single-list
//! draft is a one-module session, and all distribution/companion logic
//! lives once, on the module.
//!
//! Out-of-range shot or module indices are caller programming errors and
//! panic via slice indexing; they are not recoverable runtime failures.

use serde::Serialize;
use uuid::Uuid;

use crate::budget::{
    clamp_duration, clamp_efficiency, clamp_percentage, editing_hours, pool_budget_hours,
    remaining_budget, round2, total_hours, total_shot_hours,
};
use crate::catalog::RateCard;
use crate::companion::{sync_companion, AnimationComplexity};
use crate::distribution::{distribute, DistributionShare};
use crate::line_items::BuilderLineItem;
use crate::payload::{
    ShotPayload, TemplateRecord, TemplateShotRecord, VersionPayload, VersionRecord,
    VersionShotRecord,
};
use crate::shot::BuilderShot;
use crate::suggestions::{build_suggestions, Suggestion};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Duration a fresh draft starts at.
pub const DEFAULT_MODULE_DURATION_SECS: i32 = 60;

/// Name given to the first film of a draft.
pub const DEFAULT_MODULE_NAME: &str = "Film 1";

// ---------------------------------------------------------------------------
// Module
// ---------------------------------------------------------------------------

/// One film inside a quote version draft, with its own duration, complexity
/// default, and shot breakdown.
#[derive(Debug, Clone)]
pub struct BuilderModule {
    pub id: Uuid,
    pub name: String,
    duration_secs: i32,
    animation_complexity: AnimationComplexity,
    shots: Vec<BuilderShot>,
}

impl BuilderModule {
    fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            duration_secs: DEFAULT_MODULE_DURATION_SECS,
            animation_complexity: AnimationComplexity::Regular,
            shots: Vec::new(),
        }
    }

    pub fn duration_secs(&self) -> i32 {
        self.duration_secs
    }

    pub fn animation_complexity(&self) -> AnimationComplexity {
        self.animation_complexity
    }

    pub fn shots(&self) -> &[BuilderShot] {
        &self.shots
    }

    /// Target shot count this module distributes percentages over.
    pub fn target_shot_count(&self, card: &RateCard) -> u32 {
        card.target_shot_count(self.duration_secs)
    }

    /// Sum of adjusted hours across this module's shots, companion included.
    pub fn shot_hours(&self) -> f64 {
        total_shot_hours(&self.shots)
    }

    /// Clamp and set the film duration.
    ///
    /// Quantities only move on explicit percentage edits; a duration change
    /// never rewrites the breakdown, manually tuned or not.
    pub fn set_duration(&mut self, duration_secs: i32) {
        self.duration_secs = clamp_duration(duration_secs);
    }

    /// Set one shot's target percentage and redistribute quantities across
    /// the shots that are not manually overridden.
    pub fn set_percentage(&mut self, index: usize, percentage: f64, card: &RateCard) {
        self.shots[index].percentage = clamp_percentage(percentage);
        self.redistribute(card);
        self.sync(card);
    }

    /// Hand-set one shot's quantity, freezing it out of redistribution.
    /// Quantity 0 is valid and preserved.
    pub fn update_quantity(&mut self, index: usize, quantity: i64, card: &RateCard) {
        let shot = &mut self.shots[index];
        shot.quantity = quantity.max(0) as u32;
        shot.manual_override = true;
        self.sync(card);
    }

    /// Clear a manual override; the shot's quantity snaps back to its
    /// percentage-implied automatic value immediately.
    pub fn unlock_manual_quantity(&mut self, index: usize, card: &RateCard) {
        self.shots[index].manual_override = false;
        self.redistribute(card);
        self.sync(card);
    }

    /// Set one shot's efficiency multiplier, clamped.
    pub fn update_efficiency(&mut self, index: usize, multiplier: f64) {
        self.shots[index].efficiency_multiplier = clamp_efficiency(multiplier);
    }

    /// Set the efficiency multiplier on several shots at once, clamped.
    pub fn batch_set_efficiency(&mut self, indices: &[usize], multiplier: f64) {
        let clamped = clamp_efficiency(multiplier);
        for &index in indices {
            self.shots[index].efficiency_multiplier = clamped;
        }
    }

    /// Append a new shot with zero quantity and percentage; the user sets a
    /// percentage or a manual quantity next.
    pub fn add_shot(&mut self, shot_type: &str, base_hours_each: f64) {
        self.shots.push(BuilderShot::new(shot_type, base_hours_each));
    }

    /// Remove a shot. The companion recomputes immediately, so removing a
    /// scene shot shrinks the implied animation pass.
    pub fn remove_shot(&mut self, index: usize, card: &RateCard) {
        self.shots.remove(index);
        self.sync(card);
    }

    /// Replace the shot breakdown with a template's, mapping each shot type
    /// through the rate card (unmatched types price at 0 hours). The current
    /// duration is preserved: a template changes the breakdown, never a
    /// duration the user already configured. Quantities derive from the
    /// current duration's target count, not the template's.
    pub fn apply_template(&mut self, template: &TemplateRecord, card: &RateCard) {
        let mut records: Vec<&TemplateShotRecord> = template.shots.iter().collect();
        records.sort_by_key(|record| record.sort_order);

        self.shots = records
            .into_iter()
            .map(|record| {
                let base_hours = card.base_hours_of(&record.shot_type).unwrap_or(0.0);
                let mut shot = BuilderShot::new(record.shot_type.clone(), base_hours);
                shot.percentage = clamp_percentage(record.percentage);
                shot.efficiency_multiplier = clamp_efficiency(record.efficiency_multiplier);
                shot
            })
            .collect();

        self.redistribute(card);
        self.sync(card);
    }

    /// Set the module-level complexity default and recompute the companion.
    pub fn set_animation_complexity(&mut self, complexity: AnimationComplexity, card: &RateCard) {
        self.animation_complexity = complexity;
        self.sync(card);
    }

    /// Set or clear one shot's complexity override and recompute the
    /// companion.
    pub fn set_animation_override(
        &mut self,
        index: usize,
        complexity: Option<AnimationComplexity>,
        card: &RateCard,
    ) {
        self.shots[index].animation_override = complexity;
        self.sync(card);
    }

    pub fn select_all(&mut self) {
        for shot in &mut self.shots {
            shot.selected = true;
        }
    }

    pub fn deselect_all(&mut self) {
        for shot in &mut self.shots {
            shot.selected = false;
        }
    }

    pub fn toggle_shot_selection(&mut self, index: usize) {
        self.shots[index].selected = !self.shots[index].selected;
    }

    /// Indices of the currently selected shots, for batch efficiency edits.
    pub fn selected_indices(&self) -> Vec<usize> {
        self.shots
            .iter()
            .enumerate()
            .filter(|(_, shot)| shot.selected)
            .map(|(i, _)| i)
            .collect()
    }

    /// Redistribute quantities over the automatic (non-overridden,
    /// non-companion) shots. Frozen quantities stay put but still consume
    /// their share of the module's target count.
    fn redistribute(&mut self, card: &RateCard) {
        let target = self.target_shot_count(card) as i64;
        let frozen: i64 = self
            .shots
            .iter()
            .filter(|shot| !shot.is_companion && shot.manual_override)
            .map(|shot| shot.quantity as i64)
            .sum();

        let automatic: Vec<usize> = self
            .shots
            .iter()
            .enumerate()
            .filter(|(_, shot)| !shot.is_companion && !shot.manual_override)
            .map(|(i, _)| i)
            .collect();
        let shares: Vec<DistributionShare> = automatic
            .iter()
            .map(|&i| DistributionShare {
                percentage: self.shots[i].percentage,
                base_hours_each: self.shots[i].base_hours_each,
            })
            .collect();

        let quantities = distribute(target - frozen, &shares);
        for (&i, &quantity) in automatic.iter().zip(quantities.iter()) {
            self.shots[i].quantity = quantity;
        }
    }

    fn sync(&mut self, card: &RateCard) {
        let shots = std::mem::take(&mut self.shots);
        self.shots = sync_companion(shots, self.animation_complexity, card);
    }
}

// ---------------------------------------------------------------------------
// Budget summary
// ---------------------------------------------------------------------------

/// Derived totals for a draft, recomputed on demand. Line item hours count
/// toward the consumed total, so suggestions that add line items visibly
/// spend budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetSummary {
    pub pool_budget_hours: f64,
    pub shot_hours: f64,
    pub editing_hours: f64,
    pub line_item_hours: f64,
    pub total_hours: f64,
    /// Negative means over-budget.
    pub remaining_hours: f64,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// The stateful editing session for one quote version draft.
#[derive(Debug, Clone)]
pub struct QuoteBuilder {
    card: RateCard,
    modules: Vec<BuilderModule>,
    line_items: Vec<BuilderLineItem>,
    notes: Option<String>,
}

impl QuoteBuilder {
    /// Start an empty draft: one film at the default duration, no shots.
    pub fn new(card: RateCard) -> Self {
        Self {
            card,
            modules: vec![BuilderModule::new(DEFAULT_MODULE_NAME)],
            line_items: Vec::new(),
            notes: None,
        }
    }

    /// Load a draft from a persisted version.
    ///
    /// Shots are normalized (clamps applied, rows ordered by sort_order) but
    /// not re-derived: a hydrated, untouched draft round-trips the persisted
    /// values, companion row included.
    pub fn hydrate(card: RateCard, record: &VersionRecord) -> Self {
        let mut module = BuilderModule::new(DEFAULT_MODULE_NAME);
        module.duration_secs = clamp_duration(record.duration_seconds);

        let mut rows: Vec<&VersionShotRecord> = record.shots.iter().collect();
        rows.sort_by_key(|row| row.sort_order);
        module.shots = rows
            .into_iter()
            .map(|row| BuilderShot {
                shot_type: row.shot_type.clone(),
                quantity: row.quantity,
                base_hours_each: row.base_hours_each.max(0.0),
                efficiency_multiplier: clamp_efficiency(row.efficiency_multiplier),
                percentage: clamp_percentage(row.percentage),
                manual_override: false,
                selected: false,
                is_companion: row.is_companion,
                animation_override: row.animation_override,
            })
            .collect();

        tracing::debug!(
            version_id = ?record.id,
            duration_secs = module.duration_secs,
            shot_count = module.shots.len(),
            "Hydrated quote version draft",
        );

        Self {
            card,
            modules: vec![module],
            line_items: Vec::new(),
            notes: record.notes.clone(),
        }
    }

    pub fn card(&self) -> &RateCard {
        &self.card
    }

    pub fn modules(&self) -> &[BuilderModule] {
        &self.modules
    }

    pub fn line_items(&self) -> &[BuilderLineItem] {
        &self.line_items
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
    }

    // -- Films ("Add Film" mode) --

    /// Add a film at the default duration. Returns its id.
    pub fn add_module(&mut self, name: &str) -> Uuid {
        let module = BuilderModule::new(name);
        let id = module.id;
        self.modules.push(module);
        id
    }

    pub fn remove_module(&mut self, module: usize) {
        self.modules.remove(module);
    }

    // -- Shot operations, delegated to the addressed film --

    pub fn set_duration(&mut self, module: usize, duration_secs: i32) {
        self.modules[module].set_duration(duration_secs);
    }

    pub fn set_percentage(&mut self, module: usize, shot: usize, percentage: f64) {
        self.modules[module].set_percentage(shot, percentage, &self.card);
    }

    pub fn update_quantity(&mut self, module: usize, shot: usize, quantity: i64) {
        self.modules[module].update_quantity(shot, quantity, &self.card);
    }

    pub fn unlock_manual_quantity(&mut self, module: usize, shot: usize) {
        self.modules[module].unlock_manual_quantity(shot, &self.card);
    }

    pub fn update_efficiency(&mut self, module: usize, shot: usize, multiplier: f64) {
        self.modules[module].update_efficiency(shot, multiplier);
    }

    pub fn batch_set_efficiency(&mut self, module: usize, indices: &[usize], multiplier: f64) {
        self.modules[module].batch_set_efficiency(indices, multiplier);
    }

    /// Add a shot, copying its base hours from the rate card at add time.
    /// Later rate card edits do not flow back into existing drafts.
    pub fn add_shot(&mut self, module: usize, shot_type: &str) {
        let base_hours = self.card.base_hours_of(shot_type).unwrap_or(0.0);
        self.modules[module].add_shot(shot_type, base_hours);
    }

    pub fn remove_shot(&mut self, module: usize, shot: usize) {
        self.modules[module].remove_shot(shot, &self.card);
    }

    pub fn apply_template(&mut self, module: usize, template: &TemplateRecord) {
        self.modules[module].apply_template(template, &self.card);
        tracing::debug!(
            module_id = %self.modules[module].id,
            template = %template.name,
            shot_count = self.modules[module].shots.len(),
            "Applied template to film",
        );
    }

    pub fn set_animation_complexity(&mut self, module: usize, complexity: AnimationComplexity) {
        self.modules[module].set_animation_complexity(complexity, &self.card);
    }

    pub fn set_animation_override(
        &mut self,
        module: usize,
        shot: usize,
        complexity: Option<AnimationComplexity>,
    ) {
        self.modules[module].set_animation_override(shot, complexity, &self.card);
    }

    pub fn select_all(&mut self, module: usize) {
        self.modules[module].select_all();
    }

    pub fn deselect_all(&mut self, module: usize) {
        self.modules[module].deselect_all();
    }

    pub fn toggle_shot_selection(&mut self, module: usize, shot: usize) {
        self.modules[module].toggle_shot_selection(shot);
    }

    // -- Line items --

    pub fn add_line_item(&mut self, item: BuilderLineItem) {
        self.line_items.push(item);
    }

    pub fn remove_line_item(&mut self, index: usize) {
        self.line_items.remove(index);
    }

    // -- Derived views --

    /// Recompute the draft's totals.
    pub fn summary(&self) -> BudgetSummary {
        let hours_per_second = self.card.hours_per_second();
        let editing_rate = self.card.editing_hours_per_30s();

        let pool: f64 = self
            .modules
            .iter()
            .map(|m| pool_budget_hours(m.duration_secs, hours_per_second))
            .sum();
        let editing: f64 = self
            .modules
            .iter()
            .map(|m| editing_hours(m.duration_secs, editing_rate))
            .sum();
        let shot_hours: f64 = self.modules.iter().map(|m| m.shot_hours()).sum();
        let line_item_hours: f64 =
            round2(self.line_items.iter().map(|item| item.total_hours()).sum());

        let total = total_hours(shot_hours, editing) + line_item_hours;
        BudgetSummary {
            pool_budget_hours: pool,
            shot_hours,
            editing_hours: editing,
            line_item_hours,
            total_hours: total,
            remaining_hours: remaining_budget(pool, total),
        }
    }

    /// What could still fit in the remaining budget. Advisory only.
    pub fn suggestions(&self) -> Vec<Suggestion> {
        build_suggestions(Some(self.summary().remaining_hours), &self.card)
    }

    /// Serialize the draft for persistence. The companion row is stored like
    /// any other shot; sort_order is reassigned by array position.
    pub fn payload(&self) -> VersionPayload {
        let mut shots: Vec<ShotPayload> = Vec::new();
        for module in &self.modules {
            for shot in &module.shots {
                shots.push(ShotPayload {
                    shot_type: shot.shot_type.clone(),
                    quantity: shot.quantity,
                    base_hours_each: round2(shot.base_hours_each),
                    efficiency_multiplier: shot.efficiency_multiplier,
                    adjusted_hours: shot.adjusted_hours(),
                    sort_order: 0,
                });
            }
        }
        for (i, shot) in shots.iter_mut().enumerate() {
            shot.sort_order = i as i32;
        }

        let duration_seconds: i32 = self.modules.iter().map(|m| m.duration_secs).sum();
        tracing::debug!(
            duration_secs = duration_seconds,
            shot_count = shots.len(),
            "Serialized version draft for persistence",
        );

        VersionPayload {
            duration_seconds,
            notes: self.notes.clone(),
            shots,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
