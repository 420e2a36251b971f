//! Slate quote-calculation engine.
//!
//! The pure calculation core of the slate budgeting tool (PRD-21): it turns
//! a film duration, a rate card, and a set of shot percentages or manual
//! quantities into an hour budget, per-shot adjusted hours, and the derived
//! animation-companion line. The surrounding CRUD, HTTP, and persistence
//! layers are external collaborators; this crate performs no I/O.
//!
//! - [`catalog`] — rate card records and case-insensitive shot type lookup.
//! - [`distribution`] — largest-remainder percentage apportionment.
//! - [`budget`] — pool, editing, and remaining-hour math plus clamps.
//! - [`companion`] — the idempotent animation-companion synchronizer.
//! - [`builder`] — the per-session version draft state machine.
//! - [`payload`] — boundary records and the one-step input normalization.
//! - [`suggestions`] — category-weighted remaining-budget suggestions.

pub mod budget;
pub mod builder;
pub mod catalog;
pub mod companion;
pub mod distribution;
pub mod error;
pub mod line_items;
pub mod payload;
pub mod shot;
pub mod suggestions;
pub mod types;

pub use builder::{BudgetSummary, BuilderModule, QuoteBuilder};
pub use catalog::{RateCard, RateCardItem, ShotCategory};
pub use companion::AnimationComplexity;
pub use error::CoreError;
pub use shot::BuilderShot;
