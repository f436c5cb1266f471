//! Dimension scoring engine.
//!
//! # Responsibility
//! - Turn tags, date markers and relations into `(gain, pressure, friction)`.
//! - Produce the canonical score used to sort every task list.
//!
//! # Invariants
//! - Stages fold with element-wise max; nothing is summed.
//! - Relation friction runs last and only shifts friction by one step.
//! - Missing data contributes nothing rather than failing.

pub mod engine;
pub mod lexicon;
pub mod time_pressure;
