//! Basin classification engine.
//!
//! # Responsibility
//! - Derive per-task structural flags from a [`crate::graph::task_index::TaskIndex`].
//! - Infer an intake basin for untagged tasks and suggest the next operator.
//! - Build basin views and group B5 commit slots.
//!
//! # Invariants
//! - An explicit basin tag always wins over inference.
//! - Every function is total; missing data degrades to conservative flags.

pub mod classified;
pub mod decision;
pub mod flags;
pub mod settings;
pub mod slots;
