//! Relation graph and task index.
//!
//! # Responsibility
//! - Model `dependsOn` / `partOf` relations between tasks.
//! - Provide the explicit per-run index every engine reads from.

pub mod relation_graph;
pub mod task_index;
