//! Planning domain model.
//!
//! # Responsibility
//! - Define the task snapshot consumed by every engine.
//! - Define the value types engines hand back to renderers.
//!
//! # Invariants
//! - Every entity is rebuilt per planning run; only task ids are stable.
//! - Nothing here holds interior mutability or global state.

pub mod basin;
pub mod dimensions;
pub mod schedule;
pub mod task;
