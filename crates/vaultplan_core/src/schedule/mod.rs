//! Day schedule compiler and block filler.
//!
//! # Responsibility
//! - Resolve today's context, fixed timeline and free slots.
//! - Select a grand profile and compile its recipes into time blocks.
//! - Fill blocks greedily from scored task pools.
//!
//! # Invariants
//! - `now` is always injected; nothing reads the wall clock.
//! - Planning anomalies become diagnostics, never errors.
//! - While R0 is pending only the governance block exists and stays empty.

pub mod clock;
pub mod compiler;
pub mod context;
pub mod filler;
pub mod planner;
pub mod profiles;
pub mod timeline;

/// Smallest block remainder worth filling or compiling, in minutes.
pub const MIN_GRAIN_MINUTES: u32 = 10;
/// Upper bound on the R0 governance block, in minutes.
pub const R0_MAX_MINUTES: u32 = 90;
