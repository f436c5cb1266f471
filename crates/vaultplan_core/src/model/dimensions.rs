//! Priority dimensions and score.
//!
//! # Invariants
//! - Every component stays within `[0, DIMENSION_MAX]` after construction.
//! - Signals combine by element-wise maximum, never by sum.

use serde::{Deserialize, Serialize};

/// Upper bound shared by gain, pressure and friction.
pub const DIMENSION_MAX: u8 = 5;

/// Value/urgency/effort triple attached to a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    /// Urgency-independent value.
    pub gain: u8,
    /// Time pressure.
    pub pressure: u8,
    /// Activation cost.
    pub friction: u8,
}

impl Dimensions {
    /// Builds a triple, clamping each input into `[0, 5]`.
    pub fn new(gain: i64, pressure: i64, friction: i64) -> Self {
        Self {
            gain: clamp_component(gain),
            pressure: clamp_component(pressure),
            friction: clamp_component(friction),
        }
    }

    pub fn gain(value: i64) -> Self {
        Self::new(value, 0, 0)
    }

    pub fn pressure(value: i64) -> Self {
        Self::new(0, value, 0)
    }

    /// Element-wise maximum.
    pub fn merge_max(self, other: Self) -> Self {
        Self {
            gain: self.gain.max(other.gain),
            pressure: self.pressure.max(other.pressure),
            friction: self.friction.max(other.friction),
        }
    }

    /// Folds any number of triples with [`Dimensions::merge_max`].
    pub fn fold<I: IntoIterator<Item = Dimensions>>(items: I) -> Self {
        items
            .into_iter()
            .fold(Self::default(), |acc, item| acc.merge_max(item))
    }

    /// Shifts friction by `delta` and clamps.
    pub fn adjust_friction(self, delta: i64) -> Self {
        Self {
            friction: clamp_component(i64::from(self.friction) + delta),
            ..self
        }
    }

    /// `gain * pressure / (1 + friction)`.
    pub fn score(&self) -> f64 {
        f64::from(self.gain) * f64::from(self.pressure) / (1.0 + f64::from(self.friction))
    }
}

fn clamp_component(value: i64) -> u8 {
    value.clamp(0, i64::from(DIMENSION_MAX)) as u8
}
