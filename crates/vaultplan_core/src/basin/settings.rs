//! Basin thresholds and basin tags.
//!
//! # Responsibility
//! - Hold the short-task and link-smell thresholds.
//! - Resolve a task's explicitly tagged basin.

use crate::model::basin::Basin;
use crate::model::task::{normalize_tag, TaskRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default B1 short-task ceiling in minutes.
pub const DEFAULT_SHORT_TASK_MINUTES: u32 = 15;
/// Default outgoing-link count that flags a structural smell.
pub const DEFAULT_SMELL_OUTGOING_LINKS: usize = 2;

/// Classification thresholds and basin tag vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasinSettings {
    pub short_task_minutes: u32,
    pub smell_outgoing_links: usize,
    /// Tags that pin a task to a basin. Several aliases per basin are allowed.
    pub basin_tags: BTreeMap<Basin, Vec<String>>,
}

impl Default for BasinSettings {
    fn default() -> Self {
        let basin_tags = Basin::ALL
            .into_iter()
            .map(|basin| (basin, vec![format!("#{}", basin.as_str().to_lowercase())]))
            .collect();
        Self {
            short_task_minutes: DEFAULT_SHORT_TASK_MINUTES,
            smell_outgoing_links: DEFAULT_SMELL_OUTGOING_LINKS,
            basin_tags,
        }
    }
}

impl BasinSettings {
    /// Basin named by `tag`, if any.
    pub fn basin_for_tag(&self, tag: &str) -> Option<Basin> {
        let wanted = normalize_tag(tag);
        if wanted.is_empty() {
            return None;
        }
        self.basin_tags.iter().find_map(|(basin, aliases)| {
            aliases
                .iter()
                .any(|alias| normalize_tag(alias) == wanted)
                .then_some(*basin)
        })
    }

    /// Explicit basin from the first basin tag in tag order.
    pub fn tagged_basin(&self, task: &TaskRecord) -> Option<Basin> {
        task.tags.iter().find_map(|tag| self.basin_for_tag(tag))
    }
}
