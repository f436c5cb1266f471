//! Greedy block filler.
//!
//! # Responsibility
//! - Assign scored tasks to compiled blocks, block by block, in block order.
//!
//! # Invariants
//! - A task is placed at most once per run: availability is a single
//!   [`AvailablePool`] shared by every pool.
//! - Nothing is placed while the R0 review is pending.
//! - Placed tasks never exceed their block.

use crate::basin::classified::ClassifiedTask;
use crate::model::basin::{Basin, NextOperator};
use crate::model::dimensions::Dimensions;
use crate::model::schedule::{AttentionProfile, BlockKind, ScheduledTask, TimeBlockPlan};
use crate::schedule::clock::plus_minutes;
use crate::schedule::context::DayContext;
use crate::schedule::MIN_GRAIN_MINUTES;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Source pools a block can draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolKind {
    /// Tagged B5.
    Committed,
    /// Eligible for B5 but not tagged B5.
    Candidates,
    /// Tagged B4, or untagged triage tasks headed to B4.
    Workshop,
    Authority,
    General,
}

/// Pools consulted, in order, for a block of `kind`.
pub fn pool_sequence(kind: &BlockKind) -> &'static [PoolKind] {
    match kind {
        BlockKind::Execute => &[PoolKind::Committed, PoolKind::Candidates, PoolKind::General],
        BlockKind::Workshop => &[PoolKind::Workshop, PoolKind::General],
        BlockKind::Close => &[PoolKind::Authority, PoolKind::Committed, PoolKind::General],
        BlockKind::Admin => &[PoolKind::Authority, PoolKind::General],
        BlockKind::GovernanceR0
        | BlockKind::GovernanceCommit
        | BlockKind::Buffer
        | BlockKind::Other(_) => &[],
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoolEntry {
    pub id: String,
    pub title: String,
    pub dimensions: Dimensions,
    pub score: f64,
    pub minutes: u32,
    pub is_authority: bool,
}

/// Availability flags indexed like [`TaskPools::entries`].
#[derive(Debug, Clone)]
pub struct AvailablePool(Vec<bool>);

impl AvailablePool {
    pub fn all(len: usize) -> Self {
        Self(vec![true; len])
    }

    pub fn is_available(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    pub fn take(&mut self, index: usize) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = false;
        }
    }

    pub fn remaining(&self) -> usize {
        self.0.iter().filter(|available| **available).count()
    }
}

/// Arena of pool entries plus per-pool index lists in canonical score order.
#[derive(Debug, Clone, Default)]
pub struct TaskPools {
    entries: Vec<PoolEntry>,
    committed: Vec<usize>,
    candidates: Vec<usize>,
    workshop: Vec<usize>,
    authority: Vec<usize>,
    general: Vec<usize>,
}

impl TaskPools {
    /// Builds pools from tasks already in canonical score order.
    ///
    /// Tasks in `excluded` (the R0 task and today's rendezvous) join no pool.
    pub fn build(
        classified: &[ClassifiedTask<'_>],
        excluded: &BTreeSet<String>,
        default_task_minutes: u32,
    ) -> Self {
        let mut pools = Self::default();
        for task in classified {
            if excluded.contains(task.id()) {
                continue;
            }
            let flags = &task.flags;
            let index = pools.entries.len();
            pools.entries.push(PoolEntry {
                id: task.id().to_string(),
                title: task.scored.title.clone(),
                dimensions: task.dimensions(),
                score: task.score(),
                minutes: flags.duration_minutes.unwrap_or(default_task_minutes),
                is_authority: flags.is_authority,
            });

            let tagged = flags.tagged_basin;
            if tagged == Some(Basin::B5) {
                pools.committed.push(index);
            } else if flags.eligible_b5 && tagged != Some(Basin::B6) {
                pools.candidates.push(index);
            }
            let heading_to_workshop = tagged.is_none()
                && flags.current_basin.is_triage()
                && flags.next_operator == Some(NextOperator::ToB4);
            if tagged == Some(Basin::B4) || heading_to_workshop {
                pools.workshop.push(index);
            }
            if flags.is_authority {
                pools.authority.push(index);
            }
            if tagged != Some(Basin::B6) && flags.children_count == 0 {
                pools.general.push(index);
            }
        }
        pools
    }

    pub fn entries(&self) -> &[PoolEntry] {
        &self.entries
    }

    pub fn pool(&self, kind: PoolKind) -> &[usize] {
        match kind {
            PoolKind::Committed => &self.committed,
            PoolKind::Candidates => &self.candidates,
            PoolKind::Workshop => &self.workshop,
            PoolKind::Authority => &self.authority,
            PoolKind::General => &self.general,
        }
    }
}

/// Fills `blocks` greedily and returns placed tasks in block order.
pub fn fill_blocks(
    blocks: &[TimeBlockPlan],
    pools: &TaskPools,
    context: &DayContext,
) -> Vec<ScheduledTask> {
    if !context.is_r0_done() {
        return Vec::new();
    }

    let mut available = AvailablePool::all(pools.entries.len());
    let mut placed = Vec::new();
    for (block_index, block) in blocks.iter().enumerate() {
        let sequence = pool_sequence(&block.kind);
        if sequence.is_empty() {
            continue;
        }

        let mut cursor = block.start;
        let mut remaining = block.minutes;
        let mut count: u32 = 0;
        while remaining >= MIN_GRAIN_MINUTES
            && block.max_tasks.map_or(true, |max| count < max)
        {
            let Some(index) = pick(block, sequence, pools, &available, remaining) else {
                break;
            };
            available.take(index);
            let entry = &pools.entries[index];
            let end = plus_minutes(cursor, entry.minutes);
            placed.push(ScheduledTask {
                task_id: entry.id.clone(),
                title: entry.title.clone(),
                block_index,
                start: cursor,
                end,
                minutes: entry.minutes,
                score: entry.score,
            });
            cursor = end;
            remaining -= entry.minutes;
            count += 1;
        }
    }
    placed
}

fn pick(
    block: &TimeBlockPlan,
    sequence: &[PoolKind],
    pools: &TaskPools,
    available: &AvailablePool,
    remaining: u32,
) -> Option<usize> {
    let compare = comparator(block.profile);
    sequence.iter().find_map(|kind| {
        pools
            .pool(*kind)
            .iter()
            .copied()
            .filter(|index| available.is_available(*index))
            .filter(|index| {
                let entry = &pools.entries[*index];
                admits(block, entry) && entry.minutes <= remaining && entry.minutes <= block.minutes
            })
            .min_by(|a, b| compare(&pools.entries[*a], &pools.entries[*b]))
    })
}

fn admits(block: &TimeBlockPlan, entry: &PoolEntry) -> bool {
    if block.allow_authority == Some(false) && entry.is_authority {
        return false;
    }
    block
        .min_urgency
        .map_or(true, |min| entry.dimensions.pressure >= min)
}

type Comparator = fn(&PoolEntry, &PoolEntry) -> Ordering;

fn comparator(profile: AttentionProfile) -> Comparator {
    match profile {
        AttentionProfile::Deep => deep_order,
        AttentionProfile::Shallow | AttentionProfile::Admin => shallow_order,
    }
}

/// Gain, pressure, then low friction.
fn deep_order(a: &PoolEntry, b: &PoolEntry) -> Ordering {
    b.dimensions
        .gain
        .cmp(&a.dimensions.gain)
        .then(b.dimensions.pressure.cmp(&a.dimensions.pressure))
        .then(a.dimensions.friction.cmp(&b.dimensions.friction))
        .then(b.score.total_cmp(&a.score))
        .then_with(|| a.id.cmp(&b.id))
}

/// Pressure, low friction, then gain.
fn shallow_order(a: &PoolEntry, b: &PoolEntry) -> Ordering {
    b.dimensions
        .pressure
        .cmp(&a.dimensions.pressure)
        .then(a.dimensions.friction.cmp(&b.dimensions.friction))
        .then(b.dimensions.gain.cmp(&a.dimensions.gain))
        .then(b.score.total_cmp(&a.score))
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::{deep_order, pool_sequence, shallow_order, AvailablePool, PoolEntry, PoolKind};
    use crate::model::dimensions::Dimensions;
    use crate::model::schedule::BlockKind;
    use std::cmp::Ordering;

    fn entry(id: &str, gain: i64, pressure: i64, friction: i64) -> PoolEntry {
        let dimensions = Dimensions::new(gain, pressure, friction);
        PoolEntry {
            id: id.to_string(),
            title: id.to_string(),
            dimensions,
            score: dimensions.score(),
            minutes: 30,
            is_authority: false,
        }
    }

    #[test]
    fn deep_prefers_gain_and_shallow_prefers_pressure() {
        let valuable = entry("valuable", 5, 1, 0);
        let urgent = entry("urgent", 1, 5, 0);
        assert_eq!(deep_order(&valuable, &urgent), Ordering::Less);
        assert_eq!(shallow_order(&valuable, &urgent), Ordering::Greater);
    }

    #[test]
    fn ties_fall_back_to_id() {
        assert_eq!(deep_order(&entry("a", 1, 1, 1), &entry("b", 1, 1, 1)), Ordering::Less);
    }

    #[test]
    fn governance_and_buffer_blocks_draw_from_nothing() {
        assert!(pool_sequence(&BlockKind::GovernanceR0).is_empty());
        assert!(pool_sequence(&BlockKind::Buffer).is_empty());
        assert!(pool_sequence(&BlockKind::Other("reading".to_string())).is_empty());
        assert_eq!(
            pool_sequence(&BlockKind::Close),
            &[PoolKind::Authority, PoolKind::Committed, PoolKind::General]
        );
    }

    #[test]
    fn taking_an_entry_is_sticky() {
        let mut available = AvailablePool::all(3);
        available.take(1);
        available.take(7);
        assert!(!available.is_available(1));
        assert!(!available.is_available(7));
        assert_eq!(available.remaining(), 2);
    }
}
