//! Declarative day-profile configuration.
//!
//! # Responsibility
//! - Describe which blocks exist on which days: recipes grouped into packs,
//!   packs bundled into grand profiles selected by calendar rules.
//! - Normalize user-supplied JSON without ever failing.
//!
//! # Invariants
//! - After normalization recipe, pack and profile ids are unique (first wins).
//! - A normalized configuration always has at least one recipe and one
//!   profile; otherwise the built-in defaults are used.
//! - Dangling references survive normalization and are reported, not removed.

use crate::model::schedule::{AttentionProfile, BlockKind};
use crate::schedule::clock::parse_hhmm;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Calendar predicate shared by recipe `when` rules and profile selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DayRule {
    #[default]
    Always,
    Weekdays {
        days: Vec<Weekday>,
    },
    Weekend,
    DateRange {
        from: NaiveDate,
        to: NaiveDate,
    },
}

impl DayRule {
    pub fn workdays() -> Self {
        Self::Weekdays {
            days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
        }
    }

    /// Whether `day` satisfies the rule. Date ranges are inclusive.
    pub fn matches(&self, day: NaiveDate) -> bool {
        match self {
            Self::Always => true,
            Self::Weekdays { days } => days.contains(&day.weekday()),
            Self::Weekend => matches!(day.weekday(), Weekday::Sat | Weekday::Sun),
            Self::DateRange { from, to } => *from <= day && day <= *to,
        }
    }
}

/// One kind of block over a local time window, split into chunks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecipe {
    pub id: String,
    pub kind: BlockKind,
    pub profile: AttentionProfile,
    /// `HH:MM` window start.
    pub start: String,
    /// `HH:MM` window end, exclusive.
    pub end: String,
    pub chunk_minutes: u32,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub when: DayRule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_urgency: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_authority: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tasks: Option<u32>,
}

impl BlockRecipe {
    pub fn new(
        id: &str,
        kind: BlockKind,
        profile: AttentionProfile,
        start: &str,
        end: &str,
        chunk_minutes: u32,
        priority: i32,
    ) -> Self {
        Self {
            id: id.to_string(),
            kind,
            profile,
            start: start.to_string(),
            end: end.to_string(),
            chunk_minutes,
            priority,
            when: DayRule::Always,
            min_urgency: None,
            allow_authority: None,
            max_tasks: None,
        }
    }

    pub fn only_when(mut self, rule: DayRule) -> Self {
        self.when = rule;
        self
    }

    pub fn with_min_urgency(mut self, min_urgency: u8) -> Self {
        self.min_urgency = Some(min_urgency);
        self
    }

    pub fn with_allow_authority(mut self, allow: bool) -> Self {
        self.allow_authority = Some(allow);
        self
    }

    pub fn with_max_tasks(mut self, max_tasks: u32) -> Self {
        self.max_tasks = Some(max_tasks);
        self
    }

    /// Window as minutes after midnight, if both ends parse and are ordered.
    pub fn window(&self) -> Option<(u32, u32)> {
        let start = parse_hhmm(&self.start)?;
        let end = parse_hhmm(&self.end)?;
        (start < end).then_some((start, end))
    }

    fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("id is empty".to_string());
        }
        if self.window().is_none() {
            return Err(format!(
                "window `{}`-`{}` is not a valid HH:MM range",
                self.start, self.end
            ));
        }
        if self.chunk_minutes == 0 {
            return Err("chunk_minutes must be positive".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipePack {
    pub id: String,
    #[serde(default)]
    pub recipes: Vec<String>,
}

impl RecipePack {
    pub fn new<I, T>(id: &str, recipes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            id: id.to_string(),
            recipes: recipes.into_iter().map(Into::into).collect(),
        }
    }
}

/// Day-level bundle of packs, chosen by `selector`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrandProfile {
    pub id: String,
    /// Lower wins when several profiles match the same day.
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub selector: DayRule,
    #[serde(default)]
    pub packs: Vec<String>,
}

impl GrandProfile {
    pub fn new<I, T>(id: &str, priority: i32, selector: DayRule, packs: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            id: id.to_string(),
            priority,
            selector,
            packs: packs.into_iter().map(Into::into).collect(),
        }
    }
}

/// Manual per-date profile choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileOverride {
    pub date: NaiveDate,
    pub profile: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayProfileSettings {
    pub recipes: Vec<BlockRecipe>,
    pub packs: Vec<RecipePack>,
    pub profiles: Vec<GrandProfile>,
    pub overrides: Vec<ProfileOverride>,
}

impl Default for DayProfileSettings {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DayProfileSettings {
    /// Workday and weekend profiles shipped with the planner.
    pub fn builtin() -> Self {
        let recipes = vec![
            BlockRecipe::new(
                "commit-review",
                BlockKind::GovernanceCommit,
                AttentionProfile::Admin,
                "07:30",
                "08:00",
                30,
                0,
            ),
            BlockRecipe::new(
                "morning-deep",
                BlockKind::Execute,
                AttentionProfile::Deep,
                "08:00",
                "12:00",
                90,
                10,
            ),
            BlockRecipe::new(
                "afternoon-workshop",
                BlockKind::Workshop,
                AttentionProfile::Shallow,
                "13:30",
                "15:30",
                60,
                20,
            ),
            BlockRecipe::new(
                "admin-sweep",
                BlockKind::Admin,
                AttentionProfile::Admin,
                "15:30",
                "16:30",
                30,
                30,
            ),
            BlockRecipe::new(
                "evening-close",
                BlockKind::Close,
                AttentionProfile::Shallow,
                "17:00",
                "18:00",
                30,
                40,
            ),
            BlockRecipe::new(
                "weekend-light",
                BlockKind::Execute,
                AttentionProfile::Shallow,
                "10:00",
                "12:00",
                60,
                10,
            )
            .with_max_tasks(2),
        ];
        let packs = vec![
            RecipePack::new(
                "workday",
                [
                    "commit-review",
                    "morning-deep",
                    "afternoon-workshop",
                    "admin-sweep",
                    "evening-close",
                ],
            ),
            RecipePack::new("weekend", ["weekend-light", "evening-close"]),
        ];
        let profiles = vec![
            GrandProfile::new("workday", 10, DayRule::workdays(), ["workday"]),
            GrandProfile::new("weekend", 10, DayRule::Weekend, ["weekend"]),
        ];
        Self {
            recipes,
            packs,
            profiles,
            overrides: Vec::new(),
        }
    }

    pub fn recipe(&self, id: &str) -> Option<&BlockRecipe> {
        self.recipes.iter().find(|recipe| recipe.id == id)
    }

    pub fn pack(&self, id: &str) -> Option<&RecipePack> {
        self.packs.iter().find(|pack| pack.id == id)
    }

    pub fn profile(&self, id: &str) -> Option<&GrandProfile> {
        self.profiles.iter().find(|profile| profile.id == id)
    }

    /// Normalizes untrusted JSON into settings plus diagnostics.
    ///
    /// Never fails. Absent sections take the built-in value; present sections
    /// are validated entry by entry.
    pub fn from_json_value(value: &Value) -> (Self, Vec<String>) {
        let mut diagnostics = Vec::new();
        let Some(object) = value.as_object() else {
            if !value.is_null() {
                diagnostics.push(
                    "day_profiles: expected an object; using built-in profiles".to_string(),
                );
            }
            return (Self::builtin(), diagnostics);
        };
        let builtin = Self::builtin();

        let recipes = match object.get("recipes") {
            Some(section) => normalize_section(
                "recipes",
                section,
                |recipe: &BlockRecipe| recipe.id.clone(),
                BlockRecipe::validate,
                &mut diagnostics,
            ),
            None => builtin.recipes.clone(),
        };
        let packs = match object.get("packs") {
            Some(section) => normalize_section(
                "packs",
                section,
                |pack: &RecipePack| pack.id.clone(),
                |pack: &RecipePack| non_empty_id(&pack.id),
                &mut diagnostics,
            ),
            None => builtin.packs.clone(),
        };
        let profiles = match object.get("profiles") {
            Some(section) => normalize_section(
                "profiles",
                section,
                |profile: &GrandProfile| profile.id.clone(),
                |profile: &GrandProfile| non_empty_id(&profile.id),
                &mut diagnostics,
            ),
            None => builtin.profiles.clone(),
        };
        let overrides = match object.get("overrides") {
            Some(section) => normalize_section(
                "overrides",
                section,
                |entry: &ProfileOverride| entry.date.to_string(),
                |entry: &ProfileOverride| non_empty_id(&entry.profile),
                &mut diagnostics,
            ),
            None => Vec::new(),
        };

        let mut settings = Self {
            recipes,
            packs,
            profiles,
            overrides,
        };
        if settings.recipes.is_empty() || settings.profiles.is_empty() {
            diagnostics.push(
                "day_profiles: no usable recipes or profiles; using built-in profiles".to_string(),
            );
            let overrides = std::mem::take(&mut settings.overrides);
            settings = Self {
                overrides,
                ..Self::builtin()
            };
        }
        diagnostics.extend(settings.dangling_references());
        (settings, diagnostics)
    }

    /// Diagnostics for references that point at nothing.
    pub fn dangling_references(&self) -> Vec<String> {
        let mut diagnostics = Vec::new();
        for (index, pack) in self.packs.iter().enumerate() {
            for recipe_id in &pack.recipes {
                if self.recipe(recipe_id).is_none() {
                    diagnostics.push(format!(
                        "packs[{index}]: pack `{}` references unknown recipe `{recipe_id}`",
                        pack.id
                    ));
                }
            }
        }
        for (index, profile) in self.profiles.iter().enumerate() {
            for pack_id in &profile.packs {
                if self.pack(pack_id).is_none() {
                    diagnostics.push(format!(
                        "profiles[{index}]: profile `{}` references unknown pack `{pack_id}`",
                        profile.id
                    ));
                }
            }
        }
        for (index, entry) in self.overrides.iter().enumerate() {
            if self.profile(&entry.profile).is_none() {
                diagnostics.push(format!(
                    "overrides[{index}]: {} names unknown profile `{}`",
                    entry.date, entry.profile
                ));
            }
        }
        diagnostics
    }
}

fn non_empty_id(id: &str) -> Result<(), String> {
    if id.trim().is_empty() {
        Err("id is empty".to_string())
    } else {
        Ok(())
    }
}

fn normalize_section<T, K, V>(
    name: &str,
    section: &Value,
    key: K,
    validate: V,
    diagnostics: &mut Vec<String>,
) -> Vec<T>
where
    T: DeserializeOwned,
    K: Fn(&T) -> String,
    V: Fn(&T) -> Result<(), String>,
{
    let Some(entries) = section.as_array() else {
        diagnostics.push(format!("{name}: expected an array; section ignored"));
        return Vec::new();
    };

    let mut seen = BTreeSet::new();
    let mut kept = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let parsed = match serde_json::from_value::<T>(entry.clone()) {
            Ok(parsed) => parsed,
            Err(err) => {
                diagnostics.push(format!("{name}[{index}]: skipped: {err}"));
                continue;
            }
        };
        if let Err(reason) = validate(&parsed) {
            diagnostics.push(format!("{name}[{index}]: skipped: {reason}"));
            continue;
        }
        let id = key(&parsed);
        if !seen.insert(id.clone()) {
            diagnostics.push(format!("{name}[{index}]: duplicate id `{id}` dropped"));
            continue;
        }
        kept.push(parsed);
    }
    kept
}
