//! Planner configuration.
//!
//! # Responsibility
//! - Hold every user-editable knob for scoring, classification and scheduling.
//! - Load untrusted JSON section by section: bad sections fall back to defaults and
//!   are reported as diagnostics.
//!
//! # Invariants
//! - Loading never fails.

pub mod day_profiles;
pub mod schedule_options;

use crate::basin::settings::BasinSettings;
use crate::basin::slots::SlotSettings;
use crate::scoring::lexicon::StaticTagLexicon;
use day_profiles::DayProfileSettings;
use log::warn;
use schedule_options::ScheduleOptions;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    pub schedule: ScheduleOptions,
    pub basin: BasinSettings,
    pub slots: SlotSettings,
    pub day_profiles: DayProfileSettings,
    pub lexicon: StaticTagLexicon,
}

impl PlannerSettings {
    /// Builds settings from JSON, section by section.
    pub fn from_json_value(value: &Value) -> (Self, Vec<String>) {
        let mut diagnostics = Vec::new();
        let Some(object) = value.as_object() else {
            if !value.is_null() {
                diagnostics.push("settings: expected an object; using defaults".to_string());
            }
            return (Self::default(), diagnostics);
        };

        for key in object.keys() {
            if !matches!(
                key.as_str(),
                "schedule" | "basin" | "slots" | "day_profiles" | "lexicon"
            ) {
                diagnostics.push(format!("settings: unknown section `{key}` ignored"));
            }
        }

        let (day_profiles, profile_diagnostics) = DayProfileSettings::from_json_value(
            object.get("day_profiles").unwrap_or(&Value::Null),
        );
        diagnostics.extend(profile_diagnostics);

        let settings = Self {
            schedule: section(object.get("schedule"), "schedule", &mut diagnostics),
            basin: section(object.get("basin"), "basin", &mut diagnostics),
            slots: section(object.get("slots"), "slots", &mut diagnostics),
            day_profiles,
            lexicon: section(object.get("lexicon"), "lexicon", &mut diagnostics),
        };
        if !diagnostics.is_empty() {
            warn!(
                "event=settings_load module=config status=degraded diagnostics={}",
                diagnostics.len()
            );
        }
        (settings, diagnostics)
    }
}

fn section<T>(value: Option<&Value>, name: &str, diagnostics: &mut Vec<String>) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(value) = value else {
        return T::default();
    };
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => parsed,
        Err(err) => {
            diagnostics.push(format!("{name}: invalid ({err}); using defaults"));
            T::default()
        }
    }
}
