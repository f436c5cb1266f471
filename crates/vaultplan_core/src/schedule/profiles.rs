//! Grand profile selection and recipe expansion for a date.
//!
//! # Invariants
//! - A resolvable date override beats the day rules.
//! - Each recipe appears once per day, in pack order.

use crate::config::day_profiles::{BlockRecipe, DayProfileSettings, GrandProfile};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Picks the grand profile for `today`.
///
/// A resolvable override wins. Otherwise the matching profile with the lowest
/// priority number is chosen, ties going to declaration order.
pub fn select_grand_profile(
    settings: &DayProfileSettings,
    today: NaiveDate,
) -> (Option<&GrandProfile>, Vec<String>) {
    let mut diagnostics = Vec::new();

    if let Some(entry) = settings.overrides.iter().find(|entry| entry.date == today) {
        match settings.profile(&entry.profile) {
            Some(profile) => return (Some(profile), diagnostics),
            None => diagnostics.push(format!(
                "profiles: override for {today} names unknown profile `{}`; using calendar rules",
                entry.profile
            )),
        }
    }

    // min_by_key keeps the first of equal keys.
    let selected = settings
        .profiles
        .iter()
        .filter(|profile| profile.selector.matches(today))
        .min_by_key(|profile| profile.priority);
    if selected.is_none() {
        diagnostics.push(format!("profiles: no profile matches {today}"));
    }
    (selected, diagnostics)
}

/// Recipes of `profile` that apply on `today`, in pack then recipe order.
pub fn recipes_for_day<'a>(
    settings: &'a DayProfileSettings,
    profile: &GrandProfile,
    today: NaiveDate,
) -> (Vec<&'a BlockRecipe>, Vec<String>) {
    let mut diagnostics = Vec::new();
    let mut seen = BTreeSet::new();
    let mut recipes = Vec::new();

    for pack_id in &profile.packs {
        let Some(pack) = settings.pack(pack_id) else {
            diagnostics.push(format!(
                "profiles: `{}` references unknown pack `{pack_id}`",
                profile.id
            ));
            continue;
        };
        for recipe_id in &pack.recipes {
            if !seen.insert(recipe_id.as_str()) {
                continue;
            }
            match settings.recipe(recipe_id) {
                Some(recipe) if recipe.when.matches(today) => recipes.push(recipe),
                Some(_) => {}
                None => diagnostics.push(format!(
                    "profiles: pack `{pack_id}` references unknown recipe `{recipe_id}`"
                )),
            }
        }
    }
    (recipes, diagnostics)
}
