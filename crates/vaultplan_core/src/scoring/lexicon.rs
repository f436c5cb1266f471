//! Tag lexicon contract.
//!
//! Locale and lexicon resolution live with the caller; engines only see this
//! trait. `StaticTagLexicon` is a settings-driven implementation for the CLI
//! and tests.

use crate::model::dimensions::Dimensions;
use crate::model::task::normalize_tag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resolves tags into priority signals.
pub trait TagLexicon {
    /// Dimensions contributed by one tag, if the tag is known.
    fn dimensions_for_tag(&self, tag: &str) -> Option<Dimensions>;
    /// Whether one tag marks an authority (closure) task.
    fn is_authority_tag(&self, tag: &str) -> bool;
}

impl<L: TagLexicon + ?Sized> TagLexicon for &L {
    fn dimensions_for_tag(&self, tag: &str) -> Option<Dimensions> {
        (**self).dimensions_for_tag(tag)
    }

    fn is_authority_tag(&self, tag: &str) -> bool {
        (**self).is_authority_tag(tag)
    }
}

/// Map-backed lexicon. Keys match case-insensitively, leading `#` optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticTagLexicon {
    /// Tag -> `[gain, pressure, friction]`; values are clamped on lookup.
    pub dimensions: BTreeMap<String, [i64; 3]>,
    pub authority_tags: Vec<String>,
}

impl StaticTagLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dimensions(mut self, tag: &str, gain: i64, pressure: i64, friction: i64) -> Self {
        self.dimensions
            .insert(tag.to_string(), [gain, pressure, friction]);
        self
    }

    pub fn with_authority_tag(mut self, tag: &str) -> Self {
        self.authority_tags.push(tag.to_string());
        self
    }
}

impl TagLexicon for StaticTagLexicon {
    fn dimensions_for_tag(&self, tag: &str) -> Option<Dimensions> {
        let wanted = normalize_tag(tag);
        self.dimensions
            .iter()
            .find(|(key, _)| normalize_tag(key) == wanted)
            .map(|(_, [gain, pressure, friction])| Dimensions::new(*gain, *pressure, *friction))
    }

    fn is_authority_tag(&self, tag: &str) -> bool {
        let wanted = normalize_tag(tag);
        !wanted.is_empty()
            && self
                .authority_tags
                .iter()
                .any(|candidate| normalize_tag(candidate) == wanted)
    }
}

/// Authority flag a collaborator should store on a record built from `tags`.
pub fn resolve_authority<L: TagLexicon + ?Sized>(tags: &[String], lexicon: &L) -> bool {
    tags.iter().any(|tag| lexicon.is_authority_tag(tag))
}

#[cfg(test)]
mod tests {
    use super::{resolve_authority, StaticTagLexicon, TagLexicon};
    use crate::model::dimensions::Dimensions;

    #[test]
    fn lookups_ignore_case_and_hash_prefix() {
        let lexicon = StaticTagLexicon::new()
            .with_dimensions("#Health", 4, 1, 9)
            .with_authority_tag("admin/tax");

        assert_eq!(
            lexicon.dimensions_for_tag("health"),
            Some(Dimensions::new(4, 1, 5))
        );
        assert_eq!(lexicon.dimensions_for_tag("#unknown"), None);
        assert!(lexicon.is_authority_tag("#ADMIN/tax"));
        assert!(resolve_authority(
            &["#misc".to_string(), "#admin/tax".to_string()],
            &lexicon
        ));
        assert!(!resolve_authority(&[], &lexicon));
    }
}
