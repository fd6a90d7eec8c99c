//! Unknown and lethal path collections
//!
//! Both sets are append-only from the classifier's point of view and keep
//! insertion order. Commands from outside (the settings UI, the CLI) prune
//! or clear them. Shared behind an `Arc` between the two sides.

use indexmap::IndexSet;
use parking_lot::RwLock;
use zonewatch_types::ZoneSettings;

use crate::matcher::MatcherCache;

#[derive(Debug, Default)]
pub struct PathCatalog {
    unknown: RwLock<IndexSet<String>>,
    lethal: RwLock<IndexSet<String>>,
}

impl PathCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from the lists persisted in settings (duplicates collapse)
    pub fn from_settings(settings: &ZoneSettings) -> Self {
        Self {
            unknown: RwLock::new(settings.unknown_effects.iter().cloned().collect()),
            lethal: RwLock::new(settings.lethal_effects.iter().cloned().collect()),
        }
    }

    /// Copy both collections into settings for saving
    pub fn write_into(&self, settings: &mut ZoneSettings) {
        settings.unknown_effects = self.unknown();
        settings.lethal_effects = self.lethal();
    }

    /// Record an unmatched path. Returns true if it was new.
    pub fn offer_unknown(&self, path: &str) -> bool {
        insert_new(&self.unknown, path)
    }

    /// Record a path present at death. Returns true if it was new.
    pub fn record_lethal(&self, path: &str) -> bool {
        insert_new(&self.lethal, path)
    }

    pub fn unknown(&self) -> Vec<String> {
        self.unknown.read().iter().cloned().collect()
    }

    pub fn lethal(&self) -> Vec<String> {
        self.lethal.read().iter().cloned().collect()
    }

    pub fn contains_unknown(&self, path: &str) -> bool {
        self.unknown.read().contains(path)
    }

    pub fn contains_lethal(&self, path: &str) -> bool {
        self.lethal.read().contains(path)
    }

    /// Drop unknown paths now claimed by a blacklist or group template
    ///
    /// Returns the number of removed paths.
    pub fn remove_matched(&self, settings: &ZoneSettings, matchers: &mut MatcherCache) -> usize {
        let templates: Vec<&str> = settings.all_templates().collect();
        let mut unknown = self.unknown.write();
        let before = unknown.len();
        unknown.retain(|path| !templates.iter().any(|t| matchers.is_match(t, path)));
        let removed = before - unknown.len();
        if removed > 0 {
            tracing::info!(removed, "Removed unknown effects matched by current rules");
        }
        removed
    }

    /// Empty both collections
    pub fn clear_all(&self) {
        self.unknown.write().clear();
        self.lethal.write().clear();
    }
}

fn insert_new(set: &RwLock<IndexSet<String>>, path: &str) -> bool {
    if set.read().contains(path) {
        return false;
    }
    set.write().insert(path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonewatch_types::EntityGroup;

    #[test]
    fn test_offer_unknown_dedupes_and_keeps_order() {
        let catalog = PathCatalog::new();
        assert!(catalog.offer_unknown("b"));
        assert!(catalog.offer_unknown("a"));
        assert!(!catalog.offer_unknown("b"));
        assert_eq!(catalog.unknown(), vec!["b", "a"]);
    }

    #[test]
    fn test_record_lethal_dedupes() {
        let catalog = PathCatalog::new();
        assert!(catalog.record_lethal("x"));
        assert!(!catalog.record_lethal("x"));
        assert_eq!(catalog.lethal(), vec!["x"]);
    }

    #[test]
    fn test_remove_matched_keeps_unclaimed() {
        let settings = ZoneSettings {
            blacklist_templates: vec!["^A$".into()],
            entity_groups: vec![EntityGroup {
                path_templates: vec!["^C$".into()],
                ..Default::default()
            }],
            ..Default::default()
        };
        let catalog = PathCatalog::new();
        for path in ["A", "B", "C"] {
            catalog.offer_unknown(path);
        }

        let mut matchers = MatcherCache::new();
        assert_eq!(catalog.remove_matched(&settings, &mut matchers), 2);
        assert_eq!(catalog.unknown(), vec!["B"]);
    }

    #[test]
    fn test_clear_all_empties_both() {
        let catalog = PathCatalog::new();
        catalog.offer_unknown("a");
        catalog.record_lethal("b");
        catalog.clear_all();
        assert!(catalog.unknown().is_empty());
        assert!(catalog.lethal().is_empty());
    }

    #[test]
    fn test_settings_round_trip() {
        let settings = ZoneSettings {
            unknown_effects: vec!["u1".into(), "u2".into(), "u1".into()],
            lethal_effects: vec!["l1".into()],
            ..Default::default()
        };
        let catalog = PathCatalog::from_settings(&settings);
        catalog.offer_unknown("u3");

        let mut out = ZoneSettings::default();
        catalog.write_into(&mut out);
        assert_eq!(out.unknown_effects, vec!["u1", "u2", "u3"]);
        assert_eq!(out.lethal_effects, vec!["l1"]);
    }
}
