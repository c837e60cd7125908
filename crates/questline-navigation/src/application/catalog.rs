//! Quest catalog.
//!
//! Holds every loaded quest together with its branch registry, built once at
//! startup against the configured locale. Play-throughs clone the prototype
//! engine instead of re-scanning content.

use std::collections::BTreeMap;
use std::sync::Arc;

use questline_content::application::loader::QuestBundle;
use questline_content::{Quest, Translate};
use tracing::info;

use crate::domain::branch::BranchRegistry;
use crate::domain::engine::NavigationEngine;
use crate::error::NavigationError;

/// A quest ready to be played.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    prototype: NavigationEngine,
    version_hash: String,
}

impl CatalogEntry {
    /// Builds the registry for `quest` and a prototype engine.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError` if the quest is empty or declares a bad
    /// branch.
    pub fn build(quest: Quest, translator: &dyn Translate) -> Result<Self, NavigationError> {
        let registry = BranchRegistry::build(&quest, translator)?;
        let version_hash = quest.version_hash();
        let prototype = NavigationEngine::new(Arc::new(quest), registry)?;
        Ok(Self {
            prototype,
            version_hash,
        })
    }

    #[must_use]
    pub fn quest(&self) -> &Quest {
        self.prototype.quest()
    }

    #[must_use]
    pub fn registry(&self) -> &BranchRegistry {
        self.prototype.registry()
    }

    #[must_use]
    pub fn version_hash(&self) -> &str {
        &self.version_hash
    }

    /// A fresh engine at the start of the quest.
    #[must_use]
    pub fn engine(&self) -> NavigationEngine {
        self.prototype.clone()
    }
}

/// Every playable quest, keyed by quest id.
#[derive(Debug, Clone, Default)]
pub struct QuestCatalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl QuestCatalog {
    /// Builds entries for `bundles`, resolving rich text in `locale`.
    ///
    /// # Errors
    ///
    /// Returns the first `NavigationError` raised while building a registry.
    pub fn from_bundles(bundles: Vec<QuestBundle>, locale: &str) -> Result<Self, NavigationError> {
        let mut catalog = Self::default();
        for bundle in bundles {
            let entry = CatalogEntry::build(bundle.quest.clone(), bundle.translator(locale))?;
            catalog.insert(entry);
        }
        info!(quests = catalog.len(), locale, "quest catalog ready");
        Ok(catalog)
    }

    /// Adds or replaces an entry.
    pub fn insert(&mut self, entry: CatalogEntry) {
        self.entries.insert(entry.quest().id.clone(), entry);
    }

    #[must_use]
    pub fn get(&self, quest_id: &str) -> Option<&CatalogEntry> {
        self.entries.get(quest_id)
    }

    /// Entries ordered by quest id.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use questline_content::{Position, Translations};
    use questline_test_support::{QuestBuilder, branching_quest};

    #[test]
    fn test_from_bundles_builds_registry_with_locale_markers() {
        // Arrange
        let quest = QuestBuilder::new("localized")
            .scenes(&[1, 1, 1])
            .body_as_html(Position::new(0, 0), "scenes.choice")
            .build();
        let mut bundle = QuestBundle::untranslated(quest);
        bundle.translations.insert(
            "en".to_owned(),
            [("scenes.choice", "<button data-destination='1_0,1_0'>Go</button>")]
                .into_iter()
                .collect::<Translations>(),
        );

        // Act
        let catalog = QuestCatalog::from_bundles(vec![bundle], "fr").unwrap();

        // Assert
        let entry = catalog.get("localized").unwrap();
        assert!(entry.registry().has_branches());
        assert_eq!(entry.version_hash().len(), 64);
    }

    #[test]
    fn test_engine_clones_are_independent() {
        let (quest, _) = branching_quest();
        let entry = CatalogEntry::build(quest, &questline_content::IdentityTranslator).unwrap();

        let mut first = entry.engine();
        first.next();
        let second = entry.engine();

        assert_eq!(first.current(), Position::new(1, 0));
        assert_eq!(second.current(), Position::START);
    }

    #[test]
    fn test_from_bundles_surfaces_branch_errors() {
        let quest = QuestBuilder::new("broken")
            .scenes(&[1])
            .destination(Position::new(0, 0), "2_0,2_1")
            .build();

        let result = QuestCatalog::from_bundles(vec![QuestBundle::untranslated(quest)], "en");

        assert!(matches!(result, Err(NavigationError::BranchOutOfBounds { .. })));
    }
}
