//! Loads quests from a quest library directory.
//!
//! Layout:
//!
//! ```text
//! <library>/<quest-dir>/quest.yaml
//! <library>/<quest-dir>/locales/<locale>.json
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::domain::quest::Quest;
use crate::domain::translation::{IdentityTranslator, Translate, Translations};
use crate::error::ContentError;

/// File name of the quest definition inside a quest directory.
pub const QUEST_FILE: &str = "quest.yaml";

/// Locale used when the requested locale has no table.
pub const FALLBACK_LOCALE: &str = "en";

/// A validated quest plus its locale tables.
#[derive(Debug, Clone)]
pub struct QuestBundle {
    /// The quest definition.
    pub quest: Quest,
    /// Locale tables keyed by locale code.
    pub translations: BTreeMap<String, Translations>,
}

impl QuestBundle {
    /// Bundles a quest with no locale tables.
    #[must_use]
    pub fn untranslated(quest: Quest) -> Self {
        Self {
            quest,
            translations: BTreeMap::new(),
        }
    }

    /// Translator for `locale`, falling back to English, then to the identity
    /// translator when the quest ships no locale tables at all.
    #[must_use]
    pub fn translator(&self, locale: &str) -> &dyn Translate {
        match self
            .translations
            .get(locale)
            .or_else(|| self.translations.get(FALLBACK_LOCALE))
        {
            Some(table) => table as &dyn Translate,
            None => &IdentityTranslator,
        }
    }
}

/// Loads one quest directory.
///
/// # Errors
///
/// Returns `ContentError` if a file cannot be read or parsed, or if the quest
/// fails structural validation.
pub fn load_quest_dir(dir: &Path) -> Result<QuestBundle, ContentError> {
    let quest_path = dir.join(QUEST_FILE);
    let source = read(&quest_path)?;
    let quest: Quest = serde_yaml::from_str(&source).map_err(|source| ContentError::Yaml {
        path: quest_path.clone(),
        source,
    })?;
    quest.validate()?;

    let translations = load_locales(&dir.join("locales"))?;
    debug!(
        quest_id = %quest.id,
        scenes = quest.scene_count(),
        locales = translations.len(),
        "loaded quest directory"
    );

    Ok(QuestBundle {
        quest,
        translations,
    })
}

/// Loads every quest directory under `root`, ordered by quest id.
/// Subdirectories without a quest file are skipped.
///
/// # Errors
///
/// Returns `ContentError` on the first quest that fails to load, or
/// `ContentError::DuplicateQuest` if two directories declare the same id.
pub fn load_quest_library(root: &Path) -> Result<Vec<QuestBundle>, ContentError> {
    info!(path = %root.display(), "loading quest library");

    let mut bundles: BTreeMap<String, QuestBundle> = BTreeMap::new();
    for dir in subdirectories(root)? {
        if !dir.join(QUEST_FILE).is_file() {
            warn!(path = %dir.display(), "skipping directory without {QUEST_FILE}");
            continue;
        }
        let bundle = load_quest_dir(&dir)?;
        let id = bundle.quest.id.clone();
        if bundles.insert(id.clone(), bundle).is_some() {
            return Err(ContentError::DuplicateQuest(id));
        }
    }

    info!(quests = bundles.len(), "quest library loaded");
    Ok(bundles.into_values().collect())
}

fn load_locales(dir: &Path) -> Result<BTreeMap<String, Translations>, ContentError> {
    let mut locales = BTreeMap::new();
    if !dir.is_dir() {
        return Ok(locales);
    }

    for entry in fs::read_dir(dir).map_err(|source| io_error(dir, source))? {
        let path = entry.map_err(|source| io_error(dir, source))?.path();
        if path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }
        let Some(locale) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let document: serde_json::Value =
            serde_json::from_str(&read(&path)?).map_err(|source| ContentError::Json {
                path: path.clone(),
                source,
            })?;
        locales.insert(locale.to_owned(), Translations::from_json(&document));
    }
    Ok(locales)
}

fn subdirectories(root: &Path) -> Result<Vec<PathBuf>, ContentError> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root).map_err(|source| io_error(root, source))? {
        let path = entry.map_err(|source| io_error(root, source))?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn read(path: &Path) -> Result<String, ContentError> {
    fs::read_to_string(path).map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: std::io::Error) -> ContentError {
    ContentError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const QUEST_YAML: &str = r"
id: lost-hiker
title: quest.title
scenes:
  - type: one-at-a-time
    background: { url: /bg1.webp }
    dialogs:
      - heading: start.title
      - bodyAsHtml: scenes.choice
";

    fn write_quest(root: &Path, dir: &str, yaml: &str) -> PathBuf {
        let quest_dir = root.join(dir);
        fs::create_dir_all(quest_dir.join("locales")).unwrap();
        fs::write(quest_dir.join(QUEST_FILE), yaml).unwrap();
        quest_dir
    }

    #[test]
    fn test_load_quest_dir_reads_quest_and_locales() {
        // Arrange
        let root = tempfile::tempdir().unwrap();
        let dir = write_quest(root.path(), "lost-hiker", QUEST_YAML);
        fs::write(
            dir.join("locales/en.json"),
            r#"{ "scenes": { "choice": "<button data-destination='0_0,0_0'>Go</button>" } }"#,
        )
        .unwrap();
        fs::write(dir.join("locales/notes.txt"), "ignored").unwrap();

        // Act
        let bundle = load_quest_dir(&dir).unwrap();

        // Assert
        assert_eq!(bundle.quest.id, "lost-hiker");
        assert_eq!(bundle.translations.len(), 1);
        assert!(bundle.translator("en").t("scenes.choice").contains("data-destination"));
        // Unknown locale falls back to English.
        assert!(bundle.translator("es").t("scenes.choice").contains("data-destination"));
    }

    #[test]
    fn test_translator_without_locales_is_identity() {
        let quest: Quest = serde_yaml::from_str(QUEST_YAML).unwrap();
        let bundle = QuestBundle::untranslated(quest);

        assert_eq!(bundle.translator("en").t("scenes.choice"), "scenes.choice");
    }

    #[test]
    fn test_load_quest_dir_rejects_empty_scene() {
        let root = tempfile::tempdir().unwrap();
        let dir = write_quest(
            root.path(),
            "broken",
            "id: broken\ntitle: t\nscenes:\n  - type: end-screen\n    background: { url: /x }\n    dialogs: []\n",
        );

        let result = load_quest_dir(&dir);

        assert!(matches!(result, Err(ContentError::EmptyScene { .. })));
    }

    #[test]
    fn test_load_quest_dir_reports_yaml_errors_with_path() {
        let root = tempfile::tempdir().unwrap();
        let dir = write_quest(root.path(), "bad", "id: [unclosed");

        match load_quest_dir(&dir) {
            Err(ContentError::Yaml { path, .. }) => assert!(path.ends_with(QUEST_FILE)),
            other => panic!("expected Yaml error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_quest_library_skips_non_quest_dirs_and_sorts_by_id() {
        // Arrange
        let root = tempfile::tempdir().unwrap();
        write_quest(root.path(), "b-dir", &QUEST_YAML.replace("lost-hiker", "zeta"));
        write_quest(root.path(), "a-dir", &QUEST_YAML.replace("lost-hiker", "alpha"));
        fs::create_dir_all(root.path().join("assets")).unwrap();

        // Act
        let bundles = load_quest_library(root.path()).unwrap();

        // Assert
        let ids: Vec<&str> = bundles.iter().map(|b| b.quest.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_load_quest_library_rejects_duplicate_ids() {
        let root = tempfile::tempdir().unwrap();
        write_quest(root.path(), "one", QUEST_YAML);
        write_quest(root.path(), "two", QUEST_YAML);

        let result = load_quest_library(root.path());

        match result {
            Err(ContentError::DuplicateQuest(id)) => assert_eq!(id, "lost-hiker"),
            other => panic!("expected DuplicateQuest, got {other:?}"),
        }
    }
}
