//! Translation lookup.
//!
//! Quest text is authored as translation keys. Locale files are nested JSON
//! objects which are flattened into dotted keys (`scenes.intro.body`). A key
//! without a translation resolves to itself.

use std::collections::HashMap;

use serde_json::Value;

/// Resolves a translation key to display text.
pub trait Translate: Send + Sync {
    /// Returns the translation for `key`, or `key` itself when none exists.
    fn t<'a>(&'a self, key: &'a str) -> &'a str;
}

/// Translator that returns every key unchanged. Used when a quest ships no
/// locale files, so literal text in the content is taken as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl Translate for IdentityTranslator {
    fn t<'a>(&'a self, key: &'a str) -> &'a str {
        key
    }
}

/// A flattened locale table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translations {
    entries: HashMap<String, String>,
}

impl Translations {
    /// Flattens a nested JSON locale document. Non-string leaves (numbers,
    /// booleans) are stored in their JSON text form; nulls are dropped.
    #[must_use]
    pub fn from_json(document: &Value) -> Self {
        let mut entries = HashMap::new();
        flatten_into(&mut entries, "", document);
        Self { entries }
    }

    /// Number of translated keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Translations {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Translate for Translations {
    fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.entries.get(key).map_or(key, String::as_str)
    }
}

fn flatten_into(entries: &mut HashMap<String, String>, prefix: &str, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(entries, &path, child);
            }
        }
        Value::String(text) => {
            entries.insert(prefix.to_owned(), text.clone());
        }
        Value::Null => {}
        other => {
            entries.insert(prefix.to_owned(), other.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_flattens_nested_objects_with_dotted_keys() {
        // Arrange
        let document = json!({
            "start": { "title": "The Pricing Dilemma" },
            "scenes": { "intro": { "description": "<p>Welcome</p>" } },
            "count": 3
        });

        // Act
        let translations = Translations::from_json(&document);

        // Assert
        assert_eq!(translations.len(), 3);
        assert_eq!(translations.t("start.title"), "The Pricing Dilemma");
        assert_eq!(translations.t("scenes.intro.description"), "<p>Welcome</p>");
        assert_eq!(translations.t("count"), "3");
    }

    #[test]
    fn test_missing_key_resolves_to_itself() {
        let translations = Translations::default();
        assert!(translations.is_empty());
        assert_eq!(translations.t("scenes.unknown"), "scenes.unknown");
    }

    #[test]
    fn test_identity_translator_returns_key() {
        assert_eq!(IdentityTranslator.t("literal text"), "literal text");
    }

    #[test]
    fn test_collects_from_pairs() {
        let translations: Translations = [("a.b", "value")].into_iter().collect();
        assert_eq!(translations.t("a.b"), "value");
    }
}
