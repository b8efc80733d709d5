//! Dictionary records as exchanged with the backend.

use serde::{Deserialize, Serialize};

/// Moderation state of a word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum WordStatus {
    #[default]
    Pending,
    Approved,
    Hidden,
}

impl std::fmt::Display for WordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            WordStatus::Pending => "Pending",
            WordStatus::Approved => "Approved",
            WordStatus::Hidden => "Hidden",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Image URL
    #[serde(default)]
    pub image: Option<String>,
}

/// A word's category, either populated or as a bare id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Populated(Category),
    Id(String),
}

impl CategoryRef {
    pub fn id(&self) -> &str {
        match self {
            CategoryRef::Populated(c) => &c.id,
            CategoryRef::Id(id) => id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            CategoryRef::Populated(c) => Some(&c.name),
            CategoryRef::Id(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Translation {
    #[serde(default)]
    pub english: String,
    #[serde(default)]
    pub urdu: String,
    #[serde(default)]
    pub roman: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Word {
    #[serde(rename = "_id")]
    pub id: String,
    /// Headword in Pashto script
    pub word: String,
    #[serde(default)]
    pub translation: Translation,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub status: WordStatus,
    /// Audio URL
    #[serde(default)]
    pub audio: Option<String>,
    /// Image URL
    #[serde(default)]
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_with_populated_category() {
        let json = r#"{
            "_id": "w1",
            "word": "ښار",
            "translation": {"english": "city", "urdu": "شہر", "roman": "ṣār"},
            "category": {"_id": "c1", "name": "Places"},
            "status": "Approved"
        }"#;
        let word: Word = serde_json::from_str(json).unwrap();
        assert_eq!(word.status, WordStatus::Approved);
        let cat = word.category.unwrap();
        assert_eq!(cat.id(), "c1");
        assert_eq!(cat.name(), Some("Places"));
        assert!(word.audio.is_none());
    }

    #[test]
    fn word_with_bare_category_id() {
        let json = r#"{"_id": "w2", "word": "اوبه", "category": "c9"}"#;
        let word: Word = serde_json::from_str(json).unwrap();
        assert_eq!(word.category, Some(CategoryRef::Id("c9".into())));
        assert_eq!(word.status, WordStatus::Pending);
        assert_eq!(word.translation, Translation::default());
    }
}
