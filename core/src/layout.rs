//! Keyboard layout tables.
//!
//! A layout is a named grid of key labels for one script. Two labels are
//! reserved for control keys (`"Space"` and `"Backspace"`); every other
//! label is inserted verbatim when its key is activated.
//!
//! The built-in set holds the Urdu, Pashto and Roman tables. Repeated
//! letters inside a table (the Pashto grid has several) are configuration
//! data and are kept as-is: each copy is an independent key.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw label of the space control key.
pub const SPACE_LABEL: &str = "Space";

/// Raw label of the delete-last-character control key.
pub const DELETE_LABEL: &str = "Backspace";

/// Identifier of the layout used when a caller asks for an unknown one.
pub const DEFAULT_LAYOUT: &str = "roman";

const URDU: &[&[&str]] = &[
    &["ا", "ب", "پ", "ت", "ٹ", "ث", "ج", "چ", "ح", "خ"],
    &["د", "ڈ", "ذ", "ر", "ڑ", "ز", "ژ", "س", "ش", "ص"],
    &["ض", "ط", "ظ", "ع", "غ", "ف", "ق", "ک", "گ", "ل"],
    &["م", "ن", "ں", "و", "ہ", "ھ", "ء", "ی", "ے", "۔"],
    &["آ", "أ", "إ", "ؤ", "ئ", "ة", "ً", "ٌ", "ٍ", "َ"],
    &["ُ", "ِ", "ّ", "ْ", "٠", "١", "٢", "٣", "٤", "٥"],
    &["٦", "٧", "٨", "٩", "Space", "Backspace"],
];

const PASHTO: &[&[&str]] = &[
    &["ا", "آ", "أ", "پ", "ب", "ت", "ټ", "ث", "ج", "چ"],
    &["ح", "خ", "د", "ډ", "ذ", "ر", "ړ", "ز", "ژ", "ږ"],
    &["س", "ش", "ښ", "ص", "ض", "ط", "ظ", "ع", "غ", "ف", "ق"],
    &["ک", "ګ", "ګ", "م", "ن", "ڼ", "و", "ؤ", "ه", "ۀ"],
    &["ي", "ی", "ۍ", "ې", "ۍ", "ي", "ى", "ځ", "څ", "ښ"],
    &["ل", "ب", "پ", "ئ", "ئ\u{200C}", "ة", "ژ", "ط", "ظ", "ړ"],
    &["٠", "١", "٢", "٣", "٤", "٥", "٦", "٧", "٨", "٩", "Space", "Backspace"],
];

const ROMAN: &[&[&str]] = &[
    &["q", "w", "e", "r", "t", "y", "u", "i", "o", "p"],
    &["a", "s", "d", "f", "g", "h", "j", "k", "l"],
    &["z", "x", "c", "v", "b", "n", "m"],
    &["ā", "ē", "ī", "ō", "ū", "ṅ", "ṭ", "ḍ", "ṛ", "ṣ"],
    &["Space", "Backspace"],
];

/// A single cell of a layout, classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLabel<'a> {
    /// Ordinary key; the label text is what gets inserted
    Char(&'a str),
    /// Space control key
    Space,
    /// Delete-last-character control key
    Delete,
}

impl<'a> KeyLabel<'a> {
    /// Classify a raw label string.
    pub fn parse(raw: &'a str) -> Self {
        match raw {
            SPACE_LABEL => KeyLabel::Space,
            DELETE_LABEL => KeyLabel::Delete,
            other => KeyLabel::Char(other),
        }
    }

    /// Text shown on the key cap.
    pub fn glyph(&self) -> &'a str {
        match *self {
            KeyLabel::Char(text) => text,
            KeyLabel::Space => "⎵",
            KeyLabel::Delete => "⌫",
        }
    }

    /// True for the two reserved control labels.
    pub fn is_control(&self) -> bool {
        !matches!(self, KeyLabel::Char(_))
    }
}

/// Errors raised when registering layouts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout id must not be empty")]
    EmptyId,
    #[error("layout '{id}' has no '{label}' key")]
    MissingControl { id: String, label: &'static str },
    #[error("default layout '{0}' is not configured")]
    UnknownDefault(String),
}

/// A named, ordered grid of key labels for one script.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Layout {
    /// Script/language identifier (e.g. "urdu")
    pub id: String,
    /// Rows of raw key labels, top to bottom
    pub rows: Vec<Vec<String>>,
}

impl Layout {
    /// Create a layout from owned rows.
    pub fn new(id: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            id: id.into(),
            rows,
        }
    }

    fn from_static(id: &str, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect();
        Self::new(id, rows)
    }

    /// Human-facing name, the id with its first letter upper-cased.
    pub fn title(&self) -> String {
        let mut chars = self.id.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Raw label at a grid position.
    pub fn label_at(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Iterate over every label, row by row.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(String::as_str)
    }

    /// Total number of keys, control keys included.
    pub fn key_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Check that the layout can be used by a keyboard.
    ///
    /// Both control keys must be present somewhere in the grid; their
    /// position does not matter.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.id.trim().is_empty() {
            return Err(LayoutError::EmptyId);
        }
        for (label, control) in [(SPACE_LABEL, KeyLabel::Space), (DELETE_LABEL, KeyLabel::Delete)] {
            if !self.labels().any(|raw| KeyLabel::parse(raw) == control) {
                return Err(LayoutError::MissingControl {
                    id: self.id.clone(),
                    label,
                });
            }
        }
        Ok(())
    }
}

/// The configured layouts, in cycle order, plus the fallback layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSet {
    layouts: Vec<Layout>,
    default_id: String,
}

impl LayoutSet {
    /// The three built-in layouts: urdu → pashto → roman, default roman.
    pub fn builtin() -> Self {
        Self {
            layouts: vec![
                Layout::from_static("urdu", URDU),
                Layout::from_static("pashto", PASHTO),
                Layout::from_static("roman", ROMAN),
            ],
            default_id: DEFAULT_LAYOUT.to_string(),
        }
    }

    /// Build the layout set described by a configuration.
    ///
    /// Configured layouts replace built-ins with the same id in place and
    /// are appended to the cycle otherwise.
    pub fn from_config(config: &crate::Config) -> Result<Self, LayoutError> {
        let mut set = Self::builtin();
        for layout in &config.layouts {
            set.insert(layout.clone())?;
        }
        set.set_default(&config.default_layout)?;
        Ok(set)
    }

    /// Register a layout, replacing an existing one with the same id.
    pub fn insert(&mut self, layout: Layout) -> Result<(), LayoutError> {
        layout.validate()?;
        match self.layouts.iter_mut().find(|l| l.id == layout.id) {
            Some(existing) => *existing = layout,
            None => self.layouts.push(layout),
        }
        Ok(())
    }

    /// Change the fallback layout.
    pub fn set_default(&mut self, id: &str) -> Result<(), LayoutError> {
        if self.get(id).is_none() {
            return Err(LayoutError::UnknownDefault(id.to_string()));
        }
        self.default_id = id.to_string();
        Ok(())
    }

    /// Id of the fallback layout.
    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    /// Look up a layout by id.
    pub fn get(&self, id: &str) -> Option<&Layout> {
        self.layouts.iter().find(|l| l.id == id)
    }

    /// Look up a layout, falling back to the default for unknown ids.
    pub fn resolve(&self, id: &str) -> &Layout {
        if let Some(layout) = self.get(id) {
            return layout;
        }
        tracing::debug!(requested = id, fallback = %self.default_id, "unknown layout, using default");
        // Sets start from the built-ins and never shrink.
        self.get(&self.default_id).unwrap_or(&self.layouts[0])
    }

    /// Id following `id` in cycle order. Unknown ids restart the cycle.
    pub fn next_id(&self, id: &str) -> &str {
        let next = match self.layouts.iter().position(|l| l.id == id) {
            Some(idx) => (idx + 1) % self.layouts.len(),
            None => 0,
        };
        &self.layouts[next].id
    }

    /// Layout ids in cycle order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.layouts.iter().map(|l| l.id.as_str())
    }

    /// Layouts in cycle order.
    pub fn iter(&self) -> impl Iterator<Item = &Layout> {
        self.layouts.iter()
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

impl Default for LayoutSet {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_layouts_are_valid() {
        let set = LayoutSet::builtin();
        assert_eq!(set.ids().collect::<Vec<_>>(), vec!["urdu", "pashto", "roman"]);
        for layout in set.iter() {
            assert!(layout.validate().is_ok(), "{} invalid", layout.id);
        }
    }

    #[test]
    fn parse_control_labels() {
        assert_eq!(KeyLabel::parse("Space"), KeyLabel::Space);
        assert_eq!(KeyLabel::parse("Backspace"), KeyLabel::Delete);
        assert_eq!(KeyLabel::parse("ا"), KeyLabel::Char("ا"));
        assert_eq!(KeyLabel::parse("space"), KeyLabel::Char("space"));
        assert_eq!(KeyLabel::Delete.glyph(), "⌫");
    }

    #[test]
    fn resolve_unknown_falls_back_to_roman() {
        let set = LayoutSet::builtin();
        assert_eq!(set.resolve("klingon").id, "roman");
        assert_eq!(set.resolve("urdu").id, "urdu");
    }

    #[test]
    fn next_id_wraps_around() {
        let set = LayoutSet::builtin();
        assert_eq!(set.next_id("urdu"), "pashto");
        assert_eq!(set.next_id("pashto"), "roman");
        assert_eq!(set.next_id("roman"), "urdu");
        assert_eq!(set.next_id("unknown"), "urdu");
    }

    #[test]
    fn pashto_duplicates_are_preserved() {
        let set = LayoutSet::builtin();
        let pashto = set.get("pashto").unwrap();
        assert_eq!(pashto.label_at(3, 1), Some("ګ"));
        assert_eq!(pashto.label_at(3, 2), Some("ګ"));
        assert_eq!(pashto.label_at(5, 4), Some("ئ\u{200C}"));
    }

    #[test]
    fn insert_rejects_layout_without_controls() {
        let mut set = LayoutSet::builtin();
        let bad = Layout::new("greek", vec![vec!["α".into(), "Space".into()]]);
        assert_eq!(
            set.insert(bad),
            Err(LayoutError::MissingControl {
                id: "greek".into(),
                label: DELETE_LABEL
            })
        );
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut set = LayoutSet::builtin();
        let roman = Layout::new("roman", vec![vec!["Backspace".into(), "x".into(), "Space".into()]]);
        set.insert(roman).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.get("roman").unwrap().key_count(), 3);
        assert_eq!(set.next_id("pashto"), "roman");
    }

    #[test]
    fn title_capitalizes_id() {
        let set = LayoutSet::builtin();
        assert_eq!(set.resolve("pashto").title(), "Pashto");
    }
}
