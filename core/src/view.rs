//! Render data for the virtual keyboard.
//!
//! `KeyboardView` is a plain data container. After each keyboard
//! operation the host reads it to draw either the collapsed affordance
//! button or the full grid. Nothing here calls back into the keyboard.

use crate::layout::{KeyLabel, Layout};

/// Caption of the collapsed "open keyboard" button.
pub const OPEN_KEYBOARD_CAPTION: &str = "Keyboard";

/// What kind of key a cap represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Char,
    Space,
    Delete,
}

/// One rendered key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCap {
    /// Raw label, passed back to `activate_key` when clicked
    pub label: String,
    /// Text drawn on the cap
    pub glyph: String,
    pub kind: KeyKind,
}

impl KeyCap {
    fn from_label(raw: &str) -> Self {
        let parsed = KeyLabel::parse(raw);
        let kind = match parsed {
            KeyLabel::Char(_) => KeyKind::Char,
            KeyLabel::Space => KeyKind::Space,
            KeyLabel::Delete => KeyKind::Delete,
        };
        Self {
            label: raw.to_string(),
            glyph: parsed.glyph().to_string(),
            kind,
        }
    }

    /// Space keys are drawn wider than the rest.
    pub fn is_wide(&self) -> bool {
        self.kind == KeyKind::Space
    }
}

/// Expanded keyboard: header plus key grid.
///
/// # Fields
///
/// - `layout_id`: id of the active layout
/// - `title`: header text on the cycle button (e.g. "Urdu")
/// - `rows`: key caps, top to bottom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedView {
    pub layout_id: String,
    pub title: String,
    pub rows: Vec<Vec<KeyCap>>,
}

impl ExpandedView {
    pub(crate) fn from_layout(layout: &Layout) -> Self {
        Self {
            layout_id: layout.id.clone(),
            title: layout.title(),
            rows: layout
                .rows
                .iter()
                .map(|row| row.iter().map(|raw| KeyCap::from_label(raw)).collect())
                .collect(),
        }
    }
}

/// Presentation of a keyboard at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyboardView {
    /// Single "open keyboard" button
    Collapsed { caption: &'static str },
    /// Header with cycle and close controls, then the grid
    Expanded(ExpandedView),
}

impl KeyboardView {
    pub fn is_expanded(&self) -> bool {
        matches!(self, KeyboardView::Expanded(_))
    }

    /// Grid rows, empty while collapsed.
    pub fn rows(&self) -> &[Vec<KeyCap>] {
        match self {
            KeyboardView::Collapsed { .. } => &[],
            KeyboardView::Expanded(view) => &view.rows,
        }
    }

    /// Draw the view as plain text, one key row per line.
    pub fn to_text(&self) -> String {
        match self {
            KeyboardView::Collapsed { caption } => format!("[{}]", caption),
            KeyboardView::Expanded(view) => {
                let mut out = format!("[{}] [x]\n", view.title);
                for row in &view.rows {
                    let caps: Vec<&str> = row.iter().map(|cap| cap.glyph.as_str()).collect();
                    out.push_str(&caps.join(" "));
                    out.push('\n');
                }
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutSet;

    #[test]
    fn control_caps_use_symbols() {
        let set = LayoutSet::builtin();
        let view = ExpandedView::from_layout(set.resolve("roman"));
        let last = view.rows.last().unwrap();
        assert_eq!(last[0].glyph, "⎵");
        assert!(last[0].is_wide());
        assert_eq!(last[1].glyph, "⌫");
        assert_eq!(last[1].label, "Backspace");
        assert_eq!(view.title, "Roman");
    }

    #[test]
    fn collapsed_has_no_rows() {
        let view = KeyboardView::Collapsed {
            caption: OPEN_KEYBOARD_CAPTION,
        };
        assert!(view.rows().is_empty());
        assert_eq!(view.to_text(), "[Keyboard]");
    }
}
