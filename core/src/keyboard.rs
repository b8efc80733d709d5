//! Virtual keyboard input mapper.
//!
//! `VirtualKeyboard` turns on-screen key activations into edit signals for
//! a text value it does not own. The caller supplies two handlers: one
//! receiving `KeyOutput`s, one told whenever the keyboard is opened or
//! closed. Every activation produces exactly one `KeyOutput`; there is no
//! batching and nothing is read back from the caller's text.

use std::sync::Arc;

use crate::layout::{KeyLabel, Layout, LayoutSet};
use crate::view::{ExpandedView, KeyboardView, OPEN_KEYBOARD_CAPTION};

/// Edit signal produced by one key activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutput {
    /// Append this text to the value (a single space for the space key)
    Insert(String),
    /// Remove the last character of the value
    DeleteLast,
}

impl KeyOutput {
    /// Map a raw key label to its edit signal.
    pub fn from_label(label: &str) -> Self {
        match KeyLabel::parse(label) {
            KeyLabel::Char(text) => KeyOutput::Insert(text.to_string()),
            KeyLabel::Space => KeyOutput::Insert(" ".to_string()),
            KeyLabel::Delete => KeyOutput::DeleteLast,
        }
    }
}

/// Receives the edit signal of each activated key.
pub trait KeyHandler {
    fn on_key(&mut self, output: KeyOutput);
}

impl<F: FnMut(KeyOutput)> KeyHandler for F {
    fn on_key(&mut self, output: KeyOutput) {
        self(output)
    }
}

/// Told the new visibility whenever the keyboard is opened or closed.
pub trait ToggleHandler {
    fn on_toggle(&mut self, visible: bool);
}

impl<F: FnMut(bool)> ToggleHandler for F {
    fn on_toggle(&mut self, visible: bool) {
        self(visible)
    }
}

/// Ignores visibility changes.
impl ToggleHandler for () {
    fn on_toggle(&mut self, _visible: bool) {}
}

/// On-screen keyboard bound to a caller-owned text value.
pub struct VirtualKeyboard<K: KeyHandler, T: ToggleHandler = ()> {
    layouts: Arc<LayoutSet>,
    active: String,
    visible: bool,
    on_toggle: T,
    on_key: K,
}

impl<K: KeyHandler, T: ToggleHandler> VirtualKeyboard<K, T> {
    /// Mount a keyboard showing `layout_id`.
    ///
    /// Unknown ids silently select the set's default layout.
    pub fn new(
        layouts: Arc<LayoutSet>,
        layout_id: &str,
        visible: bool,
        on_toggle: T,
        on_key: K,
    ) -> Self {
        let active = layouts.resolve(layout_id).id.clone();
        Self {
            layouts,
            active,
            visible,
            on_toggle,
            on_key,
        }
    }

    /// Activate a key by its raw label.
    pub fn activate_key(&mut self, label: &str) {
        let output = KeyOutput::from_label(label);
        tracing::trace!(label, ?output, "key activated");
        self.on_key.on_key(output);
    }

    /// Activate the key drawn at `row`, `col` of the active layout.
    ///
    /// Returns false, without calling the handler, when the keyboard is
    /// collapsed or the position is off the grid.
    pub fn activate_key_at(&mut self, row: usize, col: usize) -> bool {
        if !self.visible {
            return false;
        }
        let output = match self.layout().label_at(row, col) {
            Some(label) => KeyOutput::from_label(label),
            None => return false,
        };
        self.on_key.on_key(output);
        true
    }

    /// Switch to the next layout in cycle order.
    pub fn cycle_layout(&mut self) {
        let next = self.layouts.next_id(&self.active).to_string();
        tracing::debug!(from = %self.active, to = %next, "cycling keyboard layout");
        self.active = next;
    }

    /// Flip between the collapsed button and the full grid.
    pub fn toggle_visibility(&mut self) {
        self.visible = !self.visible;
        self.on_toggle.on_toggle(self.visible);
    }

    /// Id of the active layout.
    pub fn active_layout(&self) -> &str {
        &self.active
    }

    /// The active layout's table.
    pub fn layout(&self) -> &Layout {
        self.layouts.resolve(&self.active)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Current presentation.
    pub fn view(&self) -> KeyboardView {
        if self.visible {
            KeyboardView::Expanded(ExpandedView::from_layout(self.layout()))
        } else {
            KeyboardView::Collapsed {
                caption: OPEN_KEYBOARD_CAPTION,
            }
        }
    }
}
