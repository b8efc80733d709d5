//! Text fields with their own virtual keyboard.
//!
//! Each `KeyboardInput` owns one text value and one keyboard instance wired
//! to it, so a form with several script-specific fields holds several
//! independent inputs instead of one shared keyboard plus a selector.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::keyboard::{KeyHandler, KeyOutput, VirtualKeyboard};
use crate::layout::LayoutSet;
use crate::view::KeyboardView;

/// Caller-owned text edited by keyboard signals and direct typing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextValue {
    text: String,
}

impl TextValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replace the whole value (direct typing into the field).
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Append text at the end.
    pub fn append(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Remove the last character. Returns false on an empty value.
    pub fn delete_last(&mut self) -> bool {
        self.text.pop().is_some()
    }

    /// Apply one keyboard signal.
    pub fn apply(&mut self, output: KeyOutput) {
        match output {
            KeyOutput::Insert(text) => self.append(&text),
            KeyOutput::DeleteLast => {
                self.delete_last();
            }
        }
    }
}

impl From<&str> for TextValue {
    fn from(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl std::fmt::Display for TextValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Key handler writing into a shared `TextValue`.
pub struct ValueSink(Rc<RefCell<TextValue>>);

impl KeyHandler for ValueSink {
    fn on_key(&mut self, output: KeyOutput) {
        self.0.borrow_mut().apply(output);
    }
}

/// A text field with a toggleable virtual keyboard.
///
/// The keyboard starts closed. While closed it is not shown at all; the
/// field's own keyboard button opens it.
pub struct KeyboardInput {
    value: Rc<RefCell<TextValue>>,
    layouts: Arc<LayoutSet>,
    layout_id: String,
    keyboard: VirtualKeyboard<ValueSink>,
    placeholder: String,
}

impl KeyboardInput {
    /// Create an empty field whose keyboard opens on `layout_id`.
    pub fn new(layouts: Arc<LayoutSet>, layout_id: &str) -> Self {
        let value = Rc::new(RefCell::new(TextValue::new()));
        let keyboard =
            VirtualKeyboard::new(layouts.clone(), layout_id, false, (), ValueSink(value.clone()));
        Self {
            layout_id: keyboard.active_layout().to_string(),
            value,
            layouts,
            keyboard,
            placeholder: String::new(),
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Current text.
    pub fn value(&self) -> String {
        self.value.borrow().as_str().to_string()
    }

    /// Replace the text, as when the user types into the field directly.
    pub fn set_value(&mut self, text: impl Into<String>) {
        self.value.borrow_mut().set(text);
    }

    pub fn clear(&mut self) {
        self.value.borrow_mut().clear();
    }

    /// Press a key by label on this field's keyboard.
    pub fn press(&mut self, label: &str) {
        self.keyboard.activate_key(label);
    }

    /// Press the key drawn at a grid position. False if nothing was pressed.
    pub fn press_at(&mut self, row: usize, col: usize) -> bool {
        self.keyboard.activate_key_at(row, col)
    }

    /// Open or close the keyboard.
    ///
    /// Opening mounts a fresh keyboard on the field's own layout, so a layout
    /// cycled to before closing does not carry over.
    pub fn toggle_keyboard(&mut self) {
        if self.keyboard.is_visible() {
            self.keyboard.toggle_visibility();
            return;
        }
        self.keyboard = VirtualKeyboard::new(
            self.layouts.clone(),
            &self.layout_id,
            true,
            (),
            ValueSink(self.value.clone()),
        );
    }

    /// Layout the keyboard opens on.
    pub fn home_layout(&self) -> &str {
        &self.layout_id
    }

    pub fn is_keyboard_open(&self) -> bool {
        self.keyboard.is_visible()
    }

    pub fn cycle_layout(&mut self) {
        self.keyboard.cycle_layout();
    }

    pub fn active_layout(&self) -> &str {
        self.keyboard.active_layout()
    }

    /// The keyboard to draw under the field, if open.
    pub fn keyboard_view(&self) -> Option<KeyboardView> {
        self.keyboard.is_visible().then(|| self.keyboard.view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(layout: &str) -> KeyboardInput {
        KeyboardInput::new(Arc::new(LayoutSet::builtin()), layout)
    }

    #[test]
    fn delete_on_empty_is_noop() {
        let mut value = TextValue::new();
        assert!(!value.delete_last());
        value.apply(KeyOutput::DeleteLast);
        assert!(value.is_empty());
    }

    #[test]
    fn delete_removes_one_scalar() {
        let mut value = TextValue::from("بَ");
        value.apply(KeyOutput::DeleteLast);
        assert_eq!(value.as_str(), "ب");
    }

    #[test]
    fn typing_through_keyboard() {
        let mut input = field("urdu");
        input.press("س");
        input.press("ل");
        input.press("Space");
        input.press("ا");
        input.press("Backspace");
        assert_eq!(input.value(), "سل ");
    }

    #[test]
    fn direct_edit_and_keyboard_mix() {
        let mut input = field("roman");
        input.set_value("kit");
        input.press("ā");
        assert_eq!(input.value(), "kitā");
        input.clear();
        input.press("Backspace");
        assert_eq!(input.value(), "");
    }

    #[test]
    fn keyboard_hidden_until_toggled() {
        let mut input = field("pashto");
        assert!(input.keyboard_view().is_none());
        assert!(!input.press_at(0, 0));
        input.toggle_keyboard();
        assert!(input.is_keyboard_open());
        assert!(input.press_at(0, 0));
        assert_eq!(input.value(), "ا");
        let view = input.keyboard_view().unwrap();
        assert_eq!(view.rows().len(), 7);
    }

    #[test]
    fn reopening_restores_field_layout() {
        let mut input = field("urdu");
        input.toggle_keyboard();
        input.cycle_layout();
        assert_eq!(input.active_layout(), "pashto");
        input.press("ټ");
        input.toggle_keyboard();
        assert!(!input.is_keyboard_open());
        input.toggle_keyboard();
        assert_eq!(input.active_layout(), "urdu");
        assert_eq!(input.home_layout(), "urdu");
        assert_eq!(input.value(), "ټ");
    }

    #[test]
    fn unknown_field_layout_opens_default() {
        let mut input = field("sindhi");
        input.toggle_keyboard();
        assert_eq!(input.active_layout(), "roman");
    }

    #[test]
    fn fields_do_not_share_state() {
        let layouts = Arc::new(LayoutSet::builtin());
        let mut word = KeyboardInput::new(layouts.clone(), "pashto");
        let mut urdu = KeyboardInput::new(layouts, "urdu");
        word.press("ټ");
        urdu.press("ٹ");
        word.cycle_layout();
        assert_eq!(word.value(), "ټ");
        assert_eq!(urdu.value(), "ٹ");
        assert_eq!(word.active_layout(), "roman");
        assert_eq!(urdu.active_layout(), "urdu");
    }
}
