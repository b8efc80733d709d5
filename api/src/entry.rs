//! Filling word and category forms from the terminal.
//!
//! Keyboard-backed fields are typed through the terminal keyboard (see
//! `repl`), one field at a time, each finished with `:done`. Plain fields
//! take a single line; an empty line keeps the current value.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use thiserror::Error;

use lexisium_core::{
    CategoryForm, FilePicker, FormError, KeyboardInput, SubmitPlan, TextValue, WordDraft, WordForm,
};

use crate::files::{load_media, PathPicker};
use crate::repl;

#[derive(Debug, Error)]
pub enum EntryError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Form(#[from] FormError),
}

/// Type one keyboard-backed field. The keyboard opens on the field's layout
/// and is closed again afterwards.
pub fn fill_keyboard_field<R: BufRead, W: Write>(
    label: &str,
    input: &mut KeyboardInput,
    reader: &mut R,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "{} ({} keyboard, ':done' to finish)", label, input.home_layout())?;
    let current = input.value();
    if !current.is_empty() {
        writeln!(out, "  current: {}", current)?;
    }
    if !input.is_keyboard_open() {
        input.toggle_keyboard();
    }
    repl::run(input, &mut *reader, out)?;
    input.toggle_keyboard();
    Ok(())
}

/// Read one plain-text field from a single line.
pub fn fill_text_field<R: BufRead, W: Write>(
    label: &str,
    value: &mut TextValue,
    reader: &mut R,
    out: &mut W,
) -> io::Result<()> {
    if value.is_empty() {
        write!(out, "{}: ", label)?;
    } else {
        write!(out, "{} [{}]: ", label, value)?;
    }
    out.flush()?;
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let line = line.trim();
    if !line.is_empty() {
        value.set(line);
    }
    Ok(())
}

/// Yes/no question; anything but `y` or `yes` is no.
pub fn confirm<R: BufRead, W: Write>(prompt: &str, reader: &mut R, out: &mut W) -> io::Result<bool> {
    write!(out, "{} [y/N] ", prompt)?;
    out.flush()?;
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

pub fn fill_word_form<R: BufRead, W: Write>(
    form: &mut WordForm,
    reader: &mut R,
    out: &mut W,
) -> io::Result<()> {
    fill_keyboard_field("Word", &mut form.word, reader, out)?;
    fill_text_field("English", &mut form.english, reader, out)?;
    fill_keyboard_field("Urdu", &mut form.urdu, reader, out)?;
    fill_keyboard_field("Roman", &mut form.roman, reader, out)?;
    fill_keyboard_field("Description", &mut form.description, reader, out)
}

/// Carry files named on the command line into the form.
///
/// Sizes are not checked here; `prepare` reports oversize files so the
/// user can choose to submit the text alone.
pub fn attach_word_media(
    form: &mut WordForm,
    image: Option<PathBuf>,
    audio: Option<PathBuf>,
) -> Result<(), FormError> {
    let image = PathPicker::new(image).pick_image()?;
    let audio = audio.as_deref().map(load_media).transpose()?;
    let image = image.or_else(|| form.image().cloned());
    let audio = audio.or_else(|| form.audio().cloned());
    form.set_media(audio, image);
    Ok(())
}

/// Validate the form and settle oversize media with the user.
///
/// `None` when the user declined to submit without the media.
pub fn resolve_submit<R: BufRead, W: Write>(
    form: &WordForm,
    reader: &mut R,
    out: &mut W,
) -> Result<Option<WordDraft>, EntryError> {
    match form.prepare()? {
        SubmitPlan::Ready(draft) => Ok(Some(draft)),
        SubmitPlan::NeedsConfirmation { prompt, text_only } => {
            Ok(confirm(prompt, reader, out)?.then_some(text_only))
        }
    }
}

pub fn fill_category_form<R: BufRead, W: Write>(
    form: &mut CategoryForm,
    reader: &mut R,
    out: &mut W,
) -> io::Result<()> {
    fill_text_field("Name", &mut form.name, reader, out)?;
    fill_keyboard_field("Description", &mut form.description, reader, out)
}

pub fn attach_category_image(form: &mut CategoryForm, image: Option<PathBuf>) -> Result<(), FormError> {
    if let Some(file) = PathPicker::new(image).pick_image()? {
        form.attach_image(file)?;
    }
    Ok(())
}
