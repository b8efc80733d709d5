//! Word and category entry forms.
//!
//! Forms hold one `KeyboardInput` per script-specific field and turn their
//! contents into drafts for the backend. Validation mirrors what the
//! admin screens enforce before uploading.

use std::sync::Arc;
use thiserror::Error;

use crate::input::{KeyboardInput, TextValue};
use crate::layout::LayoutSet;
use crate::media::{AudioCapture, AudioRecorder, FilePicker, MediaError, MediaFile, MAX_AUDIO_BYTES, MAX_IMAGE_BYTES};
use crate::model::{Category, Translation, Word};

/// Shown when attached media is too large to upload.
pub const OVERSIZE_MEDIA_PROMPT: &str =
    "Image or Audio file size is too large and cannot be uploaded. Do you want to proceed with just the text data?";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please enter a word")]
    MissingWord,
    #[error("Please enter a category name")]
    MissingCategoryName,
    #[error("Image size must be less than 5MB ({size} bytes)")]
    ImageTooLarge { size: usize },
    #[error("Audio size must be less than 2MB ({size} bytes)")]
    AudioTooLarge { size: usize },
    #[error(transparent)]
    Media(#[from] MediaError),
}

/// A word ready to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordDraft {
    pub word: String,
    pub translation: Translation,
    pub category: Option<String>,
    pub description: String,
    pub audio: Option<MediaFile>,
    pub image: Option<MediaFile>,
}

impl WordDraft {
    /// The translation as the JSON string the backend stores.
    pub fn translation_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.translation)
    }

    /// Same draft without attachments.
    pub fn without_media(mut self) -> Self {
        self.audio = None;
        self.image = None;
        self
    }
}

/// What to do with a validated form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitPlan {
    /// Upload as-is
    Ready(WordDraft),
    /// Media is oversize; ask before uploading the text-only draft
    NeedsConfirmation {
        prompt: &'static str,
        text_only: WordDraft,
    },
}

/// Entry form for a dictionary word.
pub struct WordForm {
    /// Pashto headword
    pub word: KeyboardInput,
    pub english: TextValue,
    pub urdu: KeyboardInput,
    pub roman: KeyboardInput,
    pub description: KeyboardInput,
    category: Option<String>,
    audio: Option<MediaFile>,
    image: Option<MediaFile>,
}

impl WordForm {
    pub fn new(layouts: Arc<LayoutSet>) -> Self {
        Self {
            word: KeyboardInput::new(layouts.clone(), "pashto").with_placeholder("پښتو کلمه"),
            english: TextValue::new(),
            urdu: KeyboardInput::new(layouts.clone(), "urdu").with_placeholder("اردو ترجمہ"),
            roman: KeyboardInput::new(layouts.clone(), "roman").with_placeholder("Roman Translation"),
            description: KeyboardInput::new(layouts, "urdu")
                .with_placeholder("Additional description or notes..."),
            category: None,
            audio: None,
            image: None,
        }
    }

    /// Form prefilled for editing an existing word.
    pub fn from_word(layouts: Arc<LayoutSet>, word: &Word) -> Self {
        let mut form = Self::new(layouts);
        form.word.set_value(word.word.as_str());
        form.english.set(word.translation.english.as_str());
        form.urdu.set_value(word.translation.urdu.as_str());
        form.roman.set_value(word.translation.roman.as_str());
        form.description.set_value(word.description.as_str());
        form.category = word.category.as_ref().map(|c| c.id().to_string());
        form
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn set_category(&mut self, id: Option<String>) {
        self.category = id.filter(|id| !id.is_empty());
    }

    /// Attach an image, rejecting files over the upload limit.
    pub fn attach_image(&mut self, file: MediaFile) -> Result<(), FormError> {
        if file.size() > MAX_IMAGE_BYTES {
            tracing::warn!(size = file.size(), "image rejected");
            return Err(FormError::ImageTooLarge { size: file.size() });
        }
        self.image = Some(file);
        Ok(())
    }

    /// Attach an audio clip, rejecting files over the upload limit.
    pub fn attach_audio(&mut self, file: MediaFile) -> Result<(), FormError> {
        if file.size() > MAX_AUDIO_BYTES {
            tracing::warn!(size = file.size(), "audio rejected");
            return Err(FormError::AudioTooLarge { size: file.size() });
        }
        self.audio = Some(file);
        Ok(())
    }

    /// Ask the picker for an image. Returns false if the user cancelled.
    pub fn pick_image<P: FilePicker>(&mut self, picker: &mut P) -> Result<bool, FormError> {
        match picker.pick_image()? {
            Some(file) => {
                self.attach_image(file)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Take the recorder's finished clip, or drop the current one if it has none.
    pub fn attach_recording<C: AudioCapture>(
        &mut self,
        recorder: &AudioRecorder<C>,
    ) -> Result<(), FormError> {
        match recorder.recording() {
            Some(file) => self.attach_audio(file.clone()),
            None => {
                self.audio = None;
                Ok(())
            }
        }
    }

    /// Replace both attachments without the per-file limit check, e.g. when
    /// carrying files over from another form. `prepare` still guards them.
    pub fn set_media(&mut self, audio: Option<MediaFile>, image: Option<MediaFile>) {
        self.audio = audio;
        self.image = image;
    }

    pub fn image(&self) -> Option<&MediaFile> {
        self.image.as_ref()
    }

    pub fn audio(&self) -> Option<&MediaFile> {
        self.audio.as_ref()
    }

    pub fn clear_image(&mut self) {
        self.image = None;
    }

    pub fn clear_audio(&mut self) {
        self.audio = None;
    }

    /// Validate and decide how to submit.
    pub fn prepare(&self) -> Result<SubmitPlan, FormError> {
        let word = self.word.value();
        if word.trim().is_empty() {
            return Err(FormError::MissingWord);
        }

        let draft = WordDraft {
            word,
            translation: Translation {
                english: self.english.as_str().to_string(),
                urdu: self.urdu.value(),
                roman: self.roman.value(),
            },
            category: self.category.clone(),
            description: self.description.value(),
            audio: self.audio.clone(),
            image: self.image.clone(),
        };

        let oversize = draft.image.as_ref().is_some_and(|f| f.size() > MAX_IMAGE_BYTES)
            || draft.audio.as_ref().is_some_and(|f| f.size() > MAX_AUDIO_BYTES);
        if oversize {
            return Ok(SubmitPlan::NeedsConfirmation {
                prompt: OVERSIZE_MEDIA_PROMPT,
                text_only: draft.without_media(),
            });
        }
        Ok(SubmitPlan::Ready(draft))
    }

    /// Clear every field and attachment.
    pub fn reset(&mut self) {
        self.word.clear();
        self.english.clear();
        self.urdu.clear();
        self.roman.clear();
        self.description.clear();
        self.category = None;
        self.audio = None;
        self.image = None;
    }
}

/// A category ready to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub description: String,
    pub image: Option<MediaFile>,
}

/// Entry form for a category.
pub struct CategoryForm {
    pub name: TextValue,
    pub description: KeyboardInput,
    image: Option<MediaFile>,
}

impl CategoryForm {
    pub fn new(layouts: Arc<LayoutSet>) -> Self {
        Self {
            name: TextValue::new(),
            description: KeyboardInput::new(layouts, "roman"),
            image: None,
        }
    }

    /// Form prefilled for editing an existing category.
    pub fn from_category(layouts: Arc<LayoutSet>, category: &Category) -> Self {
        let mut form = Self::new(layouts);
        form.name.set(category.name.as_str());
        form.description.set_value(category.description.as_str());
        form
    }

    pub fn image(&self) -> Option<&MediaFile> {
        self.image.as_ref()
    }

    pub fn attach_image(&mut self, file: MediaFile) -> Result<(), FormError> {
        if file.size() > MAX_IMAGE_BYTES {
            tracing::warn!(size = file.size(), "category image rejected");
            return Err(FormError::ImageTooLarge { size: file.size() });
        }
        self.image = Some(file);
        Ok(())
    }

    pub fn prepare(&self) -> Result<CategoryDraft, FormError> {
        if self.name.as_str().trim().is_empty() {
            return Err(FormError::MissingCategoryName);
        }
        Ok(CategoryDraft {
            name: self.name.as_str().to_string(),
            description: self.description.value(),
            image: self.image.clone(),
        })
    }

    pub fn reset(&mut self) {
        self.name.clear();
        self.description.clear();
        self.image = None;
    }
}
