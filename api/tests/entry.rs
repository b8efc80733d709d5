// api/tests/entry.rs
//
// Filling forms from scripted terminal input.

use std::io::Cursor;
use std::sync::Arc;

use lexisium_api::entry;
use lexisium_core::{
    CategoryForm, FormError, LayoutSet, MediaError, Translation, WordForm, MAX_AUDIO_BYTES,
    MAX_IMAGE_BYTES,
};

fn layouts() -> Arc<LayoutSet> {
    Arc::new(LayoutSet::builtin())
}

const WORD_SCRIPT: &str = "ګ ل\n:done\nflower\nپ ھ و ل\n:done\ng u l\n:done\n:done\n";

#[test]
fn word_form_fields_filled_in_order() {
    let mut form = WordForm::new(layouts());
    form.set_category(Some("c1".into()));
    let mut reader = Cursor::new(WORD_SCRIPT.to_string());
    let mut out = Vec::new();
    entry::fill_word_form(&mut form, &mut reader, &mut out).unwrap();

    let draft = entry::resolve_submit(&form, &mut reader, &mut out)
        .unwrap()
        .unwrap();
    assert_eq!(draft.word, "ګل");
    assert_eq!(
        draft.translation,
        Translation {
            english: "flower".into(),
            urdu: "پھول".into(),
            roman: "gul".into(),
        }
    );
    assert!(draft.description.is_empty());
    assert!(!form.word.is_keyboard_open());

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Word (pashto keyboard"));
    assert!(out.contains("[urdu] پھول"));
}

#[test]
fn edit_keeps_fields_left_blank() {
    let mut form = WordForm::new(layouts());
    form.word.set_value("اوبه");
    form.english.set("water");
    let mut reader = Cursor::new(":done\n\n:done\n:done\n:done\n".to_string());
    let mut out = Vec::new();
    entry::fill_word_form(&mut form, &mut reader, &mut out).unwrap();
    assert_eq!(form.word.value(), "اوبه");
    assert_eq!(form.english.as_str(), "water");
    assert!(String::from_utf8(out).unwrap().contains("English [water]: "));
}

#[test]
fn oversize_audio_needs_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let audio = dir.path().join("clip.webm");
    let image = dir.path().join("flower.png");
    std::fs::write(&audio, vec![0u8; MAX_AUDIO_BYTES + 1]).unwrap();
    std::fs::write(&image, vec![0u8; 32]).unwrap();

    let mut form = WordForm::new(layouts());
    form.word.set_value("ګل");
    entry::attach_word_media(&mut form, Some(image), Some(audio)).unwrap();
    assert_eq!(form.image().map(|f| f.mime.as_str()), Some("image/png"));
    assert_eq!(form.audio().map(|f| f.name.as_str()), Some("clip.webm"));

    let mut out = Vec::new();
    let declined =
        entry::resolve_submit(&form, &mut Cursor::new("n\n".to_string()), &mut out).unwrap();
    assert!(declined.is_none());
    assert!(String::from_utf8(out).unwrap().contains("[y/N]"));

    let accepted = entry::resolve_submit(&form, &mut Cursor::new("yes\n".to_string()), &mut Vec::new())
        .unwrap()
        .unwrap();
    assert_eq!(accepted.word, "ګل");
    assert!(accepted.audio.is_none());
    assert!(accepted.image.is_none());
}

#[test]
fn media_paths_fall_back_to_current_attachments() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("a.jpg");
    std::fs::write(&image, [0xffu8, 0xd8]).unwrap();

    let mut form = WordForm::new(layouts());
    entry::attach_word_media(&mut form, Some(image), None).unwrap();
    entry::attach_word_media(&mut form, None, None).unwrap();
    assert_eq!(form.image().map(|f| f.size()), Some(2));
    assert!(form.audio().is_none());
}

#[test]
fn missing_media_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut form = WordForm::new(layouts());
    let err = entry::attach_word_media(&mut form, None, Some(dir.path().join("gone.webm")))
        .unwrap_err();
    assert!(matches!(err, FormError::Media(MediaError::Picker(_))));
}

#[test]
fn category_form_from_terminal() {
    let dir = tempfile::tempdir().unwrap();
    let big = dir.path().join("big.png");
    std::fs::write(&big, vec![0u8; MAX_IMAGE_BYTES + 1]).unwrap();

    let mut form = CategoryForm::new(layouts());
    let mut reader = Cursor::new("Animals\nj a n\n:done\n".to_string());
    entry::fill_category_form(&mut form, &mut reader, &mut Vec::new()).unwrap();
    assert!(matches!(
        entry::attach_category_image(&mut form, Some(big)),
        Err(FormError::ImageTooLarge { .. })
    ));

    let draft = form.prepare().unwrap();
    assert_eq!(draft.name, "Animals");
    assert_eq!(draft.description, "jan");
    assert!(draft.image.is_none());
}
