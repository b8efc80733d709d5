//! Media attachments read from disk.

use std::path::{Path, PathBuf};

use lexisium_core::{FilePicker, MediaError, MediaFile};

/// Mime type from the file extension, as a browser file input reports it.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("webm") => "audio/webm",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("ogg") => "audio/ogg",
        Some("m4a") => "audio/mp4",
        _ => "application/octet-stream",
    }
}

/// Read a file into an attachment named after its last path component.
pub fn load_media(path: &Path) -> Result<MediaFile, MediaError> {
    let bytes = std::fs::read(path)
        .map_err(|e| MediaError::Picker(format!("{}: {}", path.display(), e)))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();
    Ok(MediaFile::new(name, mime_for(path), bytes))
}

/// File picker answered up front by a command-line path.
///
/// No path means the dialog was cancelled.
#[derive(Debug, Clone, Default)]
pub struct PathPicker {
    path: Option<PathBuf>,
}

impl PathPicker {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl FilePicker for PathPicker {
    fn pick_image(&mut self) -> Result<Option<MediaFile>, MediaError> {
        match self.path.take() {
            Some(path) => {
                let file = load_media(&path)?;
                if !file.mime.starts_with("image/") {
                    return Err(MediaError::Picker(format!("{} is not an image", file.name)));
                }
                tracing::debug!(name = %file.name, size = file.size(), "image picked");
                Ok(Some(file))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_for(Path::new("a/b/cat.JPG")), "image/jpeg");
        assert_eq!(mime_for(Path::new("audio_1.webm")), "audio/webm");
        assert_eq!(mime_for(Path::new("notes")), "application/octet-stream");
    }

    #[test]
    fn picker_without_path_is_cancelled() {
        assert_eq!(PathPicker::default().pick_image(), Ok(None));
    }

    #[test]
    fn missing_file_is_a_picker_error() {
        let mut picker = PathPicker::new(Some(PathBuf::from("/nonexistent/lexisium/x.png")));
        assert!(matches!(picker.pick_image(), Err(MediaError::Picker(_))));
    }
}
