//! Media capture ports and the audio recorder state machine.
//!
//! Microphone and file-picker access are platform concerns. They reach the
//! form logic through the `AudioCapture` and `FilePicker` traits so the
//! recorder can be driven by a fake device in tests.

use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Largest image accepted for upload.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Largest audio clip accepted for upload.
pub const MAX_AUDIO_BYTES: usize = 2 * 1024 * 1024;

/// Recordings stop automatically after this many seconds.
pub const MAX_RECORDING_SECS: u32 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    #[error("capture device failed: {0}")]
    Capture(String),
    #[error("file picker failed: {0}")]
    Picker(String),
    #[error("a recording is already in progress")]
    AlreadyRecording,
    #[error("no recording in progress")]
    NotRecording,
}

/// A file ready to be attached to an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Size for display, e.g. "12.50 KB".
    pub fn size_label(&self) -> String {
        format!("{:.2} KB", self.size() as f64 / 1024.0)
    }
}

/// Raw output of a finished capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedAudio {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Microphone port.
pub trait AudioCapture {
    /// Acquire the device and begin capturing.
    fn start(&mut self) -> Result<(), MediaError>;

    /// Stop capturing, release the device and return what was recorded.
    fn stop(&mut self) -> Result<CapturedAudio, MediaError>;
}

/// File chooser port.
pub trait FilePicker {
    /// Ask the user for an image. `Ok(None)` when the dialog was cancelled.
    fn pick_image(&mut self) -> Result<Option<MediaFile>, MediaError>;
}

/// Where the recorder is in its cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording { elapsed: u32 },
    Recorded { file: MediaFile, duration: u32 },
}

/// Short audio recorder with an automatic cut-off.
///
/// The host calls `tick` once per second while recording; the recorder
/// stops itself when `max_duration` is reached.
pub struct AudioRecorder<C: AudioCapture> {
    capture: C,
    state: RecorderState,
    max_duration: u32,
}

impl<C: AudioCapture> AudioRecorder<C> {
    pub fn new(capture: C) -> Self {
        Self::with_max_duration(capture, MAX_RECORDING_SECS)
    }

    pub fn with_max_duration(capture: C, max_duration: u32) -> Self {
        Self {
            capture,
            state: RecorderState::Idle,
            max_duration,
        }
    }

    pub fn state(&self) -> &RecorderState {
        &self.state
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecorderState::Recording { .. })
    }

    /// The finished recording, if any.
    pub fn recording(&self) -> Option<&MediaFile> {
        match &self.state {
            RecorderState::Recorded { file, .. } => Some(file),
            _ => None,
        }
    }

    /// Start recording. Starting from `Recorded` discards the old clip.
    pub fn start(&mut self) -> Result<(), MediaError> {
        if self.is_recording() {
            return Err(MediaError::AlreadyRecording);
        }
        self.state = RecorderState::Idle;
        self.capture.start()?;
        self.state = RecorderState::Recording { elapsed: 0 };
        tracing::debug!("audio recording started");
        Ok(())
    }

    /// Stop recording and keep the clip, available from `recording()`.
    pub fn stop(&mut self) -> Result<(), MediaError> {
        let duration = match self.state {
            RecorderState::Recording { elapsed } => elapsed,
            _ => return Err(MediaError::NotRecording),
        };
        let captured = match self.capture.stop() {
            Ok(captured) => captured,
            Err(e) => {
                self.state = RecorderState::Idle;
                return Err(e);
            }
        };
        let file = MediaFile::new(recording_file_name(), captured.mime, captured.bytes);
        if file.size() > MAX_AUDIO_BYTES {
            tracing::warn!(size = file.size(), "recorded audio exceeds upload limit");
        }
        self.state = RecorderState::Recorded { file, duration };
        Ok(())
    }

    /// Advance the recording clock by one second.
    ///
    /// Returns true when this tick hit the limit and stopped the recording.
    pub fn tick(&mut self) -> Result<bool, MediaError> {
        let elapsed = match &mut self.state {
            RecorderState::Recording { elapsed } => {
                *elapsed += 1;
                *elapsed
            }
            _ => return Ok(false),
        };
        if elapsed >= self.max_duration {
            self.stop()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Drop the finished clip and return to idle.
    pub fn clear(&mut self) {
        if !self.is_recording() {
            self.state = RecorderState::Idle;
        }
    }

    /// Progress text, e.g. "0:03 / 0:06" while recording.
    pub fn progress_label(&self) -> String {
        match &self.state {
            RecorderState::Idle => format_time(0),
            RecorderState::Recording { elapsed } => {
                format!("{} / {}", format_time(*elapsed), format_time(self.max_duration))
            }
            RecorderState::Recorded { duration, .. } => format_time(*duration),
        }
    }
}

fn recording_file_name() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("audio_{}.webm", millis)
}

/// Format whole seconds as `m:ss`.
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeMic {
        started: u32,
        fail_start: bool,
        clip_len: usize,
    }

    impl AudioCapture for FakeMic {
        fn start(&mut self) -> Result<(), MediaError> {
            if self.fail_start {
                return Err(MediaError::Capture("permission denied".into()));
            }
            self.started += 1;
            Ok(())
        }

        fn stop(&mut self) -> Result<CapturedAudio, MediaError> {
            Ok(CapturedAudio {
                mime: "audio/webm;codecs=opus".into(),
                bytes: vec![0; self.clip_len],
            })
        }
    }

    #[test]
    fn auto_stops_at_max_duration() {
        let mut rec = AudioRecorder::new(FakeMic {
            clip_len: 10,
            ..Default::default()
        });
        rec.start().unwrap();
        for _ in 0..5 {
            assert!(!rec.tick().unwrap());
        }
        assert_eq!(rec.progress_label(), "0:05 / 0:06");
        assert!(rec.tick().unwrap());
        let file = rec.recording().unwrap();
        assert!(file.name.starts_with("audio_") && file.name.ends_with(".webm"));
        assert_eq!(file.size(), 10);
        assert_eq!(rec.progress_label(), "0:06");
    }

    #[test]
    fn start_failure_stays_idle() {
        let mut rec = AudioRecorder::new(FakeMic {
            fail_start: true,
            ..Default::default()
        });
        assert!(matches!(rec.start(), Err(MediaError::Capture(_))));
        assert_eq!(rec.state(), &RecorderState::Idle);
    }

    #[test]
    fn rerecord_and_clear() {
        let mut rec = AudioRecorder::new(FakeMic::default());
        rec.start().unwrap();
        assert_eq!(rec.start(), Err(MediaError::AlreadyRecording));
        rec.stop().unwrap();
        rec.start().unwrap();
        assert!(rec.recording().is_none());
        rec.stop().unwrap();
        rec.clear();
        assert_eq!(rec.state(), &RecorderState::Idle);
        assert!(matches!(rec.stop(), Err(MediaError::NotRecording)));
    }

    #[test]
    fn time_format() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(65), "1:05");
    }
}
