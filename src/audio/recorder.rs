//! Voice recorder: buffers captured chunks and finalizes them to a WAV file.

use crate::audio::{wav, MicCapture};
use crate::{CareVoiceError, Result};
use chrono::Utc;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::path::PathBuf;
use tracing::{debug, info};
use uuid::Uuid;

/// Microphone capture boundary.
///
/// The shipped implementation records from the default input device; tests
/// substitute scripted recorders.
pub trait AudioRecorder {
    /// Begin a new recording. On failure nothing is captured and the
    /// session is left untouched.
    fn start(&mut self) -> Result<()>;

    /// Drain pending chunks into the recording buffer.
    fn poll(&mut self);

    /// Stop capturing and return the finalized audio location.
    fn finish(&mut self) -> Result<PathBuf>;
}

/// Records from the default input device.
///
/// The device is acquired on the first [`AudioRecorder::start`], not up
/// front, so a missing microphone surfaces as a start failure rather than
/// at construction. The panel calls [`AudioRecorder::poll`] every frame
/// while recording to drain pending chunks off the channel;
/// [`AudioRecorder::finish`] releases the capture resource and writes the
/// buffered samples to a temp WAV file.
pub struct VoiceRecorder {
    capture: Option<MicCapture>,
    chunk_tx: Sender<Vec<f32>>,
    chunk_rx: Receiver<Vec<f32>>,
    samples: Vec<f32>,
}

impl VoiceRecorder {
    pub fn new() -> Self {
        // Bounded so a stalled UI cannot grow memory unbounded
        let (chunk_tx, chunk_rx) = bounded(1024);

        Self {
            capture: None,
            chunk_tx,
            chunk_rx,
            samples: Vec::new(),
        }
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

impl Default for VoiceRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioRecorder for VoiceRecorder {
    fn start(&mut self) -> Result<()> {
        if self.capture.is_none() {
            self.capture = Some(MicCapture::new()?);
        }
        let capture = self
            .capture
            .as_mut()
            .ok_or_else(|| CareVoiceError::AudioDevice("capture unavailable".into()))?;

        self.samples.clear();
        while self.chunk_rx.try_recv().is_ok() {}
        capture.start(self.chunk_tx.clone())
    }

    fn poll(&mut self) {
        let mut drained = 0;
        while let Ok(chunk) = self.chunk_rx.try_recv() {
            drained += chunk.len();
            self.samples.extend(chunk);
        }
        if drained > 0 {
            debug!("Recording buffer holds {} samples", self.samples.len());
        }
    }

    fn finish(&mut self) -> Result<PathBuf> {
        let sample_rate = match self.capture.as_mut() {
            Some(capture) => {
                capture.stop()?;
                capture.sample_rate()
            }
            None => {
                return Err(CareVoiceError::AudioDevice(
                    "no capture to finalize".into(),
                ))
            }
        };
        self.poll();

        let path = capture_path();
        wav::write_wav(&path, &self.samples, sample_rate)?;
        info!(
            "Recording finalized: {:.1}s at {:?}",
            self.samples.len() as f32 / sample_rate as f32,
            path
        );
        Ok(path)
    }
}

/// Human-sortable temp file name; the uuid suffix avoids collisions within
/// the same second.
fn capture_path() -> PathBuf {
    let stamp = Utc::now().format("%Y%m%d-%H%M%S");
    let tag = Uuid::new_v4().simple().to_string();
    std::env::temp_dir().join(format!("carevoice-{}-{}.wav", stamp, &tag[..8]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_path_shape() {
        let a = capture_path();
        let b = capture_path();
        let name = a.file_name().and_then(|n| n.to_str()).expect("file name");
        assert!(name.starts_with("carevoice-"));
        assert!(name.ends_with(".wav"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_finish_without_start_fails() {
        let mut recorder = VoiceRecorder::new();
        assert!(recorder.finish().is_err());
        assert_eq!(recorder.sample_count(), 0);
    }

    #[test]
    fn test_recorder_lifecycle() {
        // The capture branch is skipped silently without an audio device,
        // but start must then report the failure instead of pretending.
        let mut recorder = VoiceRecorder::new();
        assert_eq!(recorder.sample_count(), 0);

        match recorder.start() {
            Ok(()) => {
                recorder.poll();
                let path = recorder.finish().expect("finalize recording");
                assert!(path.exists());
                let _ = std::fs::remove_file(path);
            }
            Err(_) => {
                // No device: finalizing must fail too
                assert!(recorder.finish().is_err());
            }
        }
    }
}
