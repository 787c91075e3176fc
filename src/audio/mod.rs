//! Microphone capture and WAV finalization.

pub mod input;
pub mod recorder;
pub mod wav;

pub use input::MicCapture;
pub use recorder::{AudioRecorder, VoiceRecorder};
