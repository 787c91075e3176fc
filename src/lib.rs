pub mod audio;
pub mod providers;
pub mod state;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum CareVoiceError {
    #[error("Audio device error: {0}")]
    AudioDevice(String),

    #[error("Speech synthesis error: {0}")]
    Speech(String),

    #[error("Image picker error: {0}")]
    Picker(String),

    #[error("Diagnosis provider error: {0}")]
    Diagnosis(String),

    #[error("Channel error: {0}")]
    Channel(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for CareVoiceError {
    fn from(e: std::io::Error) -> Self {
        CareVoiceError::Io(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CareVoiceError>;
