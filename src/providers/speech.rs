//! Speech synthesis boundary and pipeline.
//!
//! Synthesis runs on a dedicated worker thread behind bounded
//! command/event channels; the UI thread submits text and drains events
//! once per frame. The shipped engine wraps the platform speech
//! synthesizer via the `tts` crate; tests substitute scripted engines.

use crate::{CareVoiceError, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tts::Tts;

/// Fixed synthesis parameters for reading the recommendation aloud.
#[derive(Clone, Debug)]
pub struct SpeechParams {
    /// BCP 47 language tag used to select a voice
    pub language: String,
    /// Pitch relative to the voice's normal pitch (1.0 = normal)
    pub pitch: f32,
    /// Rate relative to the voice's normal rate (1.0 = normal)
    pub rate: f32,
}

impl Default for SpeechParams {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            pitch: 1.0,
            rate: 0.9,
        }
    }
}

/// A synthesis backend. `speak` blocks the worker until playback completes.
pub trait SpeechEngine {
    fn speak(&mut self, text: &str, params: &SpeechParams) -> Result<()>;
}

enum SpeechCommand {
    Speak(String),
    Shutdown,
}

/// Event emitted by the speech worker.
#[derive(Clone, Debug)]
pub enum SpeechEvent {
    /// Playback of a submitted text has begun
    Started,
    /// Playback finished normally
    Finished,
    /// Synthesis or playback failed
    Error(String),
}

/// Worker-thread wrapper around a [`SpeechEngine`].
pub struct SpeechPipeline {
    command_tx: Sender<SpeechCommand>,
    event_rx: Receiver<SpeechEvent>,
}

impl SpeechPipeline {
    /// Spawn the worker. The engine is constructed on the worker thread;
    /// if construction fails, every subsequent request answers with an
    /// error event instead of taking the pipeline down.
    pub fn spawn<F>(make_engine: F, params: SpeechParams) -> Self
    where
        F: FnOnce() -> Result<Box<dyn SpeechEngine>> + Send + 'static,
    {
        let (command_tx, command_rx) = bounded(8);
        let (event_tx, event_rx) = bounded::<SpeechEvent>(8);

        thread::spawn(move || {
            info!("Speech worker starting");

            let mut engine = match make_engine() {
                Ok(engine) => Some(engine),
                Err(e) => {
                    error!("Failed to initialize speech engine: {}", e);
                    None
                }
            };

            loop {
                match command_rx.recv() {
                    Ok(SpeechCommand::Speak(text)) => {
                        let _ = event_tx.send(SpeechEvent::Started);
                        match engine.as_mut() {
                            Some(engine) => match engine.speak(&text, &params) {
                                Ok(()) => {
                                    let _ = event_tx.send(SpeechEvent::Finished);
                                }
                                Err(e) => {
                                    warn!("Speech synthesis failed: {}", e);
                                    let _ = event_tx.send(SpeechEvent::Error(e.to_string()));
                                }
                            },
                            None => {
                                let _ = event_tx
                                    .send(SpeechEvent::Error("speech engine unavailable".into()));
                            }
                        }
                    }
                    Ok(SpeechCommand::Shutdown) | Err(_) => break,
                }
            }

            info!("Speech worker stopped");
        });

        Self {
            command_tx,
            event_rx,
        }
    }

    /// Submit text for playback.
    pub fn speak(&self, text: String) -> Result<()> {
        self.command_tx
            .try_send(SpeechCommand::Speak(text))
            .map_err(|e| CareVoiceError::Channel(e.to_string()))
    }

    /// Drain one pending event, if any.
    pub fn try_event(&self) -> Option<SpeechEvent> {
        self.event_rx.try_recv().ok()
    }
}

impl Drop for SpeechPipeline {
    fn drop(&mut self) {
        let _ = self.command_tx.try_send(SpeechCommand::Shutdown);
    }
}

/// Platform speech synthesizer.
pub struct SystemSpeech {
    tts: Tts,
}

impl SystemSpeech {
    pub fn new() -> Result<Self> {
        let tts = Tts::default().map_err(|e| CareVoiceError::Speech(e.to_string()))?;
        Ok(Self { tts })
    }

    fn configure(&mut self, params: &SpeechParams) -> Result<()> {
        let features = self.tts.supported_features();

        if features.voice {
            if let Ok(voices) = self.tts.voices() {
                let wanted = params
                    .language
                    .split('-')
                    .next()
                    .unwrap_or(&params.language)
                    .to_ascii_lowercase();
                if let Some(voice) = voices
                    .iter()
                    .find(|v| v.language().to_string().to_ascii_lowercase().starts_with(&wanted))
                {
                    debug!("Selected voice {} for {}", voice.name(), params.language);
                    let _ = self.tts.set_voice(voice);
                }
            }
        }

        if features.pitch {
            let pitch = scaled(
                params.pitch,
                self.tts.min_pitch(),
                self.tts.normal_pitch(),
                self.tts.max_pitch(),
            );
            self.tts
                .set_pitch(pitch)
                .map_err(|e| CareVoiceError::Speech(e.to_string()))?;
        }

        if features.rate {
            let rate = scaled(
                params.rate,
                self.tts.min_rate(),
                self.tts.normal_rate(),
                self.tts.max_rate(),
            );
            self.tts
                .set_rate(rate)
                .map_err(|e| CareVoiceError::Speech(e.to_string()))?;
        }

        Ok(())
    }
}

impl SpeechEngine for SystemSpeech {
    fn speak(&mut self, text: &str, params: &SpeechParams) -> Result<()> {
        self.configure(params)?;

        self.tts
            .speak(text, true)
            .map_err(|e| CareVoiceError::Speech(e.to_string()))?;

        // Block the worker until the utterance finishes. Not every backend
        // reports speaking state; fall back to a word-count estimate.
        if self.tts.supported_features().is_speaking {
            thread::sleep(Duration::from_millis(200));
            while self.tts.is_speaking().unwrap_or(false) {
                thread::sleep(Duration::from_millis(100));
            }
        } else {
            let words = text.split_whitespace().count() as u64;
            let wpm = (150.0 * params.rate).max(60.0) as u64;
            thread::sleep(Duration::from_millis(words * 60_000 / wpm));
        }

        Ok(())
    }
}

/// Map a relative parameter (1.0 = normal) into a backend's range.
fn scaled(value: f32, min: f32, normal: f32, max: f32) -> f32 {
    if value >= 1.0 {
        (normal + (max - normal) * (value - 1.0)).clamp(min, max)
    } else {
        (min + (normal - min) * value).clamp(min, max)
    }
}
