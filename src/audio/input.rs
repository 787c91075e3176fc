use crate::{CareVoiceError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Live microphone capture on the default input device.
///
/// Sample chunks are mixed down to mono and delivered over a channel;
/// the stream handle is held from start until stop.
pub struct MicCapture {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    running: Arc<Mutex<bool>>,
}

impl MicCapture {
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| CareVoiceError::AudioDevice("No input device available".into()))?;

        info!(
            "Using input device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config = device
            .default_input_config()
            .map_err(|e| CareVoiceError::AudioDevice(format!("Failed to get input config: {e}")))?
            .into();

        Ok(Self {
            device,
            config,
            stream: None,
            running: Arc::new(Mutex::new(false)),
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Start capturing and deliver mono chunks to `chunk_tx`.
    pub fn start(&mut self, chunk_tx: Sender<Vec<f32>>) -> Result<()> {
        if *self.running.lock() {
            warn!("Capture already running");
            return Ok(());
        }

        let channels = self.config.channels as usize;
        let running = Arc::clone(&self.running);

        let err_fn = |err| {
            error!("Audio input stream error: {}", err);
        };

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if !*running.lock() {
                        return;
                    }

                    // Mix down to mono
                    let chunk = if channels == 1 {
                        data.to_vec()
                    } else {
                        data.chunks(channels)
                            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                            .collect()
                    };

                    if let Err(e) = chunk_tx.try_send(chunk) {
                        debug!("Dropped audio chunk: {}", e);
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| CareVoiceError::AudioDevice(format!("Failed to build input stream: {e}")))?;

        stream
            .play()
            .map_err(|e| CareVoiceError::AudioDevice(format!("Failed to start input stream: {e}")))?;

        *self.running.lock() = true;
        self.stream = Some(stream);

        info!("Microphone capture started");
        Ok(())
    }

    /// Stop capturing and release the stream.
    pub fn stop(&mut self) -> Result<()> {
        *self.running.lock() = false;

        if let Some(stream) = self.stream.take() {
            drop(stream);
            info!("Microphone capture stopped");
        }

        Ok(())
    }

    pub fn is_running(&self) -> bool {
        *self.running.lock()
    }
}

impl Drop for MicCapture {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
