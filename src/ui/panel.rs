//! Consultation panel.
//!
//! Owns the session state and orchestrates the capability providers:
//! microphone capture, image selection, the diagnosis backend, and the
//! speech pipeline. All provider failures are logged and degrade to the
//! pre-action phase; nothing is surfaced as UI error messaging.

use crate::audio::{AudioRecorder, VoiceRecorder};
use crate::providers::{
    CannedDiagnosis, ConsultRequest, DiagnosisEvent, DiagnosisProvider, ImagePicker,
    NativeImagePicker, PickOutcome, PickerOptions, SpeechEngine, SpeechEvent, SpeechParams,
    SpeechPipeline, SystemSpeech,
};
use crate::state::ConsultState;
use crate::ui::components::{DiagnosisCard, RecordButton};
use crate::ui::theme::Theme;
use crossbeam_channel::Receiver;
use egui::RichText;
use tracing::{debug, error, info, warn};

pub struct ConsultationPanel {
    state: ConsultState,
    recorder: Box<dyn AudioRecorder>,
    picker: Box<dyn ImagePicker>,
    picker_options: PickerOptions,
    diagnosis_provider: Box<dyn DiagnosisProvider>,
    diagnosis_rx: Option<Receiver<DiagnosisEvent>>,
    speech: SpeechPipeline,
}

impl ConsultationPanel {
    /// Build a panel with injected providers.
    pub fn new(
        recorder: Box<dyn AudioRecorder>,
        picker: Box<dyn ImagePicker>,
        diagnosis_provider: Box<dyn DiagnosisProvider>,
        speech: SpeechPipeline,
    ) -> Self {
        Self {
            state: ConsultState::new(),
            recorder,
            picker,
            picker_options: PickerOptions::default(),
            diagnosis_provider,
            diagnosis_rx: None,
            speech,
        }
    }

    /// Panel wired to the shipped providers.
    pub fn with_defaults() -> Self {
        let speech = SpeechPipeline::spawn(
            || SystemSpeech::new().map(|e| Box::new(e) as Box<dyn SpeechEngine>),
            SpeechParams::default(),
        );
        Self::new(
            Box::new(VoiceRecorder::new()),
            Box::new(NativeImagePicker),
            Box::new(CannedDiagnosis::new()),
            speech,
        )
    }

    pub fn state(&self) -> &ConsultState {
        &self.state
    }

    // === Operations ===

    /// Begin microphone capture. A capture-start failure (no device,
    /// permission denied) is logged and recording is not entered.
    pub fn start_recording(&mut self) {
        if !self.state.phase().can_start_recording() {
            debug!("Start ignored in phase {}", self.state.phase());
            return;
        }

        match self.recorder.start() {
            Ok(()) => {
                self.state.start_recording();
                info!("Recording started");
            }
            Err(e) => {
                // Phase stays unchanged; the user can retry
                error!("Failed to start recording: {}", e);
            }
        }
    }

    /// Finish capture and submit the consultation for analysis.
    pub fn stop_recording(&mut self) {
        if !self.state.stop_recording() {
            debug!("Stop ignored in phase {}", self.state.phase());
            return;
        }

        match self.recorder.finish() {
            Ok(path) => {
                info!("Captured audio stored at {:?}", path);
                self.state.audio_path = Some(path);
            }
            Err(e) => {
                // Analysis proceeds without the audio location
                warn!("Failed to finalize recording: {}", e);
            }
        }

        let request = ConsultRequest {
            audio: self.state.audio_path.clone(),
            image: self.state.image_path.clone(),
        };
        self.diagnosis_rx = Some(self.diagnosis_provider.request(request));
        info!("Consultation submitted for analysis");
    }

    /// Open the image picker and store the selection.
    pub fn pick_image(&mut self) {
        match self.picker.pick(&self.picker_options) {
            Ok(PickOutcome::Selected(path)) => {
                info!("Photo attached: {:?}", path);
                self.state.image_path = Some(path);
            }
            Ok(PickOutcome::Canceled) => {}
            Err(e) => {
                error!("Image picking failed: {}", e);
            }
        }
    }

    /// Read the current recommendation aloud. No-op while already speaking.
    pub fn speak_diagnosis(&mut self) {
        if !self.state.start_speaking() {
            debug!("Speak ignored in phase {}", self.state.phase());
            return;
        }

        if let Err(e) = self.speech.speak(self.state.diagnosis.clone()) {
            error!("Failed to submit speech request: {}", e);
            self.state.finish_speaking();
        }
    }

    /// Drain provider events. Called once per frame.
    pub fn poll_events(&mut self) {
        if self.state.phase().is_recording() {
            self.recorder.poll();
        }

        if let Some(rx) = &self.diagnosis_rx {
            match rx.try_recv() {
                Ok(DiagnosisEvent::Ready(text)) => {
                    self.diagnosis_rx = None;
                    if self.state.finish_processing(text) {
                        info!("Recommendation ready");
                        // The recommendation is read aloud automatically
                        self.speak_diagnosis();
                    }
                }
                Ok(DiagnosisEvent::Failed(msg)) => {
                    self.diagnosis_rx = None;
                    error!("Diagnosis provider failed: {}", msg);
                    self.state.abort_processing();
                }
                Err(_) => {}
            }
        }

        while let Some(event) = self.speech.try_event() {
            match event {
                SpeechEvent::Started => debug!("Speech playback started"),
                SpeechEvent::Finished => {
                    debug!("Speech playback finished");
                    self.state.finish_speaking();
                }
                SpeechEvent::Error(msg) => {
                    error!("Speech playback failed: {}", msg);
                    self.state.finish_speaking();
                }
            }
        }
    }

    // === Rendering ===

    pub fn show(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        ui.vertical_centered(|ui| {
            ui.add_space(theme.spacing_lg);
            ui.heading(RichText::new("CareVoice").color(theme.text_primary));
            ui.label(
                RichText::new("Describe your symptoms, attach a photo")
                    .size(13.0)
                    .color(theme.text_muted),
            );
            ui.add_space(theme.spacing_lg);

            let record = RecordButton::new(self.state.phase(), theme).show(ui);
            if record.clicked() && !self.state.phase().is_processing() {
                if self.state.phase().is_recording() {
                    self.stop_recording();
                } else {
                    self.start_recording();
                }
            }

            ui.add_space(theme.spacing);
            self.show_attach_row(ui, theme);
            ui.add_space(theme.spacing);
        });

        if self.state.phase().has_diagnosis() {
            let speak = DiagnosisCard::new(
                &self.state.diagnosis,
                self.state.phase().is_speaking(),
                theme,
            )
            .show(ui);
            if speak.clicked() {
                self.speak_diagnosis();
            }
        }
    }

    fn show_attach_row(&mut self, ui: &mut egui::Ui, theme: &Theme) {
        ui.horizontal(|ui| {
            let attach = ui.button("📷 Attach photo");
            attach.widget_info(|| {
                egui::WidgetInfo::labeled(egui::WidgetType::Button, true, "Attach photo")
            });
            if attach.clicked() {
                self.pick_image();
            }

            let caption = match &self.state.image_path {
                Some(path) => path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("photo")
                    .to_string(),
                None => "No photo attached".to_string(),
            };
            ui.label(RichText::new(caption).size(12.0).color(theme.text_muted));
        });
    }
}
