//! Consultation state machine
//!
//! A single enumerated phase replaces the independent booleans a naive
//! screen would carry (`is_recording`, `is_processing`, ...), so mutually
//! exclusive phases cannot be active at the same time. Transition methods
//! guard against illegal moves; rapid double-clicks are no-ops.

use std::path::PathBuf;

/// Phase of the consultation flow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConsultPhase {
    /// Nothing in progress, no recommendation yet
    #[default]
    Idle,
    /// Microphone capture is active
    Recording,
    /// Captured audio submitted, waiting for the recommendation
    Processing,
    /// A recommendation is displayed and can be read aloud
    HasDiagnosis,
    /// The recommendation is being read aloud
    Speaking,
}

impl ConsultPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, ConsultPhase::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, ConsultPhase::Recording)
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, ConsultPhase::Processing)
    }

    pub fn has_diagnosis(&self) -> bool {
        matches!(self, ConsultPhase::HasDiagnosis | ConsultPhase::Speaking)
    }

    pub fn is_speaking(&self) -> bool {
        matches!(self, ConsultPhase::Speaking)
    }

    /// Check if anything asynchronous is in flight (drives UI repaints).
    pub fn is_active(&self) -> bool {
        !matches!(self, ConsultPhase::Idle | ConsultPhase::HasDiagnosis)
    }

    /// A new recording may begin when nothing else is in flight.
    pub fn can_start_recording(&self) -> bool {
        matches!(self, ConsultPhase::Idle | ConsultPhase::HasDiagnosis)
    }
}

impl std::fmt::Display for ConsultPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsultPhase::Idle => write!(f, "Idle"),
            ConsultPhase::Recording => write!(f, "Recording"),
            ConsultPhase::Processing => write!(f, "Processing"),
            ConsultPhase::HasDiagnosis => write!(f, "HasDiagnosis"),
            ConsultPhase::Speaking => write!(f, "Speaking"),
        }
    }
}

/// State of a single consultation session.
///
/// Created when the screen mounts and dropped on exit; nothing persists.
#[derive(Clone, Debug, Default)]
pub struct ConsultState {
    /// Current phase of the flow
    phase: ConsultPhase,
    /// Last captured audio file; stored but never read back
    pub audio_path: Option<PathBuf>,
    /// Last attached photo
    pub image_path: Option<PathBuf>,
    /// Displayed recommendation text (empty until one arrives)
    pub diagnosis: String,
}

impl ConsultState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ConsultPhase {
        self.phase
    }

    // === Guarded transitions ===
    // Each returns whether the transition took place.

    /// Begin microphone capture.
    pub fn start_recording(&mut self) -> bool {
        if !self.phase.can_start_recording() {
            return false;
        }
        self.phase = ConsultPhase::Recording;
        true
    }

    /// Capture finished, analysis pending.
    pub fn stop_recording(&mut self) -> bool {
        if !self.phase.is_recording() {
            return false;
        }
        self.phase = ConsultPhase::Processing;
        true
    }

    /// Recommendation arrived; replaces any previous one.
    pub fn finish_processing(&mut self, diagnosis: String) -> bool {
        if !self.phase.is_processing() {
            return false;
        }
        self.diagnosis = diagnosis;
        self.phase = ConsultPhase::HasDiagnosis;
        true
    }

    /// Analysis failed; fall back to the pre-recording phase.
    pub fn abort_processing(&mut self) {
        if self.phase.is_processing() {
            self.phase = ConsultPhase::Idle;
        }
    }

    /// Begin reading the recommendation aloud.
    pub fn start_speaking(&mut self) -> bool {
        if self.phase != ConsultPhase::HasDiagnosis || self.diagnosis.is_empty() {
            return false;
        }
        self.phase = ConsultPhase::Speaking;
        true
    }

    /// Speech finished (or failed); the recommendation stays on screen.
    pub fn finish_speaking(&mut self) {
        if self.phase.is_speaking() {
            self.phase = ConsultPhase::HasDiagnosis;
        }
    }
}
