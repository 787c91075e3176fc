//! Capability provider boundaries.
//!
//! Each external capability the consultation panel depends on sits behind a
//! trait so the shipped backend and test doubles are interchangeable without
//! touching the panel's control flow.

pub mod diagnosis;
pub mod picker;
pub mod speech;

pub use diagnosis::{
    CannedDiagnosis, ConsultRequest, DiagnosisEvent, DiagnosisProvider, ANALYSIS_LATENCY,
    RECOMMENDATION,
};
pub use picker::{ImagePicker, NativeImagePicker, PickOutcome, PickerOptions};
pub use speech::{SpeechEngine, SpeechEvent, SpeechParams, SpeechPipeline, SystemSpeech};
