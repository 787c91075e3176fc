//! Reusable widgets for the consultation panel.

pub mod diagnosis_card;
pub mod record_button;

pub use diagnosis_card::DiagnosisCard;
pub use record_button::RecordButton;
