//! User interface for the consultation screen.

pub mod app;
pub mod components;
pub mod panel;
pub mod theme;

pub use app::CareVoiceApp;
pub use panel::ConsultationPanel;
pub use theme::Theme;
