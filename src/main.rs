//! CareVoice - voice-driven consultation screen
//!
//! Main entry point for the CareVoice application.

use carevoice::ui::CareVoiceApp;
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carevoice=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting CareVoice consultation screen");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 720.0])
            .with_min_inner_size([360.0, 540.0])
            .with_title("CareVoice"),
        ..Default::default()
    };

    eframe::run_native(
        "CareVoice",
        options,
        Box::new(|cc| Ok(Box::new(CareVoiceApp::new(cc)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))
}
