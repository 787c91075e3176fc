//! Screen host and eframe integration.
//!
//! The host renders a single full-bleed panel; all interactive behavior
//! lives in [`ConsultationPanel`].

use crate::ui::panel::ConsultationPanel;
use crate::ui::theme::Theme;
use egui::CentralPanel;
use std::time::Duration;

pub struct CareVoiceApp {
    panel: ConsultationPanel,
    theme: Theme,
}

impl CareVoiceApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        Self {
            panel: ConsultationPanel::with_defaults(),
            theme,
        }
    }
}

impl eframe::App for CareVoiceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.panel.poll_events();

        CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.bg_primary).inner_margin(self.theme.spacing))
            .show(ctx, |ui| {
                self.panel.show(ui, &self.theme);
            });

        // Keep polling while capture, analysis, or speech is in flight
        if self.panel.state().phase().is_active() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}
