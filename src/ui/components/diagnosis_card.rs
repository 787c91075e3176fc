//! Recommendation card with the read-aloud control.

use crate::ui::theme::Theme;
use egui::RichText;

pub struct DiagnosisCard<'a> {
    text: &'a str,
    speaking: bool,
    theme: &'a Theme,
}

impl<'a> DiagnosisCard<'a> {
    pub fn new(text: &'a str, speaking: bool, theme: &'a Theme) -> Self {
        Self {
            text,
            speaking,
            theme,
        }
    }

    /// Show the card; returns the response of the speak control so the
    /// panel can react to clicks.
    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let speak_response = egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.label(
                    RichText::new("Recommendation")
                        .size(13.0)
                        .strong()
                        .color(self.theme.primary),
                );
                ui.add_space(self.theme.spacing_sm);

                egui::ScrollArea::vertical()
                    .id_salt("diagnosis_text")
                    .max_height(260.0)
                    .show(ui, |ui| {
                        let label = ui.label(
                            RichText::new(self.text)
                                .size(14.0)
                                .color(self.theme.text_primary),
                        );
                        label.widget_info(|| {
                            egui::WidgetInfo::labeled(
                                egui::WidgetType::Label,
                                true,
                                "Recommendation text",
                            )
                        });
                    });

                ui.add_space(self.theme.spacing_sm);

                let speak_text = if self.speaking {
                    "🔊 Speaking..."
                } else {
                    "🔊 Read aloud"
                };
                let response =
                    ui.add_enabled(!self.speaking, egui::Button::new(speak_text));
                response.widget_info(|| {
                    egui::WidgetInfo::labeled(
                        egui::WidgetType::Button,
                        !self.speaking,
                        "Speak recommendation",
                    )
                });
                response
            })
            .inner;

        speak_response
    }
}
