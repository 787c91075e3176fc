//! Circular record button.
//!
//! Shows a mic glyph when a recording may start, a stop square while
//! recording (with a pulsing ring), and a spinner while the consultation
//! is being analyzed.

use crate::state::ConsultPhase;
use crate::ui::theme::Theme;
use egui::{Color32, Rect, RichText, Sense, Vec2};

pub struct RecordButton<'a> {
    phase: ConsultPhase,
    theme: &'a Theme,
}

impl<'a> RecordButton<'a> {
    pub fn new(phase: ConsultPhase, theme: &'a Theme) -> Self {
        Self { phase, theme }
    }

    /// Show the button with its status caption; returns the click response.
    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        ui.vertical_centered(|ui| {
            let size = Vec2::splat(72.0);
            let (rect, response) = ui.allocate_exact_size(size, Sense::click());

            if ui.is_rect_visible(rect) {
                self.paint(ui, rect, &response);
            }

            let enabled = !self.phase.is_processing();
            let label = match self.phase {
                ConsultPhase::Recording => "Stop recording",
                ConsultPhase::Processing => "Analyzing",
                _ => "Record",
            };
            response.widget_info(|| {
                egui::WidgetInfo::labeled(egui::WidgetType::Button, enabled, label)
            });

            ui.add_space(self.theme.spacing_sm);
            self.show_caption(ui);

            response
        })
        .inner
    }

    fn paint(&self, ui: &egui::Ui, rect: Rect, response: &egui::Response) {
        let painter = ui.painter();
        let center = rect.center();

        let bg = match self.phase {
            ConsultPhase::Recording => self.theme.recording,
            ConsultPhase::Processing => self.theme.warning.gamma_multiply(0.8),
            _ if response.hovered() => self.theme.primary.gamma_multiply(1.2),
            _ => self.theme.primary,
        };
        painter.circle_filled(center, 32.0, bg);

        match self.phase {
            ConsultPhase::Recording => {
                painter.rect_filled(
                    Rect::from_center_size(center, Vec2::splat(18.0)),
                    2.0,
                    Color32::WHITE,
                );
                self.paint_pulse(ui, center);
            }
            ConsultPhase::Processing => self.paint_spinner(ui, center),
            _ => self.paint_mic(painter, center),
        }
    }

    fn paint_mic(&self, painter: &egui::Painter, center: egui::Pos2) {
        let color = Color32::WHITE;

        // Mic body
        let body = Rect::from_center_size(
            egui::pos2(center.x, center.y - 4.0),
            Vec2::new(10.0, 16.0),
        );
        painter.rect_filled(body, 5.0, color);

        // Pickup arc below the body
        let arc_center = egui::pos2(center.x, center.y + 2.0);
        let radius = 11.0;
        let segments = 8;
        for i in 0..segments {
            let a0 = std::f32::consts::PI * (i as f32 / segments as f32);
            let a1 = std::f32::consts::PI * ((i + 1) as f32 / segments as f32);
            let p0 = egui::pos2(
                arc_center.x - radius * a0.cos(),
                arc_center.y + radius * a0.sin(),
            );
            let p1 = egui::pos2(
                arc_center.x - radius * a1.cos(),
                arc_center.y + radius * a1.sin(),
            );
            painter.line_segment([p0, p1], egui::Stroke::new(2.0, color));
        }

        // Stem
        painter.line_segment(
            [
                egui::pos2(center.x, arc_center.y + radius),
                egui::pos2(center.x, arc_center.y + radius + 5.0),
            ],
            egui::Stroke::new(2.0, color),
        );
    }

    fn paint_spinner(&self, ui: &egui::Ui, center: egui::Pos2) {
        let t = ui.ctx().input(|i| i.time);
        let angle = t * 3.0;

        for i in 0..3 {
            let dot_angle = angle + (i as f64 * std::f64::consts::TAU / 3.0);
            let pos = egui::pos2(
                center.x + (dot_angle.cos() as f32 * 9.0),
                center.y + (dot_angle.sin() as f32 * 9.0),
            );
            let alpha = 1.0 - (i as f32 * 0.3);
            ui.painter()
                .circle_filled(pos, 3.5, Color32::from_white_alpha((255.0 * alpha) as u8));
        }

        ui.ctx().request_repaint();
    }

    fn paint_pulse(&self, ui: &egui::Ui, center: egui::Pos2) {
        let t = ui.ctx().input(|i| i.time);
        let pulse = ((t * 3.0).sin() * 0.5 + 0.5) as f32;

        let radius = 34.0 + pulse * 9.0;
        let alpha = (1.0 - pulse) * 0.6;
        ui.painter().circle_stroke(
            center,
            radius,
            egui::Stroke::new(2.0 + pulse * 2.0, self.theme.recording.gamma_multiply(alpha)),
        );

        ui.ctx().request_repaint();
    }

    fn show_caption(&self, ui: &mut egui::Ui) {
        let (text, color) = match self.phase {
            ConsultPhase::Recording => ("Listening... tap to finish", self.theme.recording),
            ConsultPhase::Processing => ("Analyzing your consultation...", self.theme.warning),
            ConsultPhase::Speaking => ("Reading recommendation aloud", self.theme.speaking),
            ConsultPhase::HasDiagnosis => ("Tap to start a new consultation", self.theme.text_muted),
            ConsultPhase::Idle => ("Tap to describe your symptoms", self.theme.text_muted),
        };
        ui.label(RichText::new(text).size(12.0).color(color));
    }
}
