//! AR modal window and the blocking "AR unsupported" notice.

use eframe::egui;

use ar_gallery::ar::modal::{ViewerState, INSTRUCTIONS};

use super::GalleryApp;

enum ModalAction {
    ActivateAr,
    Close,
}

impl GalleryApp {
    pub fn draw_modal(&mut self, ctx: &egui::Context) {
        let Some(modal) = &self.modal else {
            return;
        };

        ctx.layer_painter(egui::LayerId::new(
            egui::Order::Middle,
            egui::Id::new("modal_scrim"),
        ))
        .rect_filled(ctx.screen_rect(), 0.0, egui::Color32::from_black_alpha(230));

        let mut action = None;
        let shown = egui::Window::new(modal.title())
            .id(egui::Id::new("ar_modal"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.set_max_width(420.0);
                ui.horizontal(|ui| {
                    ui.label(INSTRUCTIONS);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Close").clicked() {
                            action = Some(ModalAction::Close);
                        }
                    });
                });
                ui.add_space(8.0);

                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.set_min_size(egui::vec2(400.0, 300.0));
                    ui.vertical_centered(|ui| match modal.state() {
                        ViewerState::Loading => {
                            ui.add_space(120.0);
                            ui.spinner();
                            ui.label("Loading 3D model…");
                        }
                        ViewerState::LoadFailed => {
                            ui.add_space(120.0);
                            if let Some(error) = modal.load_error() {
                                ui.colored_label(egui::Color32::from_rgb(220, 38, 38), error.to_string());
                            }
                        }
                        ViewerState::Ready | ViewerState::ArActive => {
                            ui.add_space(100.0);
                            if let Some(source) = modal.viewer().source() {
                                ui.monospace(&source.src);
                                ui.small(format!("ios-src: {}", source.ios_src));
                                ui.small(format!("ar-modes: {}", source.ar_modes_attr()));
                            }
                        }
                    });
                });

                if let Some(hint) = modal.ar_hint() {
                    ui.add_space(4.0);
                    ui.colored_label(egui::Color32::from_rgb(180, 120, 0), hint);
                }

                ui.add_space(8.0);
                let button = egui::Button::new(
                    egui::RichText::new("📱 Activate AR").strong().color(egui::Color32::WHITE),
                )
                .fill(egui::Color32::from_rgb(16, 185, 129))
                .min_size(egui::vec2(ui.available_width(), 36.0));
                if ui.add(button).clicked() {
                    action = Some(ModalAction::ActivateAr);
                }
            });

        // A click on the backdrop closes the modal, unless a notice is up.
        if let Some(inner) = shown {
            let outside = ctx.input(|i| {
                i.pointer.primary_clicked()
                    && i.pointer
                        .interact_pos()
                        .is_some_and(|pos| !inner.response.rect.contains(pos))
            });
            if outside && self.host.notice().is_none() && action.is_none() {
                action = Some(ModalAction::Close);
            }
        }

        match action {
            Some(ModalAction::ActivateAr) => {
                if let Some(modal) = &mut self.modal {
                    modal.activate_ar();
                }
            }
            Some(ModalAction::Close) => self.close_modal(),
            None => {}
        }
    }

    pub fn draw_notice(&self, ctx: &egui::Context) {
        let Some(notice) = self.host.notice() else {
            return;
        };
        egui::Window::new("Notice")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(notice.to_string());
                if ui.button("OK").clicked() {
                    self.host.dismiss_notice();
                }
            });
    }
}
