//! Header, card grid and error toast.

use eframe::egui;

use ar_gallery::ar::resolve::absolute_url;
use ar_gallery::card::{CardImage, CAPTION, PLACEHOLDER, VIEW_IN_AR};
use ar_gallery::host::PageHost;

use super::GalleryApp;

const CARD_WIDTH: f32 = 260.0;
const THUMB_HEIGHT: f32 = 180.0;

impl GalleryApp {
    pub fn draw_header(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(8.0);
            ui.heading("AR Food Gallery");
            ui.label("Experience food in augmented reality");
            ui.add_space(8.0);
        });
    }

    /// Render the card grid. Scrolling is disabled while a modal holds the
    /// page scroll lock.
    pub fn draw_gallery(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let mut clicked = None;
        let modal_open = self.modal.is_some();
        let locked = self.host.scroll_locked();

        ui.vertical_centered(|ui| {
            ui.label(
                "View these delicious food items in augmented reality using your device's camera",
            );
        });
        ui.add_space(12.0);

        egui::ScrollArea::vertical()
            .enable_scrolling(!locked)
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for (idx, card) in self.cards.iter().enumerate() {
                        let thumb_url = match card.image() {
                            CardImage::Image(path) => Some(absolute_url(path, &self.env.origin)),
                            CardImage::Placeholder => None,
                        };
                        if let Some(url) = &thumb_url {
                            self.thumbnails.request(url);
                            if !self.textures.contains_key(url) {
                                if let Some(thumb) = self.thumbnails.get(url) {
                                    let image = egui::ColorImage::from_rgba_unmultiplied(
                                        [thumb.width as usize, thumb.height as usize],
                                        &thumb.rgba,
                                    );
                                    let texture =
                                        ctx.load_texture(url, image, egui::TextureOptions::LINEAR);
                                    self.textures.insert(url.clone(), texture);
                                }
                            }
                        }

                        ui.group(|ui| {
                            ui.set_width(CARD_WIDTH);
                            ui.vertical(|ui| {
                                let size = egui::vec2(CARD_WIDTH, THUMB_HEIGHT);
                                match thumb_url.as_ref().and_then(|u| self.textures.get(u)) {
                                    Some(texture) => {
                                        ui.add(
                                            egui::Image::new(
                                                egui::load::SizedTexture::from_handle(texture),
                                            )
                                            .fit_to_exact_size(size),
                                        );
                                    }
                                    None => {
                                        ui.add_sized(
                                            size,
                                            egui::Label::new(egui::RichText::new(PLACEHOLDER).size(48.0)),
                                        );
                                    }
                                }

                                ui.add_space(6.0);
                                ui.heading(&card.item().name);
                                let button = egui::Button::new(format!("📱 {}", VIEW_IN_AR))
                                    .min_size(egui::vec2(CARD_WIDTH, 32.0));
                                if ui.add_enabled(!modal_open, button).clicked() {
                                    clicked = Some(idx);
                                }
                                ui.small(CAPTION);
                            });
                        });
                    }
                });
            });

        if let Some(idx) = clicked {
            let item = self.cards[idx].item().clone();
            self.gallery.select_item(&item);
        }
    }

    pub fn draw_toast(&self, ctx: &egui::Context) {
        let Some(message) = self.gallery.toast_message() else {
            return;
        };
        egui::Area::new(egui::Id::new("error_toast"))
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -16.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::none()
                    .fill(egui::Color32::from_rgb(239, 68, 68))
                    .rounding(8.0)
                    .inner_margin(egui::Margin::symmetric(24.0, 12.0))
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(format!("⚠ {}", message))
                                .color(egui::Color32::WHITE)
                                .strong(),
                        );
                    });
            });
    }
}
