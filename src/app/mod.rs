//! `GalleryApp` — the desktop egui shell around the gallery core.
//!
//! - `gallery_view` — header, card grid, error toast
//! - `modal_view`   — AR modal window and the unsupported-device notice
//! - `host`         — egui-backed page host and the preview viewer

pub mod gallery_view;
pub mod host;
pub mod modal_view;

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;

use ar_gallery::ar::modal::{ArModal, ModalOptions};
use ar_gallery::ar::platform::Environment;
use ar_gallery::card::Card;
use ar_gallery::catalog::{Catalog, Item};
use ar_gallery::config::GalleryConfig;
use ar_gallery::gallery::{Gallery, GalleryEvent};
use ar_gallery::net::probe::AssetProbe;
use ar_gallery::net::thumbnail::{ThumbnailLoader, ThumbnailStatus};

use host::{EguiHost, PreviewViewer};

pub struct GalleryApp {
    pub env: Environment,
    pub cards: Vec<Card>,
    pub gallery: Gallery,
    pub modal: Option<ArModal<PreviewViewer>>,
    pub host: Rc<EguiHost>,
    pub thumbnails: ThumbnailLoader,
    pub textures: HashMap<String, egui::TextureHandle>,
    pub modal_options: ModalOptions,
}

impl GalleryApp {
    pub fn new(
        config: &GalleryConfig,
        catalog: Catalog,
        env: Environment,
        probe: Arc<dyn AssetProbe>,
    ) -> Self {
        Self {
            env,
            cards: catalog.items().iter().cloned().map(Card::new).collect(),
            gallery: Gallery::new(probe, config.toast_timeout()),
            modal: None,
            host: Rc::new(EguiHost::default()),
            thumbnails: ThumbnailLoader::new(config.thumbnail_max_width),
            textures: HashMap::new(),
            modal_options: ModalOptions::from(config),
        }
    }

    fn open_modal(&mut self, item: Item, now: Instant) {
        // Unmount first so the new modal captures the page's real scroll state.
        if let Some(old) = self.modal.take() {
            old.close();
        }
        self.modal = Some(ArModal::mount(
            item,
            &self.env,
            PreviewViewer::default(),
            self.host.clone(),
            &self.modal_options,
            now,
        ));
    }

    pub fn close_modal(&mut self) {
        if let Some(modal) = self.modal.take() {
            modal.close();
        }
        self.gallery.close_modal();
    }

    /// Drive controllers: probe results, viewer events, timers, thumbnails.
    fn tick(&mut self, now: Instant) {
        for event in self.gallery.poll(now) {
            if let GalleryEvent::Selected(item) = event {
                self.open_modal(item, now);
            }
        }

        if let Some(modal) = &mut self.modal {
            for event in modal.viewer_mut().drain_events() {
                modal.on_viewer_event(event);
            }
            modal.poll(now);
        }

        if self.thumbnails.poll() {
            for card in &mut self.cards {
                let url = ar_gallery::ar::resolve::absolute_url(&card.item().image_path, &self.env.origin);
                if self.thumbnails.status(&url) == ThumbnailStatus::Failed {
                    card.on_image_error();
                }
            }
        }
    }

    fn schedule_repaint(&self, ctx: &egui::Context, now: Instant) {
        if self.gallery.is_checking() || self.thumbnails.pending_count() > 0 {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
        let deadlines = [
            self.gallery.next_deadline(),
            self.modal.as_ref().and_then(|m| m.next_deadline()),
        ];
        if let Some(next) = deadlines.into_iter().flatten().min() {
            ctx.request_repaint_after(next.saturating_duration_since(now));
        }
    }
}

impl eframe::App for GalleryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.tick(now);

        if let Some(url) = self.host.take_navigation() {
            log::info!("Opening {}", url);
            ctx.open_url(egui::OpenUrl::same_tab(url));
        }

        ctx.set_visuals(egui::Visuals::light());

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            self.draw_header(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_gallery(ui, ctx);
        });

        self.draw_toast(ctx);
        self.draw_modal(ctx);
        self.draw_notice(ctx);

        self.schedule_repaint(ctx, now);
    }
}
