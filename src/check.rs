//! Headless catalog check.
//!
//! Runs every catalog item through the same path the gallery uses (probe,
//! then modal mount) with an in-memory host, and reports what "Activate AR"
//! would do for the given user agent when the viewer cannot start AR itself.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use crate::ar::modal::{Activation, ArModal, ModalOptions};
use crate::ar::platform::Environment;
use crate::ar::resolve::ResolvedUrls;
use crate::ar::viewer::{ViewerCapability, ViewerSource};
use crate::catalog::{Catalog, Item};
use crate::gallery::{Gallery, GalleryEvent};
use crate::host::MemoryHost;
use crate::net::probe::AssetProbe;

/// Stand-in viewer with no in-page AR.
struct NoArViewer;

impl ViewerCapability for NoArViewer {
    fn configure(&mut self, _source: &ViewerSource) {}

    fn can_activate_ar(&self) -> bool {
        false
    }

    fn activate_ar(&mut self) {}
}

pub struct ItemReport {
    pub item: Item,
    pub reachable: bool,
    /// Only for reachable items; unreachable ones never get a modal.
    pub urls: Option<ResolvedUrls>,
    pub fallback: Option<Activation>,
}

impl fmt::Display for ItemReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.reachable { "ok" } else { "MISSING" };
        writeln!(f, "[{}] #{} {} ({})", mark, self.item.id, self.item.name, self.item.model_path)?;
        if let Some(urls) = &self.urls {
            writeln!(f, "    primary: {}", urls.primary)?;
            writeln!(f, "    ios:     {}", urls.ios_alternate)?;
            writeln!(f, "    intent:  {}", urls.android_intent)?;
        }
        if let Some(fallback) = self.fallback {
            writeln!(f, "    fallback: {:?}", fallback)?;
        }
        Ok(())
    }
}

pub fn check_catalog(
    catalog: &Catalog,
    probe: Arc<dyn AssetProbe>,
    env: &Environment,
    options: &ModalOptions,
) -> Vec<ItemReport> {
    let options = ModalOptions {
        cache_bust: false,
        ..options.clone()
    };
    let mut gallery = Gallery::new(probe, std::time::Duration::ZERO);
    let host = Rc::new(MemoryHost::new());

    catalog
        .items()
        .iter()
        .map(|item| {
            gallery.select_item(item);
            let now = Instant::now();
            let selected = gallery
                .settle(now)
                .into_iter()
                .find_map(|e| match e {
                    GalleryEvent::Selected(item) => Some(item),
                    _ => None,
                });

            match selected {
                Some(item) => {
                    let mut modal =
                        ArModal::mount(item.clone(), env, NoArViewer, host.clone(), &options, now);
                    let fallback = modal.activate_ar();
                    let urls = modal.urls().clone();
                    modal.close();
                    gallery.close_modal();
                    ItemReport {
                        item,
                        reachable: true,
                        urls: Some(urls),
                        fallback: Some(fallback),
                    }
                }
                None => ItemReport {
                    item: item.clone(),
                    reachable: false,
                    urls: None,
                    fallback: None,
                },
            }
        })
        .collect()
}
