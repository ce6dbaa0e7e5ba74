//! Desktop implementations of the page host and the viewer.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use ar_gallery::ar::viewer::{ViewerCapability, ViewerEvent, ViewerSource};
use ar_gallery::host::PageHost;
use ar_gallery::ArError;

/// Side effects are queued here and flushed by the egui update loop, which is
/// the only place that holds the `egui::Context`.
#[derive(Default)]
pub struct EguiHost {
    scroll_locked: Cell<bool>,
    navigation: RefCell<Option<String>>,
    notice: RefCell<Option<ArError>>,
}

impl EguiHost {
    pub fn take_navigation(&self) -> Option<String> {
        self.navigation.borrow_mut().take()
    }

    pub fn notice(&self) -> Option<ArError> {
        self.notice.borrow().clone()
    }

    pub fn dismiss_notice(&self) {
        self.notice.borrow_mut().take();
    }
}

impl PageHost for EguiHost {
    fn scroll_locked(&self) -> bool {
        self.scroll_locked.get()
    }

    fn set_scroll_locked(&self, locked: bool) {
        self.scroll_locked.set(locked);
    }

    fn navigate(&self, url: &str) {
        *self.navigation.borrow_mut() = Some(url.to_string());
    }

    fn notify(&self, error: &ArError) {
        *self.notice.borrow_mut() = Some(error.clone());
    }
}

/// Desktop stand-in for the web viewer element.
///
/// It does not decode the model; the asset already passed the reachability
/// probe, so it reports `Load` as soon as it has a source. There is no AR
/// runtime on the desktop, so it never offers in-page activation.
#[derive(Default)]
pub struct PreviewViewer {
    source: Option<ViewerSource>,
    events: VecDeque<ViewerEvent>,
}

impl PreviewViewer {
    pub fn source(&self) -> Option<&ViewerSource> {
        self.source.as_ref()
    }

    pub fn drain_events(&mut self) -> Vec<ViewerEvent> {
        self.events.drain(..).collect()
    }
}

impl ViewerCapability for PreviewViewer {
    fn configure(&mut self, source: &ViewerSource) {
        if source.src.is_empty() {
            self.events.push_back(ViewerEvent::Error("empty source".into()));
        } else {
            self.events.push_back(ViewerEvent::Load);
        }
        self.source = Some(source.clone());
    }

    fn can_activate_ar(&self) -> bool {
        false
    }

    fn activate_ar(&mut self) {}
}
