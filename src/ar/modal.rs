//! AR modal: owns one viewer instance for the lifetime of a selection.
//!
//! ```text
//!            Load                 Ar(SessionStarted)
//! Loading ─────────▶ Ready ─────────────────────────▶ ArActive
//!    │                 ▲ ◀───────────────────────────────┘
//!    │ Error           │        Ar(NotPresenting | Failed)
//!    ▼                 │
//! LoadFailed ──────────┘ (a late Load still recovers)
//! ```
//!
//! Mounting locks page scroll; dropping the modal restores whatever lock state
//! the page had before, whether it was closed explicitly or not.

use std::rc::Rc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::catalog::Item;
use crate::config::{GalleryConfig, ViewerConfig};
use crate::error::ArError;
use crate::host::PageHost;

use super::platform::{Environment, Platform};
use super::resolve::{resolve_urls, ResolvedUrls};
use super::viewer::{ArStatus, ViewerCapability, ViewerEvent, ViewerSource};

pub const AR_HINT: &str = "AR may not be supported on this device.";
pub const INSTRUCTIONS: &str = "Tap the AR button below to view in your space!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    Loading,
    Ready,
    /// Load error reported. AR activation is still allowed.
    LoadFailed,
    ArActive,
}

/// Which path `activate_ar` took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The viewer started AR itself (WebXR, Scene Viewer or Quick Look).
    Delegated,
    /// Navigated to the Scene Viewer intent.
    IntentFallback,
    /// No AR path; the user was notified.
    Unsupported,
}

#[derive(Debug, Clone)]
pub struct ModalOptions {
    pub ar_sample_delay: Duration,
    pub cache_bust: bool,
    pub viewer: ViewerConfig,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self::from(&GalleryConfig::default())
    }
}

impl From<&GalleryConfig> for ModalOptions {
    fn from(config: &GalleryConfig) -> Self {
        Self {
            ar_sample_delay: config.ar_sample_delay(),
            cache_bust: config.cache_bust,
            viewer: config.viewer.clone(),
        }
    }
}

pub struct ArModal<V: ViewerCapability> {
    item: Item,
    urls: ResolvedUrls,
    platform: Platform,
    viewer: V,
    host: Rc<dyn PageHost>,
    /// State outside of an AR session.
    resting: ViewerState,
    ar_active: bool,
    load_error: Option<ArError>,
    ar_supported: Option<bool>,
    ar_sample_at: Option<Instant>,
    prior_scroll_lock: bool,
}

impl<V: ViewerCapability> ArModal<V> {
    pub fn mount(
        item: Item,
        env: &Environment,
        mut viewer: V,
        host: Rc<dyn PageHost>,
        options: &ModalOptions,
        now: Instant,
    ) -> Self {
        let mut urls = resolve_urls(&item, env);
        if options.cache_bust {
            urls = urls.with_cache_token(unix_millis());
        }

        viewer.configure(&ViewerSource {
            src: urls.primary.clone(),
            ios_src: urls.ios_alternate.clone(),
            options: options.viewer.clone(),
        });

        let prior_scroll_lock = host.scroll_locked();
        host.set_scroll_locked(true);

        log::info!("AR modal mounted for item {} ({})", item.id, urls.primary);

        Self {
            item,
            urls,
            platform: env.platform(),
            viewer,
            host,
            resting: ViewerState::Loading,
            ar_active: false,
            load_error: None,
            ar_supported: None,
            ar_sample_at: Some(now + options.ar_sample_delay),
            prior_scroll_lock,
        }
    }

    pub fn on_viewer_event(&mut self, event: ViewerEvent) {
        match event {
            ViewerEvent::Load => {
                self.resting = ViewerState::Ready;
                self.load_error = None;
            }
            ViewerEvent::Error(message) => {
                let error = ArError::ViewerLoadFailed(message);
                log::warn!("item {}: {}", self.item.id, error);
                self.resting = ViewerState::LoadFailed;
                self.load_error = Some(error);
            }
            ViewerEvent::Ar(ArStatus::SessionStarted) => self.ar_active = true,
            ViewerEvent::Ar(ArStatus::NotPresenting) => self.ar_active = false,
            ViewerEvent::Ar(ArStatus::Failed) => {
                log::warn!("item {}: AR session failed", self.item.id);
                self.ar_active = false;
            }
        }
    }

    /// Fire due timers. Call from the UI loop.
    pub fn poll(&mut self, now: Instant) {
        if let Some(at) = self.ar_sample_at {
            if now >= at {
                let supported = self.viewer.can_activate_ar();
                log::debug!("item {}: viewer reports AR support = {}", self.item.id, supported);
                self.ar_supported = Some(supported);
                self.ar_sample_at = None;
            }
        }
    }

    pub fn activate_ar(&mut self) -> Activation {
        if self.viewer.can_activate_ar() {
            log::info!("item {}: delegating AR to viewer", self.item.id);
            self.viewer.activate_ar();
            Activation::Delegated
        } else if self.platform == Platform::Android {
            log::info!("item {}: falling back to Scene Viewer intent", self.item.id);
            self.host.navigate(&self.urls.android_intent);
            Activation::IntentFallback
        } else {
            log::info!("item {}: no AR path on {:?}", self.item.id, self.platform);
            self.host.notify(&ArError::ArUnsupported);
            Activation::Unsupported
        }
    }

    /// Unmount. Scroll lock is restored by `Drop`.
    pub fn close(self) {
        log::info!("AR modal closed for item {}", self.item.id);
    }

    /// Current lifecycle state; an active AR session masks the resting state.
    pub fn state(&self) -> ViewerState {
        if self.ar_active {
            ViewerState::ArActive
        } else {
            self.resting
        }
    }

    /// True until the viewer reports load or error.
    pub fn is_loading(&self) -> bool {
        self.state() == ViewerState::Loading
    }

    /// `None` until the delayed sample has been taken.
    pub fn ar_supported(&self) -> Option<bool> {
        self.ar_supported
    }

    /// Advisory shown once the sample found no in-page AR.
    pub fn ar_hint(&self) -> Option<&'static str> {
        (self.ar_supported == Some(false)).then_some(AR_HINT)
    }

    /// Viewer load failure, if one was reported.
    pub fn load_error(&self) -> Option<&ArError> {
        self.load_error.as_ref()
    }

    /// Modal heading, e.g. `Pizza in AR`.
    pub fn title(&self) -> String {
        format!("{} in AR", self.item.name)
    }

    /// The item this modal was mounted for.
    pub fn item(&self) -> &Item {
        &self.item
    }

    /// URLs resolved at mount time.
    pub fn urls(&self) -> &ResolvedUrls {
        &self.urls
    }

    /// Platform the activation path branches on.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// The mounted viewer.
    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    /// Mutable access to the mounted viewer.
    pub fn viewer_mut(&mut self) -> &mut V {
        &mut self.viewer
    }

    /// Next pending timer deadline, for scheduling repaints.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.ar_sample_at
    }
}

impl<V: ViewerCapability> Drop for ArModal<V> {
    fn drop(&mut self) {
        self.host.set_scroll_locked(self.prior_scroll_lock);
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;

    const ANDROID: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) Chrome/120 Mobile";
    const DESKTOP: &str = "Mozilla/5.0 (X11; Linux x86_64) Firefox/120";

    #[derive(Default)]
    struct FakeViewer {
        source: Option<ViewerSource>,
        can_ar: bool,
        activations: usize,
    }

    impl ViewerCapability for FakeViewer {
        fn configure(&mut self, source: &ViewerSource) {
            self.source = Some(source.clone());
        }

        fn can_activate_ar(&self) -> bool {
            self.can_ar
        }

        fn activate_ar(&mut self) {
            self.activations += 1;
        }
    }

    fn options() -> ModalOptions {
        ModalOptions {
            cache_bust: false,
            ..ModalOptions::default()
        }
    }

    fn mount(ua: &str, can_ar: bool, host: &Rc<MemoryHost>, now: Instant) -> ArModal<FakeViewer> {
        let viewer = FakeViewer {
            can_ar,
            ..FakeViewer::default()
        };
        ArModal::mount(
            Item::new(1, "Pizza Margherita", "/models/pizza.glb"),
            &Environment::new("https://x.test", ua),
            viewer,
            host.clone(),
            &options(),
            now,
        )
    }

    #[test]
    fn mount_configures_viewer_and_locks_scroll() {
        let host = Rc::new(MemoryHost::new());
        let modal = mount(DESKTOP, true, &host, Instant::now());
        let source = modal.viewer().source.as_ref().unwrap();
        assert_eq!(source.src, "https://x.test/models/pizza.glb");
        assert_eq!(source.ios_src, "/models/pizza.usdz");
        assert_eq!(modal.state(), ViewerState::Loading);
        assert!(modal.is_loading());
        assert!(host.scroll_locked());
        assert_eq!(modal.title(), "Pizza Margherita in AR");
    }

    #[test]
    fn cache_bust_appends_token_to_viewer_source() {
        let host = Rc::new(MemoryHost::new());
        let modal = ArModal::mount(
            Item::new(1, "Pizza", "/models/pizza.glb"),
            &Environment::new("https://x.test", DESKTOP),
            FakeViewer::default(),
            host.clone(),
            &ModalOptions::default(),
            Instant::now(),
        );
        let src = &modal.viewer().source.as_ref().unwrap().src;
        assert!(src.starts_with("https://x.test/models/pizza.glb?v="));
        assert!(!modal.urls().android_intent.contains("?v="));
    }

    #[test]
    fn load_and_ar_session_transitions() {
        let host = Rc::new(MemoryHost::new());
        let mut modal = mount(ANDROID, true, &host, Instant::now());
        modal.on_viewer_event(ViewerEvent::Load);
        assert_eq!(modal.state(), ViewerState::Ready);
        modal.on_viewer_event(ViewerEvent::Ar(ArStatus::SessionStarted));
        assert_eq!(modal.state(), ViewerState::ArActive);
        modal.on_viewer_event(ViewerEvent::Ar(ArStatus::NotPresenting));
        assert_eq!(modal.state(), ViewerState::Ready);
    }

    #[test]
    fn load_error_clears_loading_but_allows_activation() {
        let host = Rc::new(MemoryHost::new());
        let mut modal = mount(DESKTOP, false, &host, Instant::now());
        modal.on_viewer_event(ViewerEvent::Error("404".into()));
        assert_eq!(modal.state(), ViewerState::LoadFailed);
        assert!(!modal.is_loading());
        assert!(matches!(modal.load_error(), Some(ArError::ViewerLoadFailed(_))));

        assert_eq!(modal.activate_ar(), Activation::Unsupported);
        assert_eq!(host.notices(), vec![ArError::ArUnsupported]);
    }

    #[test]
    fn delegates_when_viewer_can_activate() {
        let host = Rc::new(MemoryHost::new());
        let mut modal = mount(ANDROID, true, &host, Instant::now());
        assert_eq!(modal.activate_ar(), Activation::Delegated);
        assert_eq!(modal.viewer().activations, 1);
        assert!(host.navigations().is_empty());
        assert!(host.notices().is_empty());
    }

    #[test]
    fn android_without_viewer_ar_navigates_to_intent() {
        let host = Rc::new(MemoryHost::new());
        let mut modal = mount(ANDROID, false, &host, Instant::now());
        assert_eq!(modal.activate_ar(), Activation::IntentFallback);

        let navigations = host.navigations();
        assert_eq!(navigations.len(), 1);
        let intent = &navigations[0];
        assert!(intent.contains("file=https%3A%2F%2Fx.test%2Fmodels%2Fpizza.glb&"));
        assert!(intent.contains("title=Pizza%20Margherita"));
        assert!(intent.contains("S.browser_fallback_url=https%3A%2F%2Fx.test%2Fmodels%2Fpizza.glb;"));
        assert_eq!(modal.viewer().activations, 0);
    }

    #[test]
    fn desktop_without_ar_notifies_and_stays() {
        let host = Rc::new(MemoryHost::new());
        let mut modal = mount(DESKTOP, false, &host, Instant::now());
        assert_eq!(modal.activate_ar(), Activation::Unsupported);
        assert!(host.navigations().is_empty());
        assert_eq!(host.notices(), vec![ArError::ArUnsupported]);
    }

    #[test]
    fn ar_support_is_sampled_once_after_delay() {
        let host = Rc::new(MemoryHost::new());
        let start = Instant::now();
        let mut modal = mount(DESKTOP, false, &host, start);

        modal.poll(start + Duration::from_millis(500));
        assert_eq!(modal.ar_supported(), None);
        assert_eq!(modal.ar_hint(), None);

        modal.poll(start + Duration::from_secs(1));
        assert_eq!(modal.ar_supported(), Some(false));
        assert_eq!(modal.ar_hint(), Some(AR_HINT));
        assert_eq!(modal.next_deadline(), None);

        // Later changes in the viewer's self report are not re-sampled.
        modal.viewer_mut().can_ar = true;
        modal.poll(start + Duration::from_secs(5));
        assert_eq!(modal.ar_supported(), Some(false));
        // ...but activation reads it live.
        assert_eq!(modal.activate_ar(), Activation::Delegated);
    }

    #[test]
    fn close_restores_prior_scroll_state() {
        let host = Rc::new(MemoryHost::new());
        let modal = mount(DESKTOP, false, &host, Instant::now());
        modal.close();
        assert!(!host.scroll_locked());

        let locked = Rc::new(MemoryHost::with_scroll_locked(true));
        let modal = mount(DESKTOP, false, &locked, Instant::now());
        modal.close();
        assert!(locked.scroll_locked());
    }

    #[test]
    fn dropping_without_close_restores_scroll() {
        let host = Rc::new(MemoryHost::new());
        {
            let _modal = mount(ANDROID, true, &host, Instant::now());
            assert!(host.scroll_locked());
        }
        assert!(!host.scroll_locked());
    }
}
