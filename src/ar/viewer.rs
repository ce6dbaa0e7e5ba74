//! The embedded 3D/AR viewer, seen from the outside.
//!
//! The modal only needs a handful of things from the viewer: accept sources
//! and presentation attributes, say whether it can start AR right now, start
//! AR, and report load / error / AR-status events. Everything else (decoding,
//! rendering, the AR session itself) stays behind this trait.

use serde::Deserialize;

use crate::config::ViewerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArMode {
    #[serde(rename = "webxr")]
    WebXr,
    SceneViewer,
    QuickLook,
}

impl ArMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ArMode::WebXr => "webxr",
            ArMode::SceneViewer => "scene-viewer",
            ArMode::QuickLook => "quick-look",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArScale {
    Auto,
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArPlacement {
    Floor,
    Wall,
}

/// Everything the viewer is given at mount.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerSource {
    /// Primary GLB URL, possibly cache-busted.
    pub src: String,
    /// USDZ source for Quick Look.
    pub ios_src: String,
    pub options: ViewerConfig,
}

impl ViewerSource {
    /// Space-separated `ar-modes` attribute value.
    pub fn ar_modes_attr(&self) -> String {
        self.options
            .ar_modes
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// AR session status, as reported by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArStatus {
    SessionStarted,
    NotPresenting,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    Load,
    Error(String),
    Ar(ArStatus),
}

pub trait ViewerCapability {
    fn configure(&mut self, source: &ViewerSource);

    /// Best-effort self report. May be `false` simply because the viewer has
    /// not finished initializing.
    fn can_activate_ar(&self) -> bool;

    /// Hand off to the device AR runtime. Fire-and-forget.
    fn activate_ar(&mut self);
}
