//! Runtime configuration, loaded from a JSON file.
//!
//! Every field has a default so `{}` is a valid configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::ar::viewer::{ArMode, ArPlacement, ArScale};
use crate::error::{ArError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Origin that relative asset paths are resolved against.
    pub origin: String,
    /// Overrides the detected user agent (platform branching).
    pub user_agent: Option<String>,
    pub catalog: PathBuf,
    pub toast_timeout_ms: u64,
    pub ar_sample_delay_ms: u64,
    /// Append `v=<millis>` to the viewer source at mount.
    pub cache_bust: bool,
    pub probe_timeout_secs: u64,
    pub thumbnail_max_width: u32,
    pub viewer: ViewerConfig,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:3000".to_string(),
            user_agent: None,
            catalog: PathBuf::from("dishes.json"),
            toast_timeout_ms: 3000,
            ar_sample_delay_ms: 1000,
            cache_bust: true,
            probe_timeout_secs: 10,
            thumbnail_max_width: 512,
            viewer: ViewerConfig::default(),
        }
    }
}

impl GalleryConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ArError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<()> {
        if url::Url::parse(&self.origin).map_or(true, |u| !u.has_host()) {
            return Err(ArError::Config(format!(
                "origin must be an absolute http(s) URL, got {:?}",
                self.origin
            )));
        }
        if self.viewer.ar_modes.is_empty() {
            return Err(ArError::Config("viewer.ar_modes must not be empty".into()));
        }
        Ok(())
    }

    pub fn toast_timeout(&self) -> Duration {
        Duration::from_millis(self.toast_timeout_ms)
    }

    pub fn ar_sample_delay(&self) -> Duration {
        Duration::from_millis(self.ar_sample_delay_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

/// Presentation attributes handed to the viewer at mount.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub ar_modes: Vec<ArMode>,
    pub ar_scale: ArScale,
    pub ar_placement: ArPlacement,
    pub camera_controls: bool,
    pub auto_rotate: bool,
    pub scale: [f32; 3],
    pub min_camera_orbit: String,
    pub max_camera_orbit: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            ar_modes: vec![ArMode::WebXr, ArMode::SceneViewer, ArMode::QuickLook],
            ar_scale: ArScale::Fixed,
            ar_placement: ArPlacement::Floor,
            camera_controls: true,
            auto_rotate: true,
            scale: [0.001, 0.001, 0.001],
            min_camera_orbit: "auto 0deg auto".to_string(),
            max_camera_orbit: "auto 90deg auto".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = GalleryConfig::from_json("{}").unwrap();
        assert_eq!(config.toast_timeout(), Duration::from_secs(3));
        assert_eq!(config.ar_sample_delay(), Duration::from_secs(1));
        assert!(config.cache_bust);
        assert_eq!(config.viewer.ar_modes.len(), 3);
    }

    #[test]
    fn overrides_nested_viewer_fields() {
        let json = r#"{
            "origin": "https://food.test",
            "cache_bust": false,
            "viewer": {"ar_modes": ["scene-viewer"], "ar_placement": "wall"}
        }"#;
        let config = GalleryConfig::from_json(json).unwrap();
        assert_eq!(config.origin, "https://food.test");
        assert!(!config.cache_bust);
        assert_eq!(config.viewer.ar_modes, vec![ArMode::SceneViewer]);
        assert_eq!(config.viewer.ar_placement, ArPlacement::Wall);
        assert_eq!(config.viewer.ar_scale, ArScale::Fixed);
    }

    #[test]
    fn rejects_relative_origin() {
        let err = GalleryConfig::from_json(r#"{"origin": "/app"}"#).unwrap_err();
        assert!(matches!(err, ArError::Config(_)));
    }

    #[test]
    fn rejects_empty_ar_modes() {
        assert!(GalleryConfig::from_json(r#"{"viewer": {"ar_modes": []}}"#).is_err());
    }
}
