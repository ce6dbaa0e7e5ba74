//! Platform URL resolution.
//!
//! Turns an [`Item`] into the three sources each AR runtime needs:
//!
//! - `primary`  — absolute GLB URL (WebXR, Scene Viewer). Scene Viewer fetches
//!   the file out-of-process, so relative paths are not an option.
//! - `ios_alternate` — USDZ path for Quick Look.
//! - `android_intent` — Scene Viewer deep link, used when the viewer cannot
//!   start AR in-page.
//!
//! Resolution never fails; a malformed reference yields a best-effort string
//! and the probe or the AR runtime reports the problem later.

use url::{form_urlencoded, Url};

use crate::catalog::Item;

use super::platform::Environment;

const PRIMARY_SUFFIXES: [&str; 2] = [".glb", ".gltf"];
const IOS_SUFFIX: &str = ".usdz";

const SCENE_VIEWER: &str = "intent://arvr.google.com/scene-viewer/1.0";
const ARCORE_PACKAGE: &str = "com.google.ar.core";

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedUrls {
    pub primary: String,
    pub ios_alternate: String,
    pub android_intent: String,
}

impl ResolvedUrls {
    /// Append a freshness token to `primary`. The intent is left alone.
    pub fn with_cache_token(mut self, token: u128) -> Self {
        let (path, fragment) = match self.primary.find('#') {
            Some(i) => self.primary.split_at(i),
            None => (self.primary.as_str(), ""),
        };
        let sep = if path.contains('?') { '&' } else { '?' };
        self.primary = format!("{}{}v={}{}", path, sep, token, fragment);
        self
    }
}

pub fn resolve_urls(item: &Item, env: &Environment) -> ResolvedUrls {
    let primary = absolute_url(&item.model_path, &env.origin);
    let ios_alternate = match &item.ios_model_path {
        Some(path) => path.clone(),
        None => ios_alternate_path(&item.model_path),
    };
    let android_intent = scene_viewer_intent(&primary, &item.name);
    ResolvedUrls {
        primary,
        ios_alternate,
        android_intent,
    }
}

/// True when `reference` carries its own scheme (`https://…`, `data:…`).
pub fn is_absolute(reference: &str) -> bool {
    Url::parse(reference)
        .map(|u| u.has_host() || matches!(u.scheme(), "data" | "blob" | "file"))
        .unwrap_or(false)
}

pub fn absolute_url(reference: &str, origin: &str) -> String {
    if is_absolute(reference) {
        return reference.to_string();
    }
    let path = reference.trim_start_matches("./").trim_start_matches('/');
    format!("{}/{}", origin.trim_end_matches('/'), path)
}

/// Swap a GLB/glTF suffix for `.usdz`, keeping any query or fragment.
/// References without a known suffix come back unchanged.
pub fn ios_alternate_path(model_path: &str) -> String {
    let split = model_path.find(|c: char| c == '?' || c == '#').unwrap_or(model_path.len());
    let (path, tail) = model_path.split_at(split);
    let lower = path.to_ascii_lowercase();
    match PRIMARY_SUFFIXES.iter().find(|s| lower.ends_with(*s)) {
        Some(suffix) => format!("{}{}{}", &path[..path.len() - suffix.len()], IOS_SUFFIX, tail),
        None => model_path.to_string(),
    }
}

/// Scene Viewer intent for `primary`. The model URL is encoded as a single
/// component in both slots, so its own query cannot leak into the intent.
pub fn scene_viewer_intent(primary: &str, title: &str) -> String {
    let file = encode_component(primary);
    format!(
        "{}?file={}&mode=ar_only&title={}#Intent;scheme=https;package={};\
         action=android.intent.action.VIEW;S.browser_fallback_url={};end;",
        SCENE_VIEWER,
        file,
        encode_component(title),
        ARCORE_PACKAGE,
        file,
    )
}

/// Percent-encode like `encodeURIComponent` (space becomes `%20`, not `+`).
fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
