//! Card thumbnail loader.
//!
//! Each requested URL is fetched and decoded on its own background thread;
//! the UI loop calls [`ThumbnailLoader::poll`] every frame to collect results.
//! A failed URL is remembered and never retried, so its card stays on the
//! placeholder. All fetches share one HTTP client and its connection pool.

use std::collections::HashMap;
use std::sync::mpsc;
use std::time::Duration;

/// Decoded RGBA pixels.
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

enum Slot {
    Pending(mpsc::Receiver<Option<Thumbnail>>),
    Ready(Thumbnail),
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailStatus {
    Unknown,
    Pending,
    Ready,
    Failed,
}

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

pub struct ThumbnailLoader {
    slots: HashMap<String, Slot>,
    max_width: u32,
    client: Option<reqwest::blocking::Client>,
}

impl ThumbnailLoader {
    pub fn new(max_width: u32) -> Self {
        let client = match reqwest::blocking::Client::builder()
            .user_agent(concat!("ar-gallery/", env!("CARGO_PKG_VERSION")))
            .timeout(FETCH_TIMEOUT)
            .build()
        {
            Ok(client) => Some(client),
            // Every card then falls back to its placeholder.
            Err(e) => {
                log::warn!("Thumbnail client unavailable: {}", e);
                None
            }
        };
        Self {
            slots: HashMap::new(),
            max_width,
            client,
        }
    }

    /// Start fetching `url` unless it is already known.
    pub fn request(&mut self, url: &str) {
        if self.slots.contains_key(url) {
            return;
        }

        let Some(client) = self.client.clone() else {
            self.slots.insert(url.to_string(), Slot::Failed);
            return;
        };

        let (tx, rx) = mpsc::channel();
        let target = url.to_string();
        let max_width = self.max_width;
        std::thread::spawn(move || {
            let _ = tx.send(fetch_and_decode(&client, &target, max_width));
        });

        self.slots.insert(url.to_string(), Slot::Pending(rx));
    }

    /// Collect finished downloads. Returns `true` if anything changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        for (url, slot) in self.slots.iter_mut() {
            let Slot::Pending(rx) = slot else { continue };
            let next = match rx.try_recv() {
                Ok(Some(thumb)) => Slot::Ready(thumb),
                Ok(None) | Err(mpsc::TryRecvError::Disconnected) => {
                    log::debug!("Thumbnail failed: {}", url);
                    Slot::Failed
                }
                Err(mpsc::TryRecvError::Empty) => continue,
            };
            *slot = next;
            changed = true;
        }
        changed
    }

    /// Where `url` is in its fetch lifecycle.
    pub fn status(&self, url: &str) -> ThumbnailStatus {
        match self.slots.get(url) {
            None => ThumbnailStatus::Unknown,
            Some(Slot::Pending(_)) => ThumbnailStatus::Pending,
            Some(Slot::Ready(_)) => ThumbnailStatus::Ready,
            Some(Slot::Failed) => ThumbnailStatus::Failed,
        }
    }

    /// Decoded pixels once `url` is ready.
    pub fn get(&self, url: &str) -> Option<&Thumbnail> {
        match self.slots.get(url) {
            Some(Slot::Ready(thumb)) => Some(thumb),
            _ => None,
        }
    }

    /// Fetches still in flight.
    pub fn pending_count(&self) -> usize {
        self.slots
            .values()
            .filter(|s| matches!(s, Slot::Pending(_)))
            .count()
    }
}

fn fetch_and_decode(
    client: &reqwest::blocking::Client,
    url: &str,
    max_width: u32,
) -> Option<Thumbnail> {
    let resp = client
        .get(url)
        .send()
        .and_then(|resp| resp.error_for_status())
        .ok()?;
    let decoded = image::load_from_memory(&resp.bytes().ok()?).ok()?;

    // Downscale wide images only; aspect ratio is preserved.
    let decoded = if decoded.width() > max_width {
        decoded.resize(max_width, u32::MAX, image::imageops::FilterType::Triangle)
    } else {
        decoded
    };

    let rgba = decoded.into_rgba8();
    Some(Thumbnail {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}
