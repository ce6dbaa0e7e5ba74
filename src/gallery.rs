//! Gallery controller: selection, pre-flight probe, error toast.
//!
//! `select_item` runs the reachability probe on a background thread and
//! returns immediately. Results and the toast timer are applied in
//! [`Gallery::poll`], which the UI loop calls every frame.
//!
//! Every check gets a ticket. A result is applied only if its ticket is newer
//! than the selection watermark, which only a successful selection or a modal
//! close advances. A slow probe therefore cannot resurrect a selection or
//! error the user has already moved past, while a failure never invalidates
//! an older check that is still in flight.

use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

use crate::catalog::{Item, ItemId};
use crate::error::ArError;
use crate::net::probe::AssetProbe;

#[derive(Debug, Clone, PartialEq)]
pub enum GalleryEvent {
    /// Asset reachable; mount the modal for this item.
    Selected(Item),
    /// Asset unreachable; toast shown.
    Unreachable(ItemId),
    ToastCleared,
}

struct PendingCheck {
    ticket: u64,
    item: Item,
    rx: mpsc::Receiver<bool>,
}

struct Toast {
    item: ItemId,
    clear_at: Instant,
}

pub struct Gallery {
    probe: Arc<dyn AssetProbe>,
    toast_timeout: Duration,
    pending: Vec<PendingCheck>,
    next_ticket: u64,
    /// Newest ticket that selected an item, or the last issued ticket at close.
    selection_mark: u64,
    selected: Option<Item>,
    toast: Option<Toast>,
}

impl Gallery {
    pub fn new(probe: Arc<dyn AssetProbe>, toast_timeout: Duration) -> Self {
        Self {
            probe,
            toast_timeout,
            pending: Vec::new(),
            next_ticket: 1,
            selection_mark: 0,
            selected: None,
            toast: None,
        }
    }

    /// Probe `item.model_path` and select the item if it is reachable.
    pub fn select_item(&mut self, item: &Item) {
        let ticket = self.next_ticket;
        self.next_ticket += 1;

        let (tx, rx) = mpsc::channel();
        let probe = Arc::clone(&self.probe);
        let asset = item.model_path.clone();
        std::thread::spawn(move || {
            // Receiver gone means the gallery was dropped.
            let _ = tx.send(probe.check_reachable(&asset));
        });

        log::debug!("Checking item {} (ticket {})", item.id, ticket);
        self.pending.push(PendingCheck {
            ticket,
            item: item.clone(),
            rx,
        });
    }

    /// Apply finished checks and expired timers without blocking.
    pub fn poll(&mut self, now: Instant) -> Vec<GalleryEvent> {
        let mut events = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            let ok = match self.pending[i].rx.try_recv() {
                Ok(ok) => ok,
                // Probe thread died: same as an unreachable asset.
                Err(mpsc::TryRecvError::Disconnected) => false,
                Err(mpsc::TryRecvError::Empty) => {
                    i += 1;
                    continue;
                }
            };
            let check = self.pending.remove(i);
            self.apply(check, ok, now, &mut events);
        }
        self.expire_toast(now, &mut events);
        events
    }

    /// Wait for every outstanding check, then apply them.
    pub fn settle(&mut self, now: Instant) -> Vec<GalleryEvent> {
        let mut events = Vec::new();
        for check in std::mem::take(&mut self.pending) {
            let ok = check.rx.recv().unwrap_or(false);
            self.apply(check, ok, now, &mut events);
        }
        self.expire_toast(now, &mut events);
        events
    }

    /// Clear the selection. Checks still in flight become stale.
    pub fn close_modal(&mut self) {
        self.selected = None;
        self.selection_mark = self.next_ticket - 1;
    }

    /// Item whose modal is open, if any.
    pub fn selected_item(&self) -> Option<&Item> {
        self.selected.as_ref()
    }

    /// Item whose toast is showing, if any.
    pub fn error_item_id(&self) -> Option<ItemId> {
        self.toast.as_ref().map(|t| t.item)
    }

    /// Toast text while an error is showing.
    pub fn toast_message(&self) -> Option<String> {
        self.toast
            .as_ref()
            .map(|t| ArError::AssetUnreachable { item: t.item }.to_string())
    }

    /// True while any reachability check is outstanding.
    pub fn is_checking(&self) -> bool {
        !self.pending.is_empty()
    }

    /// When the toast clears, for scheduling repaints.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.toast.as_ref().map(|t| t.clear_at)
    }

    fn apply(&mut self, check: PendingCheck, ok: bool, now: Instant, events: &mut Vec<GalleryEvent>) {
        if check.ticket <= self.selection_mark {
            log::debug!("Dropping stale check for item {} (ticket {})", check.item.id, check.ticket);
            return;
        }

        if ok {
            self.selection_mark = check.ticket;
            self.toast = None;
            events.push(GalleryEvent::Selected(check.item.clone()));
            self.selected = Some(check.item);
        } else {
            let id = check.item.id;
            log::info!("{}", ArError::AssetUnreachable { item: id });
            // Replaces any earlier toast, so the latest clear time wins.
            self.toast = Some(Toast {
                item: id,
                clear_at: now + self.toast_timeout,
            });
            events.push(GalleryEvent::Unreachable(id));
        }
    }

    fn expire_toast(&mut self, now: Instant, events: &mut Vec<GalleryEvent>) {
        if self.toast.as_ref().is_some_and(|t| now >= t.clear_at) {
            self.toast = None;
            events.push(GalleryEvent::ToastCleared);
        }
    }
}
