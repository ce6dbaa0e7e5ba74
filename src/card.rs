//! Catalog card: thumbnail with placeholder fallback and the AR trigger.

use crate::catalog::Item;

pub const VIEW_IN_AR: &str = "View in AR";
pub const CAPTION: &str = "Best experienced on mobile devices";
pub const PLACEHOLDER: &str = "🍽️";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardImage<'a> {
    Image(&'a str),
    Placeholder,
}

#[derive(Debug, Clone)]
pub struct Card {
    item: Item,
    image_failed: bool,
}

impl Card {
    pub fn new(item: Item) -> Self {
        Self {
            item,
            image_failed: false,
        }
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    /// Once an image error is seen the card keeps the placeholder.
    pub fn on_image_error(&mut self) {
        self.image_failed = true;
    }

    pub fn image(&self) -> CardImage<'_> {
        if self.image_failed || self.item.image_path.is_empty() {
            CardImage::Placeholder
        } else {
            CardImage::Image(&self.item.image_path)
        }
    }
}
