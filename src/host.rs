//! Page-level side effects, injected into the controllers.
//!
//! Scroll lock, navigation and user notices are global to the page. The
//! controllers reach them only through [`PageHost`] so they can be replaced
//! in tests and in the headless check mode.

use std::cell::{Cell, RefCell};

use crate::error::ArError;

/// Methods take `&self`: one host is shared by every mounted controller on
/// the UI thread.
pub trait PageHost {
    fn scroll_locked(&self) -> bool;
    fn set_scroll_locked(&self, locked: bool);
    /// Leave the page for `url` (intent deep links included).
    fn navigate(&self, url: &str);
    /// Blocking user notice.
    fn notify(&self, error: &ArError);
}

/// In-memory host that records every side effect.
#[derive(Debug, Default)]
pub struct MemoryHost {
    locked: Cell<bool>,
    navigations: RefCell<Vec<String>>,
    notices: RefCell<Vec<ArError>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scroll_locked(locked: bool) -> Self {
        let host = Self::default();
        host.locked.set(locked);
        host
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.borrow().clone()
    }

    pub fn notices(&self) -> Vec<ArError> {
        self.notices.borrow().clone()
    }
}

impl PageHost for MemoryHost {
    fn scroll_locked(&self) -> bool {
        self.locked.get()
    }

    fn set_scroll_locked(&self, locked: bool) {
        self.locked.set(locked);
    }

    fn navigate(&self, url: &str) {
        self.navigations.borrow_mut().push(url.to_string());
    }

    fn notify(&self, error: &ArError) {
        self.notices.borrow_mut().push(error.clone());
    }
}
