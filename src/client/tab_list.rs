use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::client::{TabClient, TabId};

/// Tab set fed by whoever observes the browser. Clones share state, so one
/// copy can be handed to the coordinator while another keeps it current.
#[derive(Clone, Debug, Default)]
pub struct TabList {
    open: Arc<Mutex<HashSet<TabId>>>,
}

impl TabList {
    pub fn new() -> TabList {
        TabList::default()
    }

    pub fn with_tabs(tabs: impl IntoIterator<Item = TabId>) -> TabList {
        TabList {
            open: Arc::new(Mutex::new(tabs.into_iter().collect())),
        }
    }

    pub fn open(&self, tab_id: TabId) {
        self.lock().insert(tab_id);
    }

    pub fn close(&self, tab_id: TabId) {
        self.lock().remove(&tab_id);
    }

    // A panic elsewhere cannot leave a HashSet half-updated, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, HashSet<TabId>> {
        self.open.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TabClient for TabList {
    fn open_tabs(&mut self) -> Vec<TabId> {
        self.lock().iter().copied().collect()
    }
}
