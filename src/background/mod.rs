mod coordinator;
mod handle;
mod types;

#[cfg(test)]
mod tests;

use std::collections::{HashMap, HashSet};

use url::Url;

use crate::client::TabId;

pub use coordinator::{Coordinator, SWEEP_INTERVAL};
pub use handle::CoordinatorHandle;
pub use types::{CoordinatorError, Message, MessageSender, Response};

/// Tab id to hostname, as reported by each tab when it connects.
#[derive(Debug, Default)]
pub struct HostnameCache {
    entries: HashMap<TabId, String>,
}

impl HostnameCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tab_id: TabId, hostname: String) {
        self.entries.insert(tab_id, hostname);
    }

    pub fn remove(&mut self, tab_id: TabId) {
        self.entries.remove(&tab_id);
    }

    pub fn get(&self, tab_id: TabId) -> Option<&str> {
        self.entries.get(&tab_id).map(String::as_str)
    }

    /// Drops every entry whose tab is not in `open`. Returns how many went.
    pub fn retain_open(&mut self, open: &HashSet<TabId>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|tab_id, _| open.contains(tab_id));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Hostname of `url`; empty for URLs without one such as `about:blank`.
pub fn hostname_of(url: &str) -> Result<String, url::ParseError> {
    let url = Url::parse(url)?;
    Ok(url.host_str().unwrap_or_default().to_string())
}
