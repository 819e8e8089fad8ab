mod tab_list;

pub use tab_list::TabList;

pub type TabId = i32;

/// Read-only view of the browser's open tabs.
pub trait TabClient {
    fn open_tabs(&mut self) -> Vec<TabId>;
}
