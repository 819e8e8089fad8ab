// Exports which are used by the CLI and integration test cases.
pub mod action;
pub mod background;
pub mod client;
pub mod config;
pub mod event;
pub mod event_handler;
pub mod hid;
pub mod options;
pub mod page;

pub use config::SiteConfig;
pub use event_handler::EventHandler;
