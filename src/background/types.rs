use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::client::TabId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Message {
    TabConnected,
    OptionsPageConnected,
}

/// Who sent a message: the tab it came from (absent for standalone
/// extension pages) and the URL of the sending document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSender {
    pub tab_id: Option<TabId>,
    pub url: String,
}

impl MessageSender {
    pub fn tab(tab_id: TabId, url: &str) -> Self {
        MessageSender {
            tab_id: Some(tab_id),
            url: url.to_string(),
        }
    }

    pub fn extension_page(url: &str) -> Self {
        MessageSender {
            tab_id: None,
            url: url.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Hostname(String),
    OptionsPage {
        #[serde(rename = "isTab")]
        is_tab: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorError {
    Disconnected,
    NotATab,
    InvalidUrl(String),
}

impl std::fmt::Display for CoordinatorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinatorError::Disconnected => write!(f, "background coordinator is not running"),
            CoordinatorError::NotATab => write!(f, "message sender is not a tab"),
            CoordinatorError::InvalidUrl(url) => write!(f, "invalid sender URL: {url}"),
        }
    }
}

impl std::error::Error for CoordinatorError {}

pub(crate) enum Command {
    Message {
        message: Message,
        sender: MessageSender,
        respond_to: oneshot::Sender<Result<Response, CoordinatorError>>,
    },
    TabRemoved(TabId),
    Lookup {
        tab_id: TabId,
        respond_to: oneshot::Sender<Option<String>>,
    },
    Sweep {
        respond_to: oneshot::Sender<usize>,
    },
    Shutdown,
}
