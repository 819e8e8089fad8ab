use tokio::sync::{mpsc, oneshot};

use crate::client::TabId;

use super::types::{Command, CoordinatorError, Message, MessageSender, Response};

#[derive(Clone, Debug)]
pub struct CoordinatorHandle {
    sender: mpsc::Sender<Command>,
}

impl CoordinatorHandle {
    pub(crate) fn new(sender: mpsc::Sender<Command>) -> Self {
        Self { sender }
    }

    pub async fn send(&self, message: Message, sender: MessageSender) -> Result<Response, CoordinatorError> {
        let (respond_to, receiver) = oneshot::channel();
        self.command(Command::Message {
            message,
            sender,
            respond_to,
        })
        .await?;

        receiver.await.map_err(|_| CoordinatorError::Disconnected)?
    }

    pub async fn tab_removed(&self, tab_id: TabId) -> Result<(), CoordinatorError> {
        self.command(Command::TabRemoved(tab_id)).await
    }

    pub async fn lookup(&self, tab_id: TabId) -> Result<Option<String>, CoordinatorError> {
        let (respond_to, receiver) = oneshot::channel();
        self.command(Command::Lookup { tab_id, respond_to }).await?;

        receiver.await.map_err(|_| CoordinatorError::Disconnected)
    }

    /// Reconciles the cache against the open tabs now instead of waiting for the timer.
    pub async fn sweep(&self) -> Result<usize, CoordinatorError> {
        let (respond_to, receiver) = oneshot::channel();
        self.command(Command::Sweep { respond_to }).await?;

        receiver.await.map_err(|_| CoordinatorError::Disconnected)
    }

    pub async fn shutdown(&self) -> Result<(), CoordinatorError> {
        self.command(Command::Shutdown).await
    }

    async fn command(&self, command: Command) -> Result<(), CoordinatorError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| CoordinatorError::Disconnected)
    }
}
