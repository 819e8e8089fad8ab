use std::collections::HashSet;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::client::TabClient;

use super::handle::CoordinatorHandle;
use super::types::{Command, CoordinatorError, Message, MessageSender, Response};
use super::{hostname_of, HostnameCache};

pub const SWEEP_INTERVAL: Duration = Duration::from_secs(30 * 60);
const COMMAND_BUFFER: usize = 64;

/// Background side of the extension. Owns the hostname cache; everything
/// else talks to it through a `CoordinatorHandle`.
pub struct Coordinator<C: TabClient> {
    cache: HostnameCache,
    tabs: C,
    sweep_interval: Duration,
}

impl<C: TabClient + Send + 'static> Coordinator<C> {
    pub fn new(tabs: C) -> Self {
        Coordinator {
            cache: HostnameCache::new(),
            tabs,
            sweep_interval: SWEEP_INTERVAL,
        }
    }

    pub fn with_sweep_interval(mut self, sweep_interval: Duration) -> Self {
        self.sweep_interval = sweep_interval;
        self
    }

    /// Spawns the coordinator on the current tokio runtime.
    pub fn start(self) -> (CoordinatorHandle, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(COMMAND_BUFFER);
        let task = tokio::spawn(self.run(receiver));
        (CoordinatorHandle::new(sender), task)
    }

    // One command or sweep at a time, each run to completion.
    pub(crate) async fn run(mut self, mut receiver: mpsc::Receiver<Command>) {
        info!("Background coordinator started (sweep every {:?})", self.sweep_interval);
        let mut sweep = interval_at(Instant::now() + self.sweep_interval, self.sweep_interval);
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                command = receiver.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.on_command(command),
                },
                _ = sweep.tick() => {
                    self.sweep();
                }
            }
        }
        info!("Background coordinator stopped");
    }

    fn on_command(&mut self, command: Command) {
        match command {
            Command::Message {
                message,
                sender,
                respond_to,
            } => {
                let response = self.on_message(message, &sender);
                if respond_to.send(response).is_err() {
                    warn!("{message:?} response dropped (receiver gone)");
                }
            }
            Command::TabRemoved(tab_id) => {
                debug!("Tab {tab_id} removed");
                self.cache.remove(tab_id);
            }
            Command::Lookup { tab_id, respond_to } => {
                let hostname = self.cache.get(tab_id).map(str::to_string);
                if respond_to.send(hostname).is_err() {
                    warn!("Lookup response dropped (receiver gone)");
                }
            }
            Command::Sweep { respond_to } => {
                let removed = self.sweep();
                if respond_to.send(removed).is_err() {
                    warn!("Sweep response dropped (receiver gone)");
                }
            }
            Command::Shutdown => {}
        }
    }

    fn on_message(&mut self, message: Message, sender: &MessageSender) -> Result<Response, CoordinatorError> {
        match message {
            Message::TabConnected => {
                let tab_id = sender.tab_id.ok_or(CoordinatorError::NotATab)?;
                let hostname =
                    hostname_of(&sender.url).map_err(|_| CoordinatorError::InvalidUrl(sender.url.clone()))?;
                debug!("Tab {tab_id} connected: {hostname}");
                self.cache.insert(tab_id, hostname.clone());
                Ok(Response::Hostname(hostname))
            }
            Message::OptionsPageConnected => Ok(Response::OptionsPage {
                is_tab: sender.tab_id.is_some(),
            }),
        }
    }

    fn sweep(&mut self) -> usize {
        let open: HashSet<_> = self.tabs.open_tabs().into_iter().collect();
        let removed = self.cache.retain_open(&open);
        info!("Hostname cache sweep: {removed} stale, {} kept", self.cache.len());
        removed
    }
}
