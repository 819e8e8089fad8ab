use anyhow::{bail, Context};
use log::info;

use crate::background::{CoordinatorHandle, Message, MessageSender, Response};
use crate::config::{is_separated, resolve_site_config, SettingsStore};
use crate::event_handler::EventHandler;

/// Content-script startup: learn the page's hostname from the background
/// coordinator, then build the engine from the settings that apply to it.
pub async fn attach(
    coordinator: &CoordinatorHandle,
    sender: MessageSender,
    store: &dyn SettingsStore,
) -> anyhow::Result<EventHandler> {
    let url = sender.url.clone();
    let response = coordinator
        .send(Message::TabConnected, sender)
        .await
        .with_context(|| format!("tab-connected failed for {url}"))?;
    let hostname = match response {
        Response::Hostname(hostname) => hostname,
        other => bail!("unexpected tab-connected response: {other:?}"),
    };

    let site = resolve_site_config(store, &hostname);
    info!(
        "Attached to {hostname} (separated: {}, active: {})",
        is_separated(store, &hostname),
        site.active
    );
    Ok(EventHandler::new(site))
}
