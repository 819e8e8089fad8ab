use super::*;
use crate::client::TabList;
use std::collections::HashSet;
use std::time::Duration;

fn start(tabs: &TabList) -> CoordinatorHandle {
    let (handle, _task) = Coordinator::new(tabs.clone()).start();
    handle
}

async fn connect(handle: &CoordinatorHandle, tab_id: i32, url: &str) -> Response {
    handle
        .send(Message::TabConnected, MessageSender::tab(tab_id, url))
        .await
        .expect("tab-connected")
}

#[test]
fn hostname_of_strips_everything_but_host() {
    assert_eq!(hostname_of("https://example.com/x?y#z").unwrap(), "example.com");
    assert_eq!(hostname_of("http://user:pw@sub.example.org:8080/").unwrap(), "sub.example.org");
    assert_eq!(hostname_of("about:blank").unwrap(), "");
    assert!(hostname_of("not a url").is_err());
}

#[test]
fn cache_retain_open_evicts_closed_tabs() {
    let mut cache = HostnameCache::new();
    cache.insert(1, "a.com".to_string());
    cache.insert(2, "b.com".to_string());
    cache.insert(3, "c.com".to_string());
    cache.remove(42);

    let removed = cache.retain_open(&HashSet::from([2]));
    assert_eq!(removed, 2);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(2), Some("b.com"));
    assert_eq!(cache.get(1), None);
}

#[test]
fn wire_forms() {
    let message: Message = serde_json::from_str(r#""tab-connected""#).unwrap();
    assert_eq!(message, Message::TabConnected);
    assert_eq!(
        serde_json::to_string(&Response::OptionsPage { is_tab: false }).unwrap(),
        r#"{"isTab":false}"#
    );
    assert_eq!(
        serde_json::to_string(&Response::Hostname("example.com".to_string())).unwrap(),
        r#""example.com""#
    );
}

#[tokio::test]
async fn tab_connected_resolves_and_caches_hostname() {
    let tabs = TabList::with_tabs([5]);
    let handle = start(&tabs);

    let response = connect(&handle, 5, "https://example.com/x").await;
    assert_eq!(response, Response::Hostname("example.com".to_string()));
    assert_eq!(handle.lookup(5).await.unwrap().as_deref(), Some("example.com"));

    handle.tab_removed(5).await.unwrap();
    assert_eq!(handle.lookup(5).await.unwrap(), None);

    // Removing an unknown tab is a no-op.
    handle.tab_removed(99).await.unwrap();
    assert_eq!(handle.lookup(99).await.unwrap(), None);
}

#[tokio::test]
async fn tab_connected_errors() {
    let handle = start(&TabList::new());

    let err = handle
        .send(Message::TabConnected, MessageSender::extension_page("chrome-extension://abc/options.html"))
        .await
        .unwrap_err();
    assert_eq!(err, CoordinatorError::NotATab);

    let err = handle
        .send(Message::TabConnected, MessageSender::tab(1, "::"))
        .await
        .unwrap_err();
    assert_eq!(err, CoordinatorError::InvalidUrl("::".to_string()));
}

#[tokio::test]
async fn options_page_reports_whether_it_is_a_tab() {
    let handle = start(&TabList::new());

    let response = handle
        .send(Message::OptionsPageConnected, MessageSender::tab(3, "chrome-extension://abc/options.html"))
        .await
        .unwrap();
    assert_eq!(response, Response::OptionsPage { is_tab: true });

    let response = handle
        .send(Message::OptionsPageConnected, MessageSender::extension_page("chrome-extension://abc/popup.html"))
        .await
        .unwrap();
    assert_eq!(response, Response::OptionsPage { is_tab: false });
}

#[tokio::test]
async fn sweep_drops_tabs_closed_without_notification() {
    let tabs = TabList::with_tabs([5, 6]);
    let handle = start(&tabs);

    connect(&handle, 5, "https://example.com/x").await;
    connect(&handle, 6, "https://other.org/").await;
    tabs.close(5);
    tabs.open(7);
    connect(&handle, 7, "https://third.net/").await;

    assert_eq!(handle.sweep().await.unwrap(), 1);
    assert_eq!(handle.lookup(5).await.unwrap(), None);
    assert_eq!(handle.lookup(6).await.unwrap().as_deref(), Some("other.org"));
    assert_eq!(handle.lookup(7).await.unwrap().as_deref(), Some("third.net"));
}

#[tokio::test(start_paused = true)]
async fn periodic_sweep_runs_on_timer() {
    let tabs = TabList::with_tabs([5]);
    let (handle, _task) = Coordinator::new(tabs.clone())
        .with_sweep_interval(Duration::from_secs(60))
        .start();

    connect(&handle, 5, "https://example.com/x").await;
    tabs.close(5);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(handle.lookup(5).await.unwrap().as_deref(), Some("example.com"));

    tokio::time::sleep(Duration::from_secs(31)).await;
    assert_eq!(handle.lookup(5).await.unwrap(), None);
}

#[tokio::test]
async fn shutdown_disconnects_handles() {
    let (handle, task) = Coordinator::new(TabList::new()).start();
    handle.shutdown().await.unwrap();
    task.await.unwrap();

    assert_eq!(handle.lookup(1).await.unwrap_err(), CoordinatorError::Disconnected);
}

#[tokio::test]
async fn fresh_coordinator_starts_empty() {
    let tabs = TabList::with_tabs([5]);
    let first = start(&tabs);
    connect(&first, 5, "https://example.com/").await;
    first.shutdown().await.unwrap();

    let second = start(&tabs);
    assert_eq!(second.lookup(5).await.unwrap(), None);
}
