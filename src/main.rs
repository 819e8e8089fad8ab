use anyhow::{bail, Context};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use input_unlock::background::{hostname_of, Coordinator, Message, MessageSender, Response};
use input_unlock::client::{TabId, TabList};
use input_unlock::config::{
    is_separated, load_settings, resolve_site_config, JsonStore, SettingsStore, SiteConfig, GLOBAL, WEBSITES,
};
use input_unlock::event::{DomEvent, Event};
use input_unlock::options::{build_skeleton, SkeletonContext};
use input_unlock::page;
use log::debug;
use std::io::{self, Read};
use std::path::PathBuf;

// The single tab the simulated browser has open
const TAB: TabId = 1;
const OPTIONS_URL: &str = "chrome-extension://input-unlock/options.html";

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Generate shell completions
    ///
    /// You can use them by storing in your shells completion file or by running
    /// - in bash: eval "$(input-unlock --completions bash)"
    /// - in fish: input-unlock --completions fish | source
    #[arg(long, value_enum, display_order = 100, value_name = "SHELL", verbatim_doc_comment)]
    completions: Option<Shell>,
    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Load settings files and show what each site resolves to
    Check {
        #[arg(required = true)]
        settings: Vec<PathBuf>,
    },
    /// Run recorded DOM events through the engine for one page
    Simulate {
        #[arg(long, required = true, num_args = 1..)]
        settings: Vec<PathBuf>,
        /// URL of the simulated page
        #[arg(long)]
        url: String,
        /// JSON array or JSON lines of DOM events; stdin when omitted
        events: Option<PathBuf>,
    },
    /// Print the options page component tree as JSON
    Skeleton {
        #[arg(long, required = true, num_args = 1..)]
        settings: Vec<PathBuf>,
        /// URL of the page the options are for
        #[arg(long)]
        url: String,
        /// Options page opened in its own tab rather than as a popup
        #[arg(long)]
        tab: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "input-unlock", &mut io::stdout());
        return Ok(());
    }

    let Some(command) = args.command else {
        Args::command().print_help()?;
        return Ok(());
    };

    match command {
        Cmd::Check { settings } => check(&load_settings(&settings)?),
        Cmd::Simulate { settings, url, events } => {
            let store = load_settings(&settings)?;
            let events = read_events(events)?;
            runtime()?.block_on(simulate(&store, &url, events))
        }
        Cmd::Skeleton { settings, url, tab } => {
            let store = load_settings(&settings)?;
            runtime()?.block_on(skeleton(&store, &url, tab))
        }
    }
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start runtime")
}

fn check(store: &JsonStore) -> anyhow::Result<()> {
    let global = store.get(GLOBAL).map(SiteConfig::from_value).unwrap_or_default();
    println!(
        "global: active={} rules={} switches=[{}]",
        global.active,
        global.rules().count(),
        enabled_switches(&global).join(", ")
    );

    let hostnames: Vec<&String> = match store.get(WEBSITES) {
        Some(serde_json::Value::Object(sites)) => sites.keys().collect(),
        Some(_) => bail!("`{WEBSITES}` must be a mapping of hostnames"),
        None => Vec::new(),
    };
    for hostname in hostnames {
        let site = resolve_site_config(store, hostname);
        println!(
            "{hostname}: separated={} active={} rules={} switches=[{}]",
            is_separated(store, hostname),
            site.active,
            site.rules().count(),
            enabled_switches(&site).join(", ")
        );
    }
    Ok(())
}

fn enabled_switches(site: &SiteConfig) -> Vec<&str> {
    site.entries
        .iter()
        .filter(|(name, _)| site.feature(name))
        .map(|(name, _)| name.as_str())
        .collect()
}

fn read_events(path: Option<PathBuf>) -> anyhow::Result<Vec<Event>> {
    let contents = match &path {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut contents = String::new();
            io::stdin().read_to_string(&mut contents)?;
            contents
        }
    };

    let dom_events: Vec<DomEvent> = if contents.trim_start().starts_with('[') {
        serde_json::from_str(&contents)?
    } else {
        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(serde_json::from_str::<DomEvent>)
            .collect::<Result<_, _>>()?
    };
    debug!("Read {} events", dom_events.len());

    let events = dom_events
        .into_iter()
        .map(Event::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(events)
}

async fn simulate(store: &JsonStore, url: &str, events: Vec<Event>) -> anyhow::Result<()> {
    let (coordinator, task) = Coordinator::new(TabList::with_tabs([TAB])).start();
    let mut handler = page::attach(&coordinator, MessageSender::tab(TAB, url), store).await?;

    for event in &events {
        let actions = handler.on_event(event);
        if actions.is_empty() {
            println!("{event:?}: pass");
        }
        for action in actions {
            println!("{event:?}: {action}");
        }
    }

    coordinator.shutdown().await?;
    task.await?;
    Ok(())
}

async fn skeleton(store: &JsonStore, url: &str, tab: bool) -> anyhow::Result<()> {
    let hostname = hostname_of(url).with_context(|| format!("invalid URL {url}"))?;
    let (coordinator, task) = Coordinator::new(TabList::with_tabs([TAB])).start();

    let sender = if tab {
        MessageSender::tab(TAB, OPTIONS_URL)
    } else {
        MessageSender::extension_page(OPTIONS_URL)
    };
    let is_tab = match coordinator.send(Message::OptionsPageConnected, sender).await? {
        Response::OptionsPage { is_tab } => is_tab,
        other => bail!("unexpected options-page-connected response: {other:?}"),
    };

    let ctx = SkeletonContext::from_store(store, &hostname, is_tab);
    println!("{}", serde_json::to_string_pretty(&build_skeleton(&ctx))?);

    coordinator.shutdown().await?;
    task.await?;
    Ok(())
}
