pub mod rule;
pub mod store;

#[cfg(test)]
mod tests;

use anyhow::Context;
use log::debug;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub use rule::Rule;
pub use store::{JsonStore, SettingsStore};

pub const GLOBAL: &str = "global";
pub const WEBSITES: &str = "websites";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    Switch(bool),
    Rules(#[serde(deserialize_with = "deserialize_rule_list")] Vec<Rule>),
    Rule(Rule),
    Other(Value),
}

/// The settings one page runs with, either its own record or the global one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteConfig {
    pub active: bool,
    pub entries: Vec<(String, Entry)>,
}

impl SiteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a configuration from a settings record. Fields that do not
    /// parse as a switch or a rule are kept as `Entry::Other` and ignored.
    pub fn from_value(record: &Value) -> Self {
        let Some(fields) = record.as_object() else {
            return SiteConfig::new();
        };

        let mut config = SiteConfig {
            active: fields.get("active").and_then(Value::as_bool).unwrap_or(false),
            entries: Vec::with_capacity(fields.len()),
        };
        for (name, value) in fields {
            if name == "active" || name == "separated" {
                continue;
            }
            let entry = Entry::deserialize(value).unwrap_or_else(|_| Entry::Other(value.clone()));
            config.entries.push((name.clone(), entry));
        }
        config
    }

    pub fn feature(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|(slot, entry)| slot == name && matches!(entry, Entry::Switch(true)))
    }

    /// Rules in configuration order, paired with the slot they came from.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.entries.iter().flat_map(|(slot, entry)| {
            let rules: &[Rule] = match entry {
                Entry::Rule(rule) => std::slice::from_ref(rule),
                Entry::Rules(rules) => rules,
                Entry::Switch(_) | Entry::Other(_) => &[],
            };
            rules.iter().map(move |rule| (slot.as_str(), rule))
        })
    }
}

// One bad element must not take its valid siblings down with it.
fn deserialize_rule_list<'de, D>(deserializer: D) -> Result<Vec<Rule>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Vec::<Value>::deserialize(deserializer)?;
    let total = items.len();
    let rules: Vec<Rule> = items.into_iter().filter_map(|item| Rule::deserialize(item).ok()).collect();
    if rules.len() < total {
        debug!("Skipped {} malformed rules", total - rules.len());
    }
    Ok(rules)
}

pub fn site_path(hostname: &str, field: &str) -> String {
    format!("{WEBSITES}/{hostname}/{field}")
}

pub fn is_separated(store: &dyn SettingsStore, hostname: &str) -> bool {
    store
        .get(&site_path(hostname, "separated"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Picks the record a page on `hostname` runs with. Separated sites use
/// their own record; others use the global one. Either way a site is only
/// active when its own `active` flag is set.
pub fn resolve_site_config(store: &dyn SettingsStore, hostname: &str) -> SiteConfig {
    if is_separated(store, hostname) {
        let record = store.get(&format!("{WEBSITES}/{hostname}"));
        return record.map(SiteConfig::from_value).unwrap_or_default();
    }

    let mut config = store.get(GLOBAL).map(SiteConfig::from_value).unwrap_or_default();
    config.active = store
        .get(&site_path(hostname, "active"))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    config
}

enum ConfigFiletype {
    Yaml,
    Toml,
    Json,
}

fn get_file_ext(filename: &Path) -> ConfigFiletype {
    match filename.extension() {
        Some(f) => {
            let ext = f.to_str().unwrap_or("").to_lowercase();
            if ext == "toml" {
                ConfigFiletype::Toml
            } else if ext == "json" {
                ConfigFiletype::Json
            } else {
                ConfigFiletype::Yaml
            }
        }
        _ => ConfigFiletype::Yaml,
    }
}

pub fn parse_settings(contents: &str, filename: &Path) -> anyhow::Result<Value> {
    let value = match get_file_ext(filename) {
        ConfigFiletype::Yaml => serde_yaml::from_str(contents)?,
        ConfigFiletype::Toml => toml::from_str(contents)?,
        ConfigFiletype::Json => serde_json::from_str(contents)?,
    };
    Ok(value)
}

/// Loads settings files in order; later files override earlier ones.
pub fn load_settings(filenames: &[PathBuf]) -> anyhow::Result<JsonStore> {
    let mut store = JsonStore::new();
    for filename in filenames {
        let contents = fs::read_to_string(filename)
            .with_context(|| format!("failed to read settings file {}", filename.display()))?;
        let value = parse_settings(&contents, filename)
            .with_context(|| format!("failed to parse settings file {}", filename.display()))?;
        debug!("Loaded settings from {}", filename.display());
        store.merge(value);
    }
    Ok(store)
}
