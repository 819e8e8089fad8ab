use super::*;
use crate::hid::HidState;
use indoc::indoc;
use serde_json::json;
use std::path::Path;

fn yaml_store(yaml: &str) -> JsonStore {
    JsonStore::from_value(parse_settings(yaml, Path::new("settings.yaml")).unwrap())
}

fn hid(keys: &[u32]) -> HidState {
    HidState {
        keys: keys.iter().copied().collect(),
        ..HidState::default()
    }
}

#[test]
fn test_rule_keys_list_form() {
    let rule: Rule = serde_json::from_value(json!({ "keys": [17, 70], "shift": false })).unwrap();
    assert_eq!(rule.keys.into_iter().collect::<Vec<_>>(), vec![17, 70]);
    assert_eq!(rule.shift, Some(false));
    assert_eq!(rule.ctrl, None);
}

#[test]
fn test_rule_keys_map_form_counts_every_entry() {
    let rule: Rule = serde_json::from_value(json!({
        "keys": { "70": { "key": "f" }, "71": false, "72": null, "73": 1 }
    }))
    .unwrap();
    assert_eq!(rule.keys.into_iter().collect::<Vec<_>>(), vec![70, 71, 72, 73]);

    let rule: Rule = serde_json::from_value(json!({ "keys": { "70": true, "71": false } })).unwrap();
    assert!(!rule.matches(&hid(&[70])));
    assert!(rule.matches(&hid(&[70, 71])));
}

#[test]
fn test_rule_without_modifiers_is_wildcard() {
    let rule = Rule {
        keys: [70].into(),
        ..Rule::default()
    };
    let mut state = hid(&[70]);
    assert!(rule.matches(&state));
    state.ctrl = true;
    state.alt = true;
    state.wheel = -1;
    assert!(rule.matches(&state));
}

#[test]
fn test_rule_requires_exact_key_set() {
    let rule = Rule {
        keys: [70].into(),
        ..Rule::default()
    };
    assert!(!rule.matches(&hid(&[70, 71])));
    assert!(!rule.matches(&hid(&[])));
}

#[test]
fn test_rule_explicit_false_is_a_constraint() {
    let rule = Rule {
        ctrl: Some(false),
        ..Rule::default()
    };
    let mut state = hid(&[]);
    assert!(rule.matches(&state));
    state.ctrl = true;
    assert!(!rule.matches(&state));
}

#[test]
fn test_rule_describe() {
    let rule = Rule {
        keys: [70].into(),
        ctrl: Some(true),
        shift: Some(true),
        alt: Some(false),
        ..Rule::default()
    };
    assert_eq!(rule.describe(), "Ctrl+Shift+F");
    let rule = Rule {
        wheel: Some(-1),
        alt: Some(true),
        ..Rule::default()
    };
    assert_eq!(rule.describe(), "Alt+WheelUp");
    assert_eq!(Rule::default().describe(), "(any)");
}

#[test]
fn test_site_config_entries_keep_file_order() {
    let config = SiteConfig::from_value(&json!({
        "zeta": { "keys": [90] },
        "active": true,
        "alpha": { "keys": [65] },
        "search": true,
    }));
    assert!(config.active);
    let slots: Vec<&str> = config.rules().map(|(slot, _)| slot).collect();
    assert_eq!(slots, vec!["zeta", "alpha"]);
    assert!(config.feature("search"));
    assert!(!config.feature("zeta"));
}

#[test]
fn test_site_config_skips_malformed_entries() {
    let config = SiteConfig::from_value(&json!({
        "active": true,
        "broken": { "keys": "not keys" },
        "label": "hello",
        "custom": [{ "keys": [65], "ctrl": true }, { "keys": [66] }],
    }));
    assert!(matches!(config.entries[0].1, Entry::Other(_)));
    assert!(matches!(config.entries[1].1, Entry::Other(_)));
    let rules: Vec<(&str, &Rule)> = config.rules().collect();
    assert_eq!(rules.len(), 2);
    assert!(rules.iter().all(|(slot, _)| *slot == "custom"));
}

#[test]
fn test_non_object_record_is_inactive() {
    assert_eq!(SiteConfig::from_value(&json!(true)), SiteConfig::new());
}

#[test]
fn test_store_get_and_set() {
    let mut store = JsonStore::new();
    store.set("websites/example.com/active", json!(true));
    store.set("global/search", json!(false));
    assert_eq!(store.get("websites/example.com/active"), Some(&json!(true)));
    assert_eq!(store.get("/global/search/"), Some(&json!(false)));
    assert_eq!(store.get("websites/other.org/active"), None);

    // Writing below a scalar replaces it with an object.
    store.set("global/search/nested", json!(1));
    assert_eq!(store.get("global/search"), Some(&json!({ "nested": 1 })));
}

#[test]
fn test_separated_site_uses_own_record() {
    let store = yaml_store(indoc! {"
        global:
          active: true
          search: true
        websites:
          example.com:
            separated: true
            active: true
            contextmenu: true
    "});
    let config = resolve_site_config(&store, "example.com");
    assert!(config.active);
    assert!(config.feature("contextmenu"));
    assert!(!config.feature("search"));
}

#[test]
fn test_shared_site_uses_global_with_site_active() {
    let store = yaml_store(indoc! {"
        global:
          active: true
          search: true
        websites:
          example.com:
            active: false
            contextmenu: true
    "});
    let config = resolve_site_config(&store, "example.com");
    assert!(!config.active);
    assert!(config.feature("search"));
    assert!(!config.feature("contextmenu"));

    // Sites never switched on stay inactive even when the global record is.
    let config = resolve_site_config(&store, "unknown.org");
    assert!(!config.active);
    assert!(config.feature("search"));
}

#[test]
fn test_shared_site_active_comes_from_site() {
    let store = yaml_store(indoc! {"
        global:
          active: false
          search: true
        websites:
          example.com:
            active: true
    "});
    let config = resolve_site_config(&store, "example.com");
    assert!(config.active);
    assert!(config.feature("search"));
}

#[test]
fn test_rule_list_keeps_valid_siblings() {
    let config = SiteConfig::from_value(&json!({
        "active": true,
        "custom": [{ "keys": [65] }, { "keys": "oops" }, 7, { "keys": [70], "ctrl": true }],
    }));
    let rules: Vec<_> = config.rules().map(|(slot, rule)| (slot, rule.describe())).collect();
    assert_eq!(rules, vec![("custom", "A".to_string()), ("custom", "Ctrl+F".to_string())]);
}

#[test]
fn test_empty_store_resolves_inactive() {
    let config = resolve_site_config(&JsonStore::new(), "example.com");
    assert_eq!(config, SiteConfig::new());
}

#[test]
fn test_toml_settings() {
    let value = parse_settings(
        indoc! {r#"
            [global]
            active = true
            search = true

            [[global.custom]]
            keys = [17, 67]
            shift = false
        "#},
        Path::new("settings.toml"),
    )
    .unwrap();
    let config = resolve_site_config(&JsonStore::from_value(value), "example.com");
    assert_eq!(config.rules().count(), 1);
}

#[test]
fn test_merge_overrides_nested_fields() {
    let mut store = JsonStore::from_value(json!({ "global": { "active": true, "search": true } }));
    store.merge(json!({ "global": { "search": false }, "theme": "dark" }));
    assert_eq!(
        store.root(),
        &json!({ "global": { "active": true, "search": false }, "theme": "dark" })
    );
}

#[test]
fn test_load_settings_reports_missing_file() {
    let err = load_settings(&[PathBuf::from("/nonexistent/settings.yaml")]).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/settings.yaml"));
}
