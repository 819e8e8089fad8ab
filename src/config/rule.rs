use crate::hid::HidState;
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeSet;

/// A key/modifier combination that, when held, stops the page from seeing the event.
///
/// Every `None` field is a wildcard. `Some(false)` is a real constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Rule {
    #[serde(default, deserialize_with = "deserialize_keys")]
    pub keys: BTreeSet<u32>,
    #[serde(default)]
    pub shift: Option<bool>,
    #[serde(default)]
    pub ctrl: Option<bool>,
    #[serde(default)]
    pub alt: Option<bool>,
    #[serde(default)]
    pub click: Option<bool>,
    #[serde(default)]
    pub context: Option<bool>,
    #[serde(default)]
    pub wheel: Option<i32>,
}

impl Rule {
    pub fn matches(&self, hid: &HidState) -> bool {
        self.keys == hid.keys
            && field_matches(self.shift, hid.shift)
            && field_matches(self.ctrl, hid.ctrl)
            && field_matches(self.alt, hid.alt)
            && field_matches(self.click, hid.click)
            && field_matches(self.context, hid.context)
            && field_matches(self.wheel, hid.wheel)
    }

    /// Label shown in the options page, e.g. `Ctrl+Shift+F`.
    pub fn describe(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if self.ctrl == Some(true) {
            parts.push("Ctrl".to_string());
        }
        if self.alt == Some(true) {
            parts.push("Alt".to_string());
        }
        if self.shift == Some(true) {
            parts.push("Shift".to_string());
        }
        parts.extend(self.keys.iter().map(|code| key_label(*code)));
        match self.wheel {
            Some(w) if w > 0 => parts.push("WheelDown".to_string()),
            Some(w) if w < 0 => parts.push("WheelUp".to_string()),
            _ => {}
        }
        if self.click == Some(true) {
            parts.push("Click".to_string());
        }
        if self.context == Some(true) {
            parts.push("ContextMenu".to_string());
        }
        if parts.is_empty() {
            "(any)".to_string()
        } else {
            parts.join("+")
        }
    }
}

fn field_matches<T: PartialEq>(expected: Option<T>, actual: T) -> bool {
    match expected {
        Some(expected) => expected == actual,
        None => true,
    }
}

fn key_label(code: u32) -> String {
    match code {
        8 => "Backspace".to_string(),
        9 => "Tab".to_string(),
        13 => "Enter".to_string(),
        27 => "Esc".to_string(),
        32 => "Space".to_string(),
        37 => "Left".to_string(),
        38 => "Up".to_string(),
        39 => "Right".to_string(),
        40 => "Down".to_string(),
        46 => "Delete".to_string(),
        48..=57 | 65..=90 => char::from_u32(code).map(String::from).unwrap_or_default(),
        112..=123 => format!("F{}", code - 111),
        _ => format!("#{code}"),
    }
}

// The settings page stores keys as `{"70": {...}}`; hand-written files tend to use `[70]`.
fn deserialize_keys<'de, D>(deserializer: D) -> Result<BTreeSet<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(BTreeSet::new()),
        Value::Array(codes) => codes
            .iter()
            .map(|code| {
                code.as_u64()
                    .and_then(|code| u32::try_from(code).ok())
                    .ok_or_else(|| de::Error::custom(format!("invalid key code: {code}")))
            })
            .collect(),
        Value::Object(map) => map
            .keys()
            .map(|code| code.parse::<u32>().map_err(de::Error::custom))
            .collect(),
        other => Err(de::Error::custom(format!("invalid keys: {other}"))),
    }
}
