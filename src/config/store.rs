use serde_json::{Map, Value};

/// Keyed access to the extension settings, addressed by slash-separated
/// paths such as `websites/example.com/active` or `global/search`.
pub trait SettingsStore {
    fn get(&self, path: &str) -> Option<&Value>;
    fn set(&mut self, path: &str, value: Value);
}

#[derive(Debug, Clone, PartialEq)]
pub struct JsonStore {
    root: Value,
}

impl JsonStore {
    pub fn new() -> Self {
        JsonStore {
            root: Value::Object(Map::new()),
        }
    }

    pub fn from_value(root: Value) -> Self {
        JsonStore { root }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Overlays `other` on top of this store. Objects merge key by key,
    /// anything else is replaced.
    pub fn merge(&mut self, other: Value) {
        merge_value(&mut self.root, other);
    }
}

impl Default for JsonStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore for JsonStore {
    fn get(&self, path: &str) -> Option<&Value> {
        segments(path).try_fold(&self.root, |node, segment| node.get(segment))
    }

    fn set(&mut self, path: &str, value: Value) {
        let mut node = &mut self.root;
        for segment in segments(path) {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            node = match node {
                Value::Object(map) => map.entry(segment.to_string()).or_insert(Value::Null),
                _ => return,
            };
        }
        *node = value;
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

fn merge_value(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_value(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
