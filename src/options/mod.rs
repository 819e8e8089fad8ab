//! Options page layout, described as a tree of plain components for the
//! page's declarative renderer.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::config::{is_separated, resolve_site_config, site_path, SettingsStore, GLOBAL};

const CLIPBOARD_ICON: &str = "M19 3h-4.18C14.4 1.84 13.3 1 12 1s-2.4.84-2.82 2H5v18h14Z";

/// Feature switches on the main card after the clipboard button, in display
/// order: (storage key, label, icon path).
const SWITCHES: [(&str, &str, &str); 4] = [
    ("contextmenu", "contextMenu", "M2.38 20.57V3.07h9.5v4h9.74v13.5Z"),
    ("select", "select", "M3 5q0-.825.587-1.413Q4.175 3 5 3v2Z"),
    ("drag_and_drop", "dragAndDrop", "M17.8 22.8q1.88-.23 3.3-1.63 1.43-1.4 1.7-3.37"),
    ("search", "search", "m19.55 20.57-6.3-6.27q-.75.62-1.73.97"),
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Component {
    pub component: String,
    pub variant: Option<String>,
    pub text: Option<String>,
    pub storage: Option<String>,
    pub attr: BTreeMap<String, String>,
    pub on: BTreeMap<String, String>,
    pub children: Vec<(String, Component)>,
}

impl Component {
    pub fn new(component: &str) -> Self {
        Component {
            component: component.to_string(),
            ..Component::default()
        }
    }

    pub fn variant(mut self, variant: &str) -> Self {
        self.variant = Some(variant.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn storage(mut self, path: String) -> Self {
        self.storage = Some(path);
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attr.insert(name.to_string(), value.to_string());
        self
    }

    pub fn on(mut self, event: &str, handler: &str) -> Self {
        self.on.insert(event.to_string(), handler.to_string());
        self
    }

    pub fn child(mut self, name: &str, child: Component) -> Self {
        self.children.push((name.to_string(), child));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Component> {
        self.children.iter().find(|(slot, _)| slot == name).map(|(_, child)| child)
    }

    /// Follows a slash-separated chain of child names.
    pub fn find(&self, path: &str) -> Option<&Component> {
        path.split('/').try_fold(self, |node, name| node.get(name))
    }
}

// Children are flattened next to the reserved keys, as the renderer expects.
impl Serialize for Component {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("component", &self.component)?;
        if let Some(variant) = &self.variant {
            map.serialize_entry("variant", variant)?;
        }
        if let Some(text) = &self.text {
            map.serialize_entry("text", text)?;
        }
        if let Some(storage) = &self.storage {
            map.serialize_entry("storage", storage)?;
        }
        if !self.attr.is_empty() {
            map.serialize_entry("attr", &self.attr)?;
        }
        if !self.on.is_empty() {
            map.serialize_entry("on", &self.on)?;
        }
        for (name, child) in &self.children {
            map.serialize_entry(name, child)?;
        }
        map.end()
    }
}

/// What the options page knows when it renders.
#[derive(Debug, Clone)]
pub struct SkeletonContext {
    pub hostname: String,
    pub separated: bool,
    pub theme: String,
    pub is_tab: bool,
    // Labels of the custom rules currently configured
    pub custom_rules: Vec<String>,
}

impl SkeletonContext {
    pub fn from_store(store: &dyn SettingsStore, hostname: &str, is_tab: bool) -> Self {
        let custom_rules = resolve_site_config(store, hostname)
            .rules()
            .filter(|(slot, _)| *slot == "custom")
            .map(|(_, rule)| rule.describe())
            .collect();
        SkeletonContext {
            hostname: hostname.to_string(),
            separated: is_separated(store, hostname),
            theme: store
                .get("theme")
                .and_then(Value::as_str)
                .unwrap_or("light")
                .to_string(),
            is_tab,
            custom_rules,
        }
    }

    /// Where a switch stores its value for this site.
    pub fn storage_path(&self, key: &str) -> String {
        if self.separated {
            site_path(&self.hostname, key)
        } else {
            format!("{GLOBAL}/{key}")
        }
    }
}

pub fn build_skeleton(ctx: &SkeletonContext) -> Component {
    let mut base = Component::new("base").attr("theme", &ctx.theme);
    if ctx.is_tab {
        base = base.attr("tab", "true");
    }
    base.child("header", header(ctx)).child("main", main_section(ctx))
}

fn header(ctx: &SkeletonContext) -> Component {
    Component::new("header")
        .child(
            "sectionStart",
            Component::new("section")
                .variant("align-start")
                .child("back", back_button())
                .child("title", Component::new("span").variant("title").text(&ctx.hostname)),
        )
        .child(
            "sectionEnd",
            Component::new("section").variant("align-end").child("menu", menu_button(ctx)),
        )
}

fn back_button() -> Component {
    Component::new("button")
        .variant("icon")
        .attr("hidden", "true")
        .on("click", "main.layers.back")
        .child(
            "svg",
            icon("M14 18l-6-6 6-6")
                .attr("stroke-width", "1.5")
                .attr("stroke", "currentColor")
                .attr("fill", "none"),
        )
}

fn menu_button(ctx: &SkeletonContext) -> Component {
    Component::new("button")
        .variant("icon")
        .on("click", "modal")
        .child("svg", icon("M12 5v.01M12 12v.01M12 19v.01").attr("stroke", "currentColor"))
        .child(
            "modal",
            Component::new("modal")
                .child(
                    "separated",
                    Component::new("switch")
                        .text("separateSettings")
                        .storage(site_path(&ctx.hostname, "separated")),
                )
                .child(
                    "theme",
                    Component::new("select").text("theme").storage("theme".to_string()),
                ),
        )
}

fn main_section(ctx: &SkeletonContext) -> Component {
    let mut section = Component::new("section")
        .variant("card")
        .child("clipboard", clipboard_button(ctx));
    for (key, text, icon_path) in SWITCHES {
        section = section.child(key, switch(ctx, key, text, icon_path));
    }
    section = section.child("custom", custom_button(ctx));

    Component::new("main").child(
        "layers",
        Component::new("layers")
            .on("open", "header.title.update")
            .child("toolbar", Component::new("toolbar"))
            .child("section", section),
    )
}

fn switch(ctx: &SkeletonContext, key: &str, text: &str, icon_path: &str) -> Component {
    Component::new("switch")
        .child("before", icon(icon_path).attr("fill", "var(--satus-primary)"))
        .text(text)
        .storage(ctx.storage_path(key))
}

// Clipboard opens its own layer; the switch inside stores the same `clipboard` flag.
fn clipboard_button(ctx: &SkeletonContext) -> Component {
    Component::new("button")
        .child("before", icon(CLIPBOARD_ICON).attr("fill", "var(--satus-primary)"))
        .text("clipboard")
        .on("click", "main.layers.open")
        .child(
            "layer",
            Component::new("section")
                .variant("card")
                .child("clipboard", switch(ctx, "clipboard", "allowClipboard", CLIPBOARD_ICON)),
        )
}

fn custom_button(ctx: &SkeletonContext) -> Component {
    let mut rules = Component::new("section").variant("card");
    if ctx.custom_rules.is_empty() {
        rules = rules.child("empty", Component::new("span").text("noCustomShortcuts"));
    }
    for (index, label) in ctx.custom_rules.iter().enumerate() {
        rules = rules.child(&format!("rule{index}"), Component::new("span").text(label));
    }

    Component::new("button")
        .text("customShortcuts")
        .storage(ctx.storage_path("custom"))
        .on("click", "main.layers.open")
        .child("layer", rules)
}

fn icon(path: &str) -> Component {
    Component::new("svg")
        .attr("viewBox", "0 0 24 24")
        .child("path", Component::new("path").attr("d", path))
}
