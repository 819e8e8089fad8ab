use serde::Deserialize;
use std::fmt;

// Input to EventHandler
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    KeyEvent(KeyEvent),
    PointerEvent(PointerEvent),
    // Page-level actions the site may try to cancel (copy, selectstart, ...)
    PageEvent(PageEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyValue {
    Down,
    Press,
    Up,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    // Physical key, e.g. "ControlLeft"
    code: String,
    // Legacy DOM keyCode, e.g. 70 for 'F'
    key_code: u32,
    value: KeyValue,
}

impl KeyEvent {
    pub fn new(code: &str, key_code: u32, value: KeyValue) -> KeyEvent {
        KeyEvent {
            code: code.to_string(),
            key_code,
            value,
        }
    }

    pub fn down(code: &str, key_code: u32) -> KeyEvent {
        KeyEvent::new(code, key_code, KeyValue::Down)
    }

    pub fn up(code: &str, key_code: u32) -> KeyEvent {
        KeyEvent::new(code, key_code, KeyValue::Up)
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn key_code(&self) -> u32 {
        self.key_code
    }

    pub fn value(&self) -> KeyValue {
        self.value
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Wheel { delta: f64 },
    MouseDown,
    MouseUp,
    TouchStart,
    TouchEnd,
    ContextMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    SelectStart,
    DragStart,
    Drop,
    Copy,
    Cut,
    Paste,
}

impl PageEvent {
    /// Settings switch that allows this event through.
    pub fn feature(&self) -> &'static str {
        match self {
            PageEvent::SelectStart => "select",
            PageEvent::DragStart | PageEvent::Drop => "drag_and_drop",
            PageEvent::Copy | PageEvent::Cut | PageEvent::Paste => "clipboard",
        }
    }
}

/// An event as the content script serializes it off the DOM.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub key_code: u32,
    #[serde(default)]
    pub delta_y: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEventType(pub String);

impl fmt::Display for UnknownEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown DOM event type: {}", self.0)
    }
}

impl std::error::Error for UnknownEventType {}

impl TryFrom<DomEvent> for Event {
    type Error = UnknownEventType;

    fn try_from(event: DomEvent) -> Result<Self, Self::Error> {
        let key = |value| Event::KeyEvent(KeyEvent::new(&event.code, event.key_code, value));
        let parsed = match event.kind.as_str() {
            "keydown" => key(KeyValue::Down),
            "keypress" => key(KeyValue::Press),
            "keyup" => key(KeyValue::Up),
            "wheel" => Event::PointerEvent(PointerEvent::Wheel { delta: event.delta_y }),
            "mousedown" => Event::PointerEvent(PointerEvent::MouseDown),
            "mouseup" => Event::PointerEvent(PointerEvent::MouseUp),
            "touchstart" => Event::PointerEvent(PointerEvent::TouchStart),
            "touchend" => Event::PointerEvent(PointerEvent::TouchEnd),
            "contextmenu" => Event::PointerEvent(PointerEvent::ContextMenu),
            "selectstart" => Event::PageEvent(PageEvent::SelectStart),
            "dragstart" => Event::PageEvent(PageEvent::DragStart),
            "drop" => Event::PageEvent(PageEvent::Drop),
            "copy" => Event::PageEvent(PageEvent::Copy),
            "cut" => Event::PageEvent(PageEvent::Cut),
            "paste" => Event::PageEvent(PageEvent::Paste),
            other => return Err(UnknownEventType(other.to_string())),
        };
        Ok(parsed)
    }
}
