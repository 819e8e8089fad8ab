use crate::action::{Action, Reason};
use crate::config::SiteConfig;
use crate::event::{Event, KeyEvent, KeyValue, PageEvent, PointerEvent};
use crate::hid::HidState;
use log::debug;

// DOM keyCode of 'F'
pub const KEY_CODE_F: u32 = 70;

/// Decides, per page, which events the page itself must not see.
pub struct EventHandler {
    hid: HidState,
    site: SiteConfig,
    actions: Vec<Action>,
}

impl EventHandler {
    pub fn new(site: SiteConfig) -> EventHandler {
        EventHandler {
            hid: HidState::new(),
            site,
            actions: vec![],
        }
    }

    pub fn hid(&self) -> &HidState {
        &self.hid
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    /// Swaps in a new configuration, e.g. after the settings changed.
    pub fn reload(&mut self, site: SiteConfig) {
        self.site = site;
    }

    pub fn on_events(&mut self, events: &[Event]) -> Vec<Action> {
        for event in events {
            match event {
                Event::KeyEvent(key_event) => self.on_key_event(key_event),
                Event::PointerEvent(pointer_event) => self.on_pointer_event(pointer_event),
                Event::PageEvent(page_event) => self.on_page_event(page_event),
            }
        }
        self.actions.drain(..).collect()
    }

    pub fn on_event(&mut self, event: &Event) -> Vec<Action> {
        self.on_events(std::slice::from_ref(event))
    }

    fn on_key_event(&mut self, event: &KeyEvent) {
        self.hid.update_key(event);
        debug!("=> {:?} {} ({}): {:?}", event.value(), event.code(), event.key_code(), self.hid);

        if self.is_search_shortcut() {
            self.send_action(Action::StopPropagation(Reason::SearchShortcut));
        }

        self.prevent();

        if event.value() == KeyValue::Up {
            self.hid.release_stuck_modifiers();
        }
    }

    fn on_pointer_event(&mut self, event: &PointerEvent) {
        match *event {
            PointerEvent::Wheel { delta } => {
                self.hid.set_wheel(delta);
                self.prevent();
                self.hid.wheel = 0;
            }
            PointerEvent::MouseDown | PointerEvent::TouchStart => {
                self.hid.click = true;
                self.prevent();
            }
            PointerEvent::MouseUp | PointerEvent::TouchEnd => {
                self.hid.click = false;
                self.prevent();
            }
            PointerEvent::ContextMenu => {
                self.hid.context = true;
                self.prevent();
                self.hid.context = false;
                self.allow_feature("contextmenu");
            }
        }
    }

    fn on_page_event(&mut self, event: &PageEvent) {
        self.allow_feature(event.feature());
    }

    // Ctrl+F stays with the browser's find bar.
    fn is_search_shortcut(&self) -> bool {
        self.site.active
            && self.site.feature("search")
            && self.hid.keys.contains(&KEY_CODE_F)
            && self.hid.ctrl
            && !self.hid.shift
            && !self.hid.alt
    }

    // First matching rule wins.
    fn prevent(&mut self) {
        if !self.site.active {
            return;
        }

        let matched = self
            .site
            .rules()
            .find(|(_, rule)| rule.matches(&self.hid))
            .map(|(slot, _)| slot.to_string());

        if let Some(slot) = matched {
            debug!("rule {slot} matched");
            self.send_action(Action::StopPropagation(Reason::Rule { slot }));
        }
    }

    fn allow_feature(&mut self, feature: &'static str) {
        if self.site.active && self.site.feature(feature) {
            debug!("{feature} allowed");
            self.send_action(Action::StopPropagation(Reason::Feature(feature)));
        }
    }

    fn send_action(&mut self, action: Action) {
        self.actions.push(action);
    }
}
