use std::fmt;

// Why propagation was stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    SearchShortcut,
    Rule { slot: String },
    Feature(&'static str),
}

// Input to the host page bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Call event.stopPropagation() in the capture phase
    StopPropagation(Reason),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::StopPropagation(Reason::SearchShortcut) => write!(f, "stop propagation (search shortcut)"),
            Action::StopPropagation(Reason::Rule { slot }) => write!(f, "stop propagation (rule {slot})"),
            Action::StopPropagation(Reason::Feature(feature)) => write!(f, "stop propagation ({feature})"),
        }
    }
}
