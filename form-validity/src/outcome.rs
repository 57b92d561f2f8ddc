//! Outcome of checking one field, and the event that carries it.

use std::fmt;

use formdom::{Constraint, CustomEvent};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// The single authoritative validity state of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum State {
    Valid,
    /// A native constraint, or `customError` for injected messages and rules
    /// that failed without naming themselves.
    Constraint(Constraint),
    /// Identifier returned by a failing custom rule.
    Custom(String),
}

impl State {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Valid => "valid",
            Self::Constraint(c) => c.as_str(),
            Self::Custom(s) => s,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for State {
    fn from(s: String) -> Self {
        if s == "valid" {
            return Self::Valid;
        }
        match Constraint::from_name(&s) {
            Some(c) => Self::Constraint(c),
            None => Self::Custom(s),
        }
    }
}

impl From<State> for String {
    fn from(state: State) -> Self {
        match state {
            State::Custom(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

/// Result of resolving one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidityOutcome {
    pub state: State,
    /// Set on every invalid outcome (possibly empty), never on valid ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Whether the field was recorded invalid before this check.
    pub was_previously_invalid: bool,
}

impl ValidityOutcome {
    pub fn is_valid(&self) -> bool {
        self.state.is_valid()
    }
}

/// Name of the notification sent for an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Valid,
    Invalid,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
        }
    }
}

/// Detail payload of a `valid`/`invalid` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityEvent<N> {
    #[serde(flatten)]
    pub outcome: ValidityOutcome,
    /// Container whose check produced this event, when the check did not
    /// start at the field itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<N>,
}

impl<N> ValidityEvent<N> {
    pub fn kind(&self) -> EventKind {
        if self.outcome.is_valid() {
            EventKind::Valid
        } else {
            EventKind::Invalid
        }
    }
}

impl<N: Serialize> ValidityEvent<N> {
    /// Build the bubbling, non-cancelable DOM event for this outcome.
    pub fn to_event(&self) -> CustomEvent {
        let event = CustomEvent::new(self.kind().as_str())
            .bubbles(true)
            .cancelable(false);
        match serde_json::to_value(self) {
            Ok(detail) => event.detail(detail),
            Err(e) => {
                log::warn!("could not serialize {} detail: {e}", self.kind().as_str());
                event
            }
        }
    }
}

impl<N: DeserializeOwned> ValidityEvent<N> {
    /// Read the detail back from a `valid`/`invalid` event. Returns `None`
    /// for other events.
    pub fn from_event(event: &CustomEvent) -> Option<Self> {
        if !matches!(event.event_type.as_str(), "valid" | "invalid") {
            return None;
        }
        let detail = event.detail.clone()?;
        serde_json::from_value(detail).ok()
    }
}
