use serde::Serialize;

use crate::document::NodeId;

/// A DOM `CustomEvent`: a named notification with an optional JSON detail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomEvent {
    pub event_type: String,
    pub bubbles: bool,
    pub cancelable: bool,
    pub detail: Option<serde_json::Value>,
}

impl CustomEvent {
    /// A non-bubbling, non-cancelable event without detail.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            bubbles: false,
            cancelable: false,
            detail: None,
        }
    }

    pub fn bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    pub fn cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    pub fn detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// An event as delivered: the event plus the node it was dispatched on.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchedEvent {
    pub target: NodeId,
    pub event: CustomEvent,
}

/// Event listener. Receives the event and the node it is currently
/// registered on (the `currentTarget`).
pub type Listener = Box<dyn FnMut(&DispatchedEvent, NodeId)>;
