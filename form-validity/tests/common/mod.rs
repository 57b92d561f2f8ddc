#![allow(dead_code)]

use form_validity::ValidityEvent;
use formdom::{Document, NodeId};
use simplelog::{Config, LevelFilter, TestLogger};

pub fn init_logging() {
    let _ = TestLogger::init(LevelFilter::Trace, Config::default());
}

/// A validity event as seen by a listener.
#[derive(Debug, Clone, PartialEq)]
pub struct Seen {
    pub target: NodeId,
    pub kind: String,
    pub detail: ValidityEvent<NodeId>,
}

/// Drain the document's event log, keeping `valid`/`invalid` events.
pub fn drain(doc: &mut Document) -> Vec<Seen> {
    doc.take_events()
        .into_iter()
        .filter_map(|d| {
            let detail = ValidityEvent::from_event(&d.event)?;
            Some(Seen {
                target: d.target,
                kind: d.event.event_type,
                detail,
            })
        })
        .collect()
}

/// Node by element id; panics when missing.
pub fn node(doc: &Document, id: &str) -> NodeId {
    doc.by_id(id)
        .unwrap_or_else(|| panic!("no element with id '{id}'"))
}
