//! An in-memory form document: elements, native constraint validation,
//! selector matching and bubbling events.

pub mod document;
pub mod dom;
pub mod element;
pub mod event;
pub mod selector;
pub mod validity;

pub use document::{Document, NodeId};
pub use dom::{FormDom, ScopeKind};
pub use element::{find_element, Element, Tag};
pub use event::{CustomEvent, DispatchedEvent, Listener};
pub use selector::{Selector, SelectorError};
pub use validity::{Constraint, Constraints, ValidityState};
