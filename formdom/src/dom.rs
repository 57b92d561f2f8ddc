//! The capabilities a validator needs from a document.
//!
//! [`Document`](crate::Document) implements this trait; a host embedding a
//! different element tree implements it over its own node handles.

use std::fmt;
use std::hash::Hash;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::event::CustomEvent;
use crate::validity::ValidityState;

/// What a node is, as far as validity scopes are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// A single element checked on its own.
    Field,
    /// A `<fieldset>` grouping controls inside a form.
    Fieldset,
    /// A `<form>`.
    Form,
}

impl ScopeKind {
    pub fn is_container(self) -> bool {
        !matches!(self, Self::Field)
    }
}

pub trait FormDom {
    /// Cheap node handle; identity is equality.
    type Node: Copy + Eq + Hash + fmt::Debug + Serialize + DeserializeOwned;

    fn scope_kind(&self, node: Self::Node) -> ScopeKind;

    // Field attributes
    fn name(&self, node: Self::Node) -> &str;
    fn value(&self, node: Self::Node) -> &str;
    /// The DOM `type` property (`text`, `email`, `submit`, `select-one`...).
    fn input_type(&self, node: Self::Node) -> &str;
    fn is_disabled(&self, node: Self::Node) -> bool;
    fn is_required(&self, node: Self::Node) -> bool;
    /// Whether the node takes part in constraint validation.
    fn will_validate(&self, node: Self::Node) -> bool;

    // Native constraint validation
    fn validity(&self, node: Self::Node) -> ValidityState;
    fn validation_message(&self, node: Self::Node) -> String;
    /// Set the custom error message; an empty message clears `customError`.
    fn set_custom_validity(&mut self, node: Self::Node, message: &str);

    // Selectors and traversal
    fn matches(&self, node: Self::Node, selector: &str) -> bool;
    /// Listed controls under `container`, in document order.
    fn elements(&self, container: Self::Node) -> Vec<Self::Node>;
    /// Fieldsets under `container`, in document order.
    fn fieldsets(&self, container: Self::Node) -> Vec<Self::Node>;
    /// Nearest fieldset strictly above `node`.
    fn closest_fieldset(&self, node: Self::Node) -> Option<Self::Node>;
    /// Inclusive containment, like `Node.contains`.
    fn contains(&self, ancestor: Self::Node, node: Self::Node) -> bool;

    /// Deliver `event` to listeners on `node` (and its ancestors if the event
    /// bubbles) before returning.
    fn dispatch(&mut self, node: Self::Node, event: CustomEvent);
}
