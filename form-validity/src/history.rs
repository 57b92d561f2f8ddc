//! Remembered invalid values, keyed by field name.
//!
//! A field whose `customError` flag is still set when its value has moved on
//! since it was last recorded invalid is carrying a leftover message; the
//! resolver uses this history to tell the two apart.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Field name → value at which the field was last recorded invalid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidHistory {
    entries: HashMap<String, String>,
}

impl InvalidHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Record `name` as invalid at `value`, replacing any earlier value.
    pub fn record(&mut self, name: &str, value: &str) {
        self.entries.insert(name.to_string(), value.to_string());
    }

    /// Forget `name`. Returns whether it was recorded.
    pub fn forget(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Handle to an [`InvalidHistory`] shared by the validators of one check
/// tree. Clones point at the same history.
#[derive(Debug, Clone, Default)]
pub struct SharedHistory(Rc<RefCell<InvalidHistory>>);

impl SharedHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.0.borrow().get(name).map(str::to_string)
    }

    pub fn record(&self, name: &str, value: &str) {
        self.0.borrow_mut().record(name, value);
    }

    pub fn forget(&self, name: &str) -> bool {
        self.0.borrow_mut().forget(name)
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Copy of the current entries.
    pub fn snapshot(&self) -> InvalidHistory {
        self.0.borrow().clone()
    }

    /// Whether both handles point at the same history.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
