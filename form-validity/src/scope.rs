//! Scope aggregator: tracks which fields under one element are invalid.

use std::rc::Rc;

use formdom::{FormDom, ScopeKind};

use crate::config::ValidatorConfig;
use crate::error::ValidityError;
use crate::history::SharedHistory;
use crate::resolver::resolve;
use crate::rule::CustomRule;

/// Validator bound to a field, fieldset or form.
///
/// Keeps the ordered, duplicate-free list of fields found invalid by its
/// checks. The list is only changed by this validator's own checks (and, for
/// fieldsets owned by a [`FormValidator`](crate::FormValidator), by the
/// form's).
pub struct Validator<D: FormDom> {
    element: D::Node,
    kind: ScopeKind,
    rules: Rc<[CustomRule<D>]>,
    history: SharedHistory,
    invalid: Vec<D::Node>,
}

impl<D: FormDom> Validator<D> {
    /// Bind a validator to `element`. Its scope kind is read once, here.
    pub fn new(dom: &D, element: D::Node, config: ValidatorConfig<D>) -> Self {
        let kind = dom.scope_kind(element);
        Self::from_parts(element, kind, config.rules.into(), config.history)
    }

    pub(crate) fn from_parts(
        element: D::Node,
        kind: ScopeKind,
        rules: Rc<[CustomRule<D>]>,
        history: SharedHistory,
    ) -> Self {
        Self {
            element,
            kind,
            rules,
            history,
            invalid: Vec::new(),
        }
    }

    pub fn element(&self) -> D::Node {
        self.element
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn rules(&self) -> &[CustomRule<D>] {
        &self.rules
    }

    pub(crate) fn shared_rules(&self) -> Rc<[CustomRule<D>]> {
        Rc::clone(&self.rules)
    }

    pub fn history(&self) -> &SharedHistory {
        &self.history
    }

    /// Fields currently recorded invalid, in the order they were found.
    pub fn invalid(&self) -> &[D::Node] {
        &self.invalid
    }

    pub fn is_invalid(&self, node: D::Node) -> bool {
        self.invalid.contains(&node)
    }

    /// Check `scope`, defaulting to the bound element.
    ///
    /// A field is resolved on its own and its entry updated. A container
    /// resets the invalid list and resolves every checkable field under it;
    /// the result is true when none is invalid.
    pub fn check_validity(
        &mut self,
        dom: &mut D,
        scope: Option<D::Node>,
    ) -> Result<bool, ValidityError> {
        self.check_with(dom, scope, |_, _, _| {})
    }

    /// Run a check, handing each resolved field to `propagate` after it has
    /// been recorded here.
    pub(crate) fn check_with<F>(
        &mut self,
        dom: &mut D,
        scope: Option<D::Node>,
        mut propagate: F,
    ) -> Result<bool, ValidityError>
    where
        F: FnMut(&D, D::Node, bool),
    {
        let (scope, kind) = match scope {
            None => (self.element, self.kind),
            Some(node) => (node, dom.scope_kind(node)),
        };

        if !kind.is_container() {
            let valid = self.check_field(dom, scope, None)?;
            propagate(&*dom, scope, valid);
            return Ok(valid);
        }

        self.invalid.clear();
        let fields = checkable(dom, scope);
        log::debug!("checking {} field(s) under {scope:?}", fields.len());

        for node in fields {
            let valid = self.check_field(dom, node, Some(scope))?;
            propagate(&*dom, node, valid);
        }

        Ok(self.invalid.is_empty())
    }

    /// Resolve one field and update its entry.
    pub(crate) fn check_field(
        &mut self,
        dom: &mut D,
        node: D::Node,
        origin: Option<D::Node>,
    ) -> Result<bool, ValidityError> {
        let outcome = resolve(dom, node, &self.rules, &self.history, origin)?;
        let valid = outcome.is_valid();
        self.record(node, valid);
        Ok(valid)
    }

    pub(crate) fn record(&mut self, node: D::Node, valid: bool) {
        let position = self.invalid.iter().position(|n| *n == node);
        match (valid, position) {
            (false, None) => self.invalid.push(node),
            (true, Some(i)) => {
                self.invalid.remove(i);
            }
            _ => {}
        }
    }

    pub(crate) fn reset(&mut self) {
        self.invalid.clear();
    }
}

/// Fields under `container` that take part in validation, submit controls
/// excluded.
pub(crate) fn checkable<D: FormDom>(dom: &D, container: D::Node) -> Vec<D::Node> {
    dom.elements(container)
        .into_iter()
        .filter(|n| dom.will_validate(*n) && dom.input_type(*n) != "submit")
        .collect()
}

impl<D: FormDom> std::fmt::Debug for Validator<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("element", &self.element)
            .field("kind", &self.kind)
            .field("rules", &self.rules.len())
            .field("invalid", &self.invalid)
            .finish()
    }
}
