//! Form aggregator: a [`Validator`] over a `<form>` that keeps one validator
//! per fieldset in sync and accepts injected errors.

use std::collections::HashMap;
use std::rc::Rc;

use formdom::{FormDom, ScopeKind};

use crate::config::ValidatorConfig;
use crate::error::ValidityError;
use crate::history::SharedHistory;
use crate::rule::CustomRule;
use crate::scope::{Validator, checkable};

/// Fieldset validators owned by a form, keyed by fieldset identity.
struct Fieldsets<D: FormDom> {
    validators: HashMap<D::Node, Validator<D>>,
    rules: Rc<[CustomRule<D>]>,
    history: SharedHistory,
}

impl<D: FormDom> Fieldsets<D> {
    fn entry(&mut self, fieldset: D::Node) -> &mut Validator<D> {
        let Self {
            validators,
            rules,
            history,
        } = self;
        validators.entry(fieldset).or_insert_with(|| {
            log::trace!("creating validator for fieldset {fieldset:?}");
            Validator::from_parts(
                fieldset,
                ScopeKind::Fieldset,
                Rc::clone(rules),
                history.clone(),
            )
        })
    }

    fn get(&self, fieldset: D::Node) -> Option<&Validator<D>> {
        self.validators.get(&fieldset)
    }

    /// Empty the lists of every known fieldset inside `scope`, `scope`
    /// itself included. Fields that are no longer checkable would otherwise
    /// stay listed.
    fn reset_within(&mut self, dom: &D, scope: D::Node) {
        for (fieldset, validator) in &mut self.validators {
            if dom.contains(scope, *fieldset) {
                validator.reset();
            }
        }
    }

    /// Mirror a field's result into every fieldset that encloses it within
    /// `form`, nearest first.
    fn mirror(&mut self, dom: &D, form: D::Node, node: D::Node, valid: bool) {
        let mut current = dom.closest_fieldset(node);
        while let Some(fieldset) = current {
            if !dom.contains(form, fieldset) {
                break;
            }
            self.entry(fieldset).record(node, valid);
            current = dom.closest_fieldset(fieldset);
        }
    }
}

/// Validator for a whole `<form>`.
///
/// Every field result is recorded in the form's invalid list and in the
/// lists of the fieldsets around the field.
pub struct FormValidator<D: FormDom> {
    base: Validator<D>,
    fieldsets: Fieldsets<D>,
}

impl<D: FormDom> FormValidator<D> {
    /// Bind to `form`, which must be a `<form>` element.
    pub fn new(dom: &D, form: D::Node, config: ValidatorConfig<D>) -> Result<Self, ValidityError> {
        let base = Validator::new(dom, form, config);
        if base.kind() != ScopeKind::Form {
            return Err(ValidityError::NotAForm(base.kind()));
        }

        let fieldsets = Fieldsets {
            validators: HashMap::new(),
            rules: base.shared_rules(),
            history: base.history().clone(),
        };

        Ok(Self { base, fieldsets })
    }

    pub fn element(&self) -> D::Node {
        self.base.element()
    }

    /// The form-level validator.
    pub fn base(&self) -> &Validator<D> {
        &self.base
    }

    pub fn history(&self) -> &SharedHistory {
        self.base.history()
    }

    /// Fields of the form currently recorded invalid.
    pub fn invalid(&self) -> &[D::Node] {
        self.base.invalid()
    }

    /// Check the whole form, one field, or one fieldset of this form.
    ///
    /// For a fieldset only its own fields are resolved; the result is the
    /// fieldset's validity. A fieldset outside the form yields
    /// [`ValidityError::ForeignFieldset`].
    pub fn check_validity(
        &mut self,
        dom: &mut D,
        context: Option<D::Node>,
    ) -> Result<bool, ValidityError> {
        if let Some(node) = context {
            if dom.scope_kind(node) == ScopeKind::Fieldset {
                return self.check_fieldset(dom, node);
            }
        }

        let form = self.base.element();
        let scope = context.unwrap_or(form);
        if dom.scope_kind(scope).is_container() {
            self.fieldsets.reset_within(dom, scope);
        }

        let Self { base, fieldsets } = self;
        base.check_with(dom, context, |dom, node, valid| {
            fieldsets.mirror(dom, form, node, valid);
        })
    }

    fn check_fieldset(&mut self, dom: &mut D, fieldset: D::Node) -> Result<bool, ValidityError> {
        let form = self.base.element();
        if !dom.contains(form, fieldset) {
            log::debug!("fieldset {fieldset:?} is outside form {form:?}");
            return Err(ValidityError::ForeignFieldset);
        }

        self.fieldsets.entry(fieldset);
        self.fieldsets.reset_within(dom, fieldset);

        let fields = checkable(dom, fieldset);
        let dropped: Vec<D::Node> = self
            .base
            .invalid()
            .iter()
            .copied()
            .filter(|n| dom.contains(fieldset, *n) && !fields.contains(n))
            .collect();
        for node in dropped {
            self.base.record(node, true);
        }

        for node in fields {
            let valid = self.base.check_field(dom, node, Some(fieldset))?;
            self.fieldsets.mirror(dom, form, node, valid);
        }

        Ok(self
            .fieldsets
            .get(fieldset)
            .is_none_or(|v| v.invalid().is_empty()))
    }

    /// Validators for every fieldset in the form, in document order.
    pub fn fieldsets(&mut self, dom: &D) -> Vec<&Validator<D>> {
        let nodes = dom.fieldsets(self.base.element());
        for fieldset in &nodes {
            self.fieldsets.entry(*fieldset);
        }
        nodes
            .iter()
            .filter_map(|fieldset| self.fieldsets.get(*fieldset))
            .collect()
    }

    /// Validator for `fieldset`, if it is a fieldset inside this form.
    pub fn fieldset(&mut self, dom: &D, fieldset: D::Node) -> Option<&Validator<D>> {
        self.fieldset_mut(dom, fieldset).map(|v| &*v)
    }

    /// Mutable access to a fieldset validator, e.g. to check it on its own
    /// without updating the form.
    pub fn fieldset_mut(&mut self, dom: &D, fieldset: D::Node) -> Option<&mut Validator<D>> {
        let owned = dom.scope_kind(fieldset) == ScopeKind::Fieldset
            && dom.contains(self.base.element(), fieldset);
        if owned {
            Some(self.fieldsets.entry(fieldset))
        } else {
            None
        }
    }

    /// Inject error messages by field name.
    ///
    /// Every checkable field gets its mapped message as custom validity, or
    /// an empty one (clearing earlier errors) when it is not in `errors`.
    /// Fields whose message actually changed are re-checked immediately,
    /// which sends their `valid`/`invalid` event.
    pub fn set_validity<I, K, V>(&mut self, dom: &mut D, errors: I) -> Result<(), ValidityError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let errors: HashMap<String, String> = errors
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let form = self.base.element();

        for node in checkable(dom, form) {
            let previous = if dom.validity(node).custom_error {
                dom.validation_message(node)
            } else {
                String::new()
            };
            let message = errors.get(dom.name(node)).cloned().unwrap_or_default();
            dom.set_custom_validity(node, &message);

            if previous != message {
                log::debug!("'{}': custom message changed, re-checking", dom.name(node));
                let valid = self.base.check_field(dom, node, Some(form))?;
                self.fieldsets.mirror(dom, form, node, valid);
            }
        }

        Ok(())
    }

    /// [`set_validity`](Self::set_validity) from a JSON object of
    /// `"field name": "message"` pairs, as returned by a server.
    pub fn set_validity_json(&mut self, dom: &mut D, json: &str) -> Result<(), ValidityError> {
        let errors: HashMap<String, String> = serde_json::from_str(json)?;
        self.set_validity(dom, errors)
    }
}

impl<D: FormDom> std::fmt::Debug for FormValidator<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormValidator")
            .field("base", &self.base)
            .field("fieldsets", &self.fieldsets.validators.len())
            .finish()
    }
}
