use std::fmt;

use formdom::FormDom;

use crate::history::SharedHistory;
use crate::rule::CustomRule;

/// Construction options for [`Validator`](crate::Validator) and
/// [`FormValidator`](crate::FormValidator).
///
/// ```ignore
/// let config = ValidatorConfig::new()
///     .rule(CustomRule::min_length("[name=password]", 12).message("Too short"))
///     .rule(CustomRule::email(".email"))
///     .history(shared.clone());
/// ```
pub struct ValidatorConfig<D: FormDom> {
    pub(crate) rules: Vec<CustomRule<D>>,
    pub(crate) history: SharedHistory,
}

impl<D: FormDom> ValidatorConfig<D> {
    /// No custom rules and a fresh history.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            history: SharedHistory::new(),
        }
    }

    /// Append a custom rule. Order matters: the first rule whose selector
    /// matches a field decides for that field.
    pub fn rule(mut self, rule: CustomRule<D>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = CustomRule<D>>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Share an invalid-value history with other validators.
    pub fn history(mut self, history: SharedHistory) -> Self {
        self.history = history;
        self
    }

    pub fn get_rules(&self) -> &[CustomRule<D>] {
        &self.rules
    }
}

impl<D: FormDom> Default for ValidatorConfig<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: FormDom> Clone for ValidatorConfig<D> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
            history: self.history.clone(),
        }
    }
}

impl<D: FormDom> fmt::Debug for ValidatorConfig<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorConfig")
            .field("rules", &self.rules)
            .field("history", &self.history)
            .finish()
    }
}
