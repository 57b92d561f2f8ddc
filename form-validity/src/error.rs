//! Error types

/// Error raised by a custom rule's test.
pub type RuleError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can stop a validity check.
#[derive(Debug, thiserror::Error)]
pub enum ValidityError {
    /// A custom rule's test failed to run. The check stopped at that field.
    #[error("rule '{selector}' failed on field '{field}': {source}")]
    Rule {
        /// Selector of the rule that failed.
        selector: String,
        /// Name of the field being checked.
        field: String,
        source: RuleError,
    },

    /// The fieldset passed as a check context is not inside the form.
    #[error("fieldset is not part of this form")]
    ForeignFieldset,

    /// A form validator was bound to something other than a `<form>`.
    #[error("form validator bound to a {0:?} scope")]
    NotAForm(formdom::ScopeKind),

    /// Injected errors were not a JSON object of strings.
    #[error("invalid error map: {0}")]
    ErrorMap(#[from] serde_json::Error),
}

impl ValidityError {
    /// Creates a rule error.
    pub fn rule(selector: impl Into<String>, field: impl Into<String>, source: RuleError) -> Self {
        Self::Rule {
            selector: selector.into(),
            field: field.into(),
            source,
        }
    }
}
