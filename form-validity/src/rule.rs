//! Custom validation rules.

use std::fmt;
use std::rc::Rc;

use formdom::{FormDom, ValidityState};

use crate::error::RuleError;

/// What a rule's test decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    /// Failed; the field's state becomes `customError`.
    Fail,
    /// Failed with an identifier that becomes the field's state.
    FailAs(String),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

impl From<bool> for Verdict {
    fn from(ok: bool) -> Self {
        if ok { Self::Pass } else { Self::Fail }
    }
}

/// A failure identifier. An empty one carries no state and counts as a plain
/// [`Verdict::Fail`].
impl From<&str> for Verdict {
    fn from(state: &str) -> Self {
        Self::from(state.to_string())
    }
}

impl From<String> for Verdict {
    fn from(state: String) -> Self {
        if state.is_empty() { Self::Fail } else { Self::FailAs(state) }
    }
}

/// Read-only view of the field a rule is testing.
pub struct FieldRef<'a, D: FormDom> {
    dom: &'a D,
    node: D::Node,
}

impl<'a, D: FormDom> FieldRef<'a, D> {
    pub fn new(dom: &'a D, node: D::Node) -> Self {
        Self { dom, node }
    }

    /// The whole document, for rules that compare against other fields.
    pub fn dom(&self) -> &'a D {
        self.dom
    }

    pub fn node(&self) -> D::Node {
        self.node
    }

    pub fn name(&self) -> &'a str {
        self.dom.name(self.node)
    }

    pub fn value(&self) -> &'a str {
        self.dom.value(self.node)
    }

    pub fn input_type(&self) -> &'a str {
        self.dom.input_type(self.node)
    }

    pub fn is_required(&self) -> bool {
        self.dom.is_required(self.node)
    }

    pub fn validity(&self) -> ValidityState {
        self.dom.validity(self.node)
    }
}

type TestFn<D> = dyn Fn(&FieldRef<'_, D>) -> Result<Verdict, RuleError>;

/// A predicate applied to fields matching `selector` once native
/// validation passes.
pub struct CustomRule<D: FormDom> {
    selector: String,
    test: Rc<TestFn<D>>,
    message: Option<String>,
}

impl<D: FormDom + 'static> CustomRule<D> {
    /// Create a rule from an infallible test. The test may return a `bool`,
    /// a failure identifier (`&str`/`String`) or a [`Verdict`].
    pub fn new<F, V>(selector: impl Into<String>, test: F) -> Self
    where
        F: Fn(&FieldRef<'_, D>) -> V + 'static,
        V: Into<Verdict>,
    {
        let test: Rc<TestFn<D>> =
            Rc::new(move |field: &FieldRef<'_, D>| -> Result<Verdict, RuleError> {
                Ok(test(field).into())
            });
        Self {
            selector: selector.into(),
            test,
            message: None,
        }
    }

    /// Create a rule whose test can fail. An error aborts the running check.
    pub fn try_new<F, V>(selector: impl Into<String>, test: F) -> Self
    where
        F: Fn(&FieldRef<'_, D>) -> Result<V, RuleError> + 'static,
        V: Into<Verdict>,
    {
        let test: Rc<TestFn<D>> =
            Rc::new(move |field: &FieldRef<'_, D>| -> Result<Verdict, RuleError> {
                test(field).map(Into::into)
            });
        Self {
            selector: selector.into(),
            test,
            message: None,
        }
    }

    /// Message set as the field's custom validity when the rule fails.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<D: FormDom> CustomRule<D> {
    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn get_message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub(crate) fn applies_to(&self, dom: &D, node: D::Node) -> bool {
        dom.matches(node, &self.selector)
    }

    pub(crate) fn run(&self, field: &FieldRef<'_, D>) -> Result<Verdict, RuleError> {
        (self.test)(field)
    }
}

// Built-in rules
impl<D: FormDom + 'static> CustomRule<D> {
    /// Require at least `min` characters. Fails as `minLength`.
    pub fn min_length(selector: impl Into<String>, min: usize) -> Self {
        Self::new(selector, move |f| {
            if f.value().chars().count() >= min { Verdict::Pass } else { "minLength".into() }
        })
    }

    /// Allow at most `max` characters. Fails as `maxLength`.
    pub fn max_length(selector: impl Into<String>, max: usize) -> Self {
        Self::new(selector, move |f| {
            if f.value().chars().count() <= max { Verdict::Pass } else { "maxLength".into() }
        })
    }

    /// Require the value to contain a match of `pattern`. Fails as `pattern`.
    pub fn pattern(selector: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        let re = regex::Regex::new(pattern)?;
        Ok(Self::new(selector, move |f| {
            if re.is_match(f.value()) { Verdict::Pass } else { "pattern".into() }
        }))
    }

    /// Require a valid email address. Fails as `email`.
    pub fn email(selector: impl Into<String>) -> Self {
        Self::new(selector, |f| {
            let v = f.value();
            if v.is_empty() || email_address::EmailAddress::is_valid(v) {
                Verdict::Pass
            } else {
                "email".into()
            }
        })
    }

    /// Require the value to contain `needle`. Fails as `contains`.
    pub fn contains(selector: impl Into<String>, needle: impl Into<String>) -> Self {
        let needle = needle.into();
        Self::new(selector, move |f| {
            if f.value().contains(&needle) { Verdict::Pass } else { "contains".into() }
        })
    }

    /// Require the value to be one of `allowed`. Fails as `oneOf`.
    pub fn one_of<I, S>(selector: impl Into<String>, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed: Vec<String> = allowed.into_iter().map(Into::into).collect();
        Self::new(selector, move |f| {
            if allowed.iter().any(|a| a == f.value()) { Verdict::Pass } else { "oneOf".into() }
        })
    }
}

impl<D: FormDom> Clone for CustomRule<D> {
    fn clone(&self) -> Self {
        Self {
            selector: self.selector.clone(),
            test: Rc::clone(&self.test),
            message: self.message.clone(),
        }
    }
}

impl<D: FormDom> fmt::Debug for CustomRule<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRule")
            .field("selector", &self.selector)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}
