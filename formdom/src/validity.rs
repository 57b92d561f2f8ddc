//! Native constraint validation.
//!
//! Mirrors the browser's `ValidityState`: one flag per constraint, computed
//! from the control's value and its declared constraints.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::element::{Element, Tag};

/// A native constraint a form control can violate.
///
/// Declaration order is the stable enumeration order used when several flags
/// are set at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Constraint {
    ValueMissing,
    TypeMismatch,
    PatternMismatch,
    TooLong,
    TooShort,
    RangeUnderflow,
    RangeOverflow,
    StepMismatch,
    BadInput,
    CustomError,
}

impl Constraint {
    /// Every constraint, in enumeration order.
    pub const ALL: [Constraint; 10] = [
        Constraint::ValueMissing,
        Constraint::TypeMismatch,
        Constraint::PatternMismatch,
        Constraint::TooLong,
        Constraint::TooShort,
        Constraint::RangeUnderflow,
        Constraint::RangeOverflow,
        Constraint::StepMismatch,
        Constraint::BadInput,
        Constraint::CustomError,
    ];

    /// The DOM name of the flag (`valueMissing`, `customError`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ValueMissing => "valueMissing",
            Self::TypeMismatch => "typeMismatch",
            Self::PatternMismatch => "patternMismatch",
            Self::TooLong => "tooLong",
            Self::TooShort => "tooShort",
            Self::RangeUnderflow => "rangeUnderflow",
            Self::RangeOverflow => "rangeOverflow",
            Self::StepMismatch => "stepMismatch",
            Self::BadInput => "badInput",
            Self::CustomError => "customError",
        }
    }

    /// Look up a constraint by its DOM name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// Default user-facing message for a violation of this constraint.
    pub fn default_message(self) -> &'static str {
        match self {
            Self::ValueMissing => "Please fill out this field.",
            Self::TypeMismatch => "Please enter a valid value.",
            Self::PatternMismatch => "Please match the requested format.",
            Self::TooLong => "Please shorten this text.",
            Self::TooShort => "Please lengthen this text.",
            Self::RangeUnderflow => "Value must be greater.",
            Self::RangeOverflow => "Value must be less.",
            Self::StepMismatch => "Please enter a valid value.",
            Self::BadInput => "Please enter a number.",
            Self::CustomError => "",
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Native validity flags of one control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidityState {
    pub value_missing: bool,
    pub type_mismatch: bool,
    pub pattern_mismatch: bool,
    pub too_long: bool,
    pub too_short: bool,
    pub range_underflow: bool,
    pub range_overflow: bool,
    pub step_mismatch: bool,
    pub bad_input: bool,
    pub custom_error: bool,
}

impl ValidityState {
    /// Aggregate flag: true when no constraint is violated.
    pub fn valid(&self) -> bool {
        self.flags().next().is_none()
    }

    pub fn get(&self, constraint: Constraint) -> bool {
        match constraint {
            Constraint::ValueMissing => self.value_missing,
            Constraint::TypeMismatch => self.type_mismatch,
            Constraint::PatternMismatch => self.pattern_mismatch,
            Constraint::TooLong => self.too_long,
            Constraint::TooShort => self.too_short,
            Constraint::RangeUnderflow => self.range_underflow,
            Constraint::RangeOverflow => self.range_overflow,
            Constraint::StepMismatch => self.step_mismatch,
            Constraint::BadInput => self.bad_input,
            Constraint::CustomError => self.custom_error,
        }
    }

    pub fn set(&mut self, constraint: Constraint, value: bool) {
        let flag = match constraint {
            Constraint::ValueMissing => &mut self.value_missing,
            Constraint::TypeMismatch => &mut self.type_mismatch,
            Constraint::PatternMismatch => &mut self.pattern_mismatch,
            Constraint::TooLong => &mut self.too_long,
            Constraint::TooShort => &mut self.too_short,
            Constraint::RangeUnderflow => &mut self.range_underflow,
            Constraint::RangeOverflow => &mut self.range_overflow,
            Constraint::StepMismatch => &mut self.step_mismatch,
            Constraint::BadInput => &mut self.bad_input,
            Constraint::CustomError => &mut self.custom_error,
        };
        *flag = value;
    }

    /// Builder-style `set`, handy for constructing states by hand.
    pub fn with(mut self, constraint: Constraint) -> Self {
        self.set(constraint, true);
        self
    }

    /// Violated constraints in enumeration order.
    pub fn flags(&self) -> impl Iterator<Item = Constraint> + '_ {
        Constraint::ALL.into_iter().filter(|c| self.get(*c))
    }

    /// First violated constraint other than `customError`.
    pub fn first_violation(&self) -> Option<Constraint> {
        self.flags().find(|c| *c != Constraint::CustomError)
    }
}

/// Declared constraints of a control (`required` lives on the element).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constraints {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
}

/// Compute the native validity of `element` carrying `custom_message`.
///
/// `disabled` is the effective state, including a disabled ancestor fieldset.
pub fn compute(element: &Element, disabled: bool, custom_message: &str) -> ValidityState {
    let mut state = ValidityState {
        custom_error: !custom_message.is_empty(),
        ..Default::default()
    };

    if disabled || !element.tag.is_control() {
        return state;
    }

    let value = element.value.as_str();
    if value.is_empty() {
        state.value_missing = element.required;
        return state;
    }

    // Only text-like inputs and textareas carry the remaining constraints.
    if element.tag == Tag::Select {
        return state;
    }

    let constraints = &element.constraints;
    let chars = value.chars().count();
    if let Some(min) = constraints.min_length {
        state.too_short = chars < min;
    }
    if let Some(max) = constraints.max_length {
        state.too_long = chars > max;
    }

    if element.tag == Tag::Textarea {
        return state;
    }

    match element.input_type.as_str() {
        "email" => state.type_mismatch = !email_address::EmailAddress::is_valid(value),
        "url" => state.type_mismatch = url::Url::parse(value).is_err(),
        "number" | "range" => match value.trim().parse::<f64>() {
            Ok(n) => check_range(&mut state, constraints, n),
            Err(_) => state.bad_input = true,
        },
        _ => {}
    }

    if let Some(pattern) = &constraints.pattern {
        match regex::Regex::new(&format!("^(?:{pattern})$")) {
            Ok(re) => state.pattern_mismatch = !re.is_match(value),
            Err(e) => log::warn!("ignoring invalid pattern {pattern:?} on '{}': {e}", element.id),
        }
    }

    state
}

fn check_range(state: &mut ValidityState, constraints: &Constraints, n: f64) {
    if let Some(min) = constraints.min {
        state.range_underflow = n < min;
    }
    if let Some(max) = constraints.max {
        state.range_overflow = n > max;
    }
    if let Some(step) = constraints.step.filter(|s| *s > 0.0) {
        let base = constraints.min.unwrap_or(0.0);
        let steps = (n - base) / step;
        state.step_mismatch = (steps - steps.round()).abs() > 1e-9;
    }
}
