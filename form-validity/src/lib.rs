//! Form validity checking on top of native constraint validation.
//!
//! Adds custom rules, per-form and per-fieldset invalid lists, and injected
//! error messages to whatever the document's [`FormDom`] reports. Every
//! checked field gets exactly one bubbling `valid` or `invalid` event whose
//! detail is a [`ValidityEvent`].
//!
//! # Example
//!
//! ```ignore
//! use form_validity::{CustomRule, FormValidator, ValidatorConfig};
//!
//! let config = ValidatorConfig::new()
//!     .rule(CustomRule::new("[name=username]", |f| !f.value().contains(' '))
//!         .message("No spaces please"));
//! let mut form = FormValidator::new(&doc, doc.root(), config)?;
//!
//! if !form.check_validity(&mut doc, None)? {
//!     for field in form.invalid() {
//!         // highlight field
//!     }
//! }
//!
//! // Errors returned by the server:
//! form.set_validity(&mut doc, [("email", "Already registered")])?;
//! ```

mod config;
mod error;
mod form;
mod history;
mod outcome;
mod resolver;
mod rule;
mod scope;

pub use config::ValidatorConfig;
pub use error::{RuleError, ValidityError};
pub use form::FormValidator;
pub use formdom::FormDom;
pub use history::{InvalidHistory, SharedHistory};
pub use outcome::{EventKind, State, ValidityEvent, ValidityOutcome};
pub use resolver::resolve;
pub use rule::{CustomRule, FieldRef, Verdict};
pub use scope::Validator;
