//! Field resolution: one field in, one authoritative outcome and one event
//! out.

use formdom::{Constraint, FormDom};

use crate::error::ValidityError;
use crate::history::SharedHistory;
use crate::outcome::{State, ValidityEvent, ValidityOutcome};
use crate::rule::{CustomRule, FieldRef, Verdict};

/// Resolve the validity of `node` and dispatch a `valid` or `invalid` event
/// on it.
///
/// Native constraints are read first. A `customError` is honoured when the
/// field has no recorded invalid value or is still at that value; otherwise
/// the message is a leftover and gets cleared. Custom rules only run when
/// native validation passes, the field is enabled, and it is required or
/// non-empty. The first rule whose selector matches decides.
///
/// A rule error aborts before any event is sent or history is touched.
pub fn resolve<D: FormDom>(
    dom: &mut D,
    node: D::Node,
    rules: &[CustomRule<D>],
    history: &SharedHistory,
    origin: Option<D::Node>,
) -> Result<ValidityOutcome, ValidityError> {
    let name = dom.name(node).to_string();
    let value = dom.value(node).to_string();
    let previous = history.get(&name);
    let validity = dom.validity(node);

    let mut state = State::Valid;
    let mut message = None;

    if !validity.valid() {
        let honour_custom = validity.custom_error
            && match previous.as_deref() {
                None => true,
                Some(recorded) => recorded == value,
            };

        if honour_custom {
            state = State::Constraint(Constraint::CustomError);
            message = Some(dom.validation_message(node));
        } else {
            if validity.custom_error {
                log::debug!("'{name}': clearing stale custom error (value changed)");
                dom.set_custom_validity(node, "");
            }
            if let Some(constraint) = validity.first_violation() {
                state = State::Constraint(constraint);
            }
        }
    }

    let run_rules = state.is_valid()
        && !rules.is_empty()
        && !dom.is_disabled(node)
        && (dom.is_required(node) || !value.is_empty());

    if run_rules {
        if let Some(rule) = rules.iter().find(|r| r.applies_to(&*dom, node)) {
            let verdict = rule
                .run(&FieldRef::new(&*dom, node))
                .map_err(|e| ValidityError::rule(rule.selector(), name.as_str(), e))?;
            log::trace!("'{name}': rule '{}' -> {verdict:?}", rule.selector());

            if !verdict.is_pass() {
                state = match verdict {
                    Verdict::FailAs(id) if !id.is_empty() => State::Custom(id),
                    _ => State::Constraint(Constraint::CustomError),
                };
                if let Some(msg) = rule.get_message() {
                    dom.set_custom_validity(node, msg);
                    message = Some(msg.to_string());
                }
            }
        }
    }

    if state.is_valid() {
        history.forget(&name);
    } else {
        history.record(&name, &value);
        message.get_or_insert_with(String::new);
    }

    let outcome = ValidityOutcome {
        state,
        message,
        was_previously_invalid: previous.is_some(),
    };
    log::debug!("'{name}' resolved to {}", outcome.state);

    let event = ValidityEvent {
        outcome: outcome.clone(),
        origin,
    };
    dom.dispatch(node, event.to_event());

    Ok(outcome)
}
