mod common;

use common::{drain, init_logging, node};
use form_validity::{FormValidator, ValidatorConfig, ValidityError};
use formdom::{Document, Element, FormDom, NodeId, ScopeKind};

/// ```text
/// form#form
///   fieldset#account
///     input[name=email]   required
///     fieldset#names
///       input[name=first] required
///   fieldset#extra
///     input[name=bio]
///   input[name=code]      required
/// ```
fn account_form() -> Document {
    init_logging();
    Document::new(
        Element::form().id("form").children(vec![
            Element::fieldset().id("account").children(vec![
                Element::input("email").id("email").input_type("email").required(true),
                Element::fieldset()
                    .id("names")
                    .child(Element::input("first").id("first").required(true)),
            ]),
            Element::fieldset()
                .id("extra")
                .child(Element::input("bio").id("bio")),
            Element::input("code").id("code").required(true),
        ]),
    )
}

fn form_validator(doc: &Document) -> FormValidator<Document> {
    FormValidator::new(doc, node(doc, "form"), ValidatorConfig::new()).unwrap()
}

fn invalid_of(form: &mut FormValidator<Document>, doc: &Document, fieldset: &str) -> Vec<NodeId> {
    form.fieldset(doc, node(doc, fieldset))
        .map(|v| v.invalid().to_vec())
        .unwrap_or_default()
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_requires_form_element() {
    let doc = account_form();
    let err = FormValidator::new(&doc, node(&doc, "account"), ValidatorConfig::new()).unwrap_err();
    assert!(matches!(err, ValidityError::NotAForm(ScopeKind::Fieldset)));

    let err = FormValidator::new(&doc, node(&doc, "code"), ValidatorConfig::new()).unwrap_err();
    assert!(matches!(err, ValidityError::NotAForm(ScopeKind::Field)));
}

// ============================================================================
// Fieldset propagation
// ============================================================================

#[test]
fn test_form_check_fills_fieldset_lists() {
    let mut doc = account_form();
    let mut form = form_validator(&doc);

    assert!(!form.check_validity(&mut doc, None).unwrap());
    let (email, first, code) = (node(&doc, "email"), node(&doc, "first"), node(&doc, "code"));
    assert_eq!(form.invalid(), [email, first, code]);

    assert_eq!(invalid_of(&mut form, &doc, "account"), [email, first]);
    assert_eq!(invalid_of(&mut form, &doc, "names"), [first]);
    assert!(invalid_of(&mut form, &doc, "extra").is_empty());
}

#[test]
fn test_fieldset_lists_match_form_list() {
    let mut doc = account_form();
    let mut form = form_validator(&doc);
    form.check_validity(&mut doc, None).unwrap();

    let form_invalid = form.invalid().to_vec();
    for fieldset in form.fieldsets(&doc) {
        for field in doc.elements(fieldset.element()) {
            assert_eq!(fieldset.is_invalid(field), form_invalid.contains(&field));
        }
    }
}

#[test]
fn test_field_check_updates_enclosing_fieldsets() {
    let mut doc = account_form();
    let mut form = form_validator(&doc);
    form.check_validity(&mut doc, None).unwrap();

    let first = node(&doc, "first");
    doc.set_value(first, "Ada");
    assert!(form.check_validity(&mut doc, Some(first)).unwrap());

    assert!(!form.base().is_invalid(first));
    assert_eq!(invalid_of(&mut form, &doc, "account"), [node(&doc, "email")]);
    assert!(invalid_of(&mut form, &doc, "names").is_empty());
}

#[test]
fn test_fieldset_check_leaves_other_fields_alone() {
    let mut doc = account_form();
    let mut form = form_validator(&doc);
    form.check_validity(&mut doc, None).unwrap();
    drain(&mut doc);

    let (account, email) = (node(&doc, "account"), node(&doc, "email"));
    doc.set_value(email, "ada@example.com");
    assert!(!form.check_validity(&mut doc, Some(account)).unwrap());

    let events = drain(&mut doc);
    let targets: Vec<NodeId> = events.iter().map(|e| e.target).collect();
    assert_eq!(targets, [email, node(&doc, "first")]);
    assert!(events.iter().all(|e| e.detail.origin == Some(account)));

    // `code` was not re-checked and stays invalid on the form.
    assert_eq!(form.invalid(), [node(&doc, "first"), node(&doc, "code")]);
    assert_eq!(invalid_of(&mut form, &doc, "account"), [node(&doc, "first")]);
}

#[test]
fn test_form_check_drops_fields_that_left_validation() {
    let mut doc = account_form();
    let mut form = form_validator(&doc);
    let (email, first, code) = (node(&doc, "email"), node(&doc, "first"), node(&doc, "code"));
    form.check_validity(&mut doc, None).unwrap();
    assert_eq!(invalid_of(&mut form, &doc, "names"), [first]);

    doc.set_disabled(first, true);
    assert!(!form.check_validity(&mut doc, None).unwrap());

    assert_eq!(form.invalid(), [email, code]);
    assert_eq!(invalid_of(&mut form, &doc, "account"), [email]);
    assert!(invalid_of(&mut form, &doc, "names").is_empty());
}

#[test]
fn test_disabled_field_leaves_fieldset_list() {
    init_logging();
    let mut doc = Document::new(Element::form().id("form").child(
        Element::fieldset()
            .id("fs")
            .child(Element::input("a").id("a").required(true)),
    ));
    let mut form = form_validator(&doc);
    assert!(!form.check_validity(&mut doc, None).unwrap());

    let a = node(&doc, "a");
    doc.set_disabled(a, true);
    assert!(form.check_validity(&mut doc, None).unwrap());
    assert!(form.invalid().is_empty());
    assert!(invalid_of(&mut form, &doc, "fs").is_empty());
}

#[test]
fn test_fieldset_check_resets_nested_fieldsets() {
    let mut doc = account_form();
    let mut form = form_validator(&doc);
    let (account, email, first, code) = (
        node(&doc, "account"),
        node(&doc, "email"),
        node(&doc, "first"),
        node(&doc, "code"),
    );
    form.check_validity(&mut doc, None).unwrap();

    doc.set_disabled(first, true);
    assert!(!form.check_validity(&mut doc, Some(account)).unwrap());

    assert_eq!(invalid_of(&mut form, &doc, "account"), [email]);
    assert!(invalid_of(&mut form, &doc, "names").is_empty());
    assert_eq!(form.invalid(), [email, code]);
}

#[test]
fn test_foreign_fieldset_is_rejected() {
    init_logging();
    let mut doc = Document::new(Element::div().children(vec![
        Element::form().id("form").child(Element::input("a").id("a")),
        Element::fieldset()
            .id("elsewhere")
            .child(Element::input("b").required(true)),
    ]));
    let mut form = form_validator(&doc);
    let elsewhere = node(&doc, "elsewhere");

    let err = form.check_validity(&mut doc, Some(elsewhere)).unwrap_err();
    assert!(matches!(err, ValidityError::ForeignFieldset));
    assert!(drain(&mut doc).is_empty());
    assert!(form.fieldset(&doc, elsewhere).is_none());
}

#[test]
fn test_fieldset_validators_are_cached() {
    let doc = account_form();
    let mut form = form_validator(&doc);
    let account = node(&doc, "account");

    let first: Vec<*const _> = form.fieldsets(&doc).into_iter().map(|v| v as *const _).collect();
    let again: Vec<*const _> = form.fieldsets(&doc).into_iter().map(|v| v as *const _).collect();
    assert_eq!(first.len(), 3);
    assert_eq!(first, again);

    let single = form.fieldset(&doc, account).map(|v| v as *const _);
    assert_eq!(single, Some(first[0]));
}

#[test]
fn test_fieldset_lookup_rejects_non_fieldsets() {
    let doc = account_form();
    let mut form = form_validator(&doc);
    assert!(form.fieldset(&doc, node(&doc, "email")).is_none());
    assert!(form.fieldset(&doc, node(&doc, "form")).is_none());

    let names = form.fieldset(&doc, node(&doc, "names")).unwrap();
    assert_eq!(names.kind(), ScopeKind::Fieldset);
}

// ============================================================================
// Injected errors
// ============================================================================

/// All fields natively valid.
fn filled_form() -> Document {
    let mut doc = account_form();
    for (id, value) in [("email", "ada@example.com"), ("first", "Ada"), ("code", "X1")] {
        let n = node(&doc, id);
        doc.set_value(n, value);
    }
    doc
}

#[test]
fn test_set_validity_rechecks_changed_fields_only() {
    let mut doc = filled_form();
    let mut form = form_validator(&doc);
    let (email, form_node) = (node(&doc, "email"), node(&doc, "form"));

    form.set_validity(&mut doc, [("email", "Already registered")]).unwrap();
    let events = drain(&mut doc);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].target, email);
    assert_eq!(events[0].kind, "invalid");
    assert_eq!(events[0].detail.origin, Some(form_node));
    assert_eq!(events[0].detail.outcome.message.as_deref(), Some("Already registered"));
    assert_eq!(form.invalid(), [email]);
    assert_eq!(invalid_of(&mut form, &doc, "account"), [email]);

    // Same map again: nothing changed, nothing re-checked.
    form.set_validity(&mut doc, [("email", "Already registered")]).unwrap();
    assert!(drain(&mut doc).is_empty());

    // Dropping the entry clears the error.
    form.set_validity(&mut doc, Vec::<(String, String)>::new()).unwrap();
    let events = drain(&mut doc);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, "valid");
    assert!(form.invalid().is_empty());
    assert!(invalid_of(&mut form, &doc, "account").is_empty());
}

#[test]
fn test_set_validity_ignores_natively_invalid_fields() {
    let mut doc = account_form();
    let mut form = form_validator(&doc);
    form.set_validity(&mut doc, [("bio", "Too vague")]).unwrap();

    // Only `bio` changed; the natively invalid required fields are untouched.
    let targets: Vec<NodeId> = drain(&mut doc).into_iter().map(|e| e.target).collect();
    assert_eq!(targets, [node(&doc, "bio")]);
}

#[test]
fn test_set_validity_from_json() {
    let mut doc = filled_form();
    let mut form = form_validator(&doc);

    form.set_validity_json(&mut doc, r#"{"first": "Use your legal name"}"#)
        .unwrap();
    assert_eq!(form.invalid(), [node(&doc, "first")]);
    assert_eq!(invalid_of(&mut form, &doc, "names"), [node(&doc, "first")]);

    let err = form.set_validity_json(&mut doc, r#"["first"]"#).unwrap_err();
    assert!(matches!(err, ValidityError::ErrorMap(_)));
}

#[test]
fn test_injected_error_goes_stale_on_edit() {
    let mut doc = filled_form();
    let mut form = form_validator(&doc);
    let email = node(&doc, "email");

    form.set_validity(&mut doc, [("email", "Already registered")]).unwrap();
    assert!(!form.check_validity(&mut doc, None).unwrap());
    assert_eq!(doc.validation_message(email), "Already registered");

    doc.set_value(email, "grace@example.com");
    drain(&mut doc);
    assert!(form.check_validity(&mut doc, None).unwrap());
    assert_eq!(doc.validation_message(email), "");

    let email_event = drain(&mut doc).into_iter().find(|e| e.target == email).unwrap();
    assert!(email_event.detail.outcome.is_valid());
    assert!(email_event.detail.outcome.was_previously_invalid);
    assert!(form.history().is_empty());
}
