use std::cell::RefCell;
use std::rc::Rc;

use formdom::{find_element, CustomEvent, Document, Element, FormDom, ScopeKind, Tag};

fn signup() -> Element {
    Element::form()
        .id("signup")
        .child(
            Element::fieldset()
                .id("account")
                .child(Element::input("email").id("email").input_type("email"))
                .child(Element::input("password").id("password").input_type("password")),
        )
        .child(
            Element::div()
                .id("extra")
                .child(Element::textarea("bio").id("bio"))
                .child(Element::select("country").id("country")),
        )
        .child(Element::input("token").id("token").input_type("hidden"))
        .child(Element::submit().id("go"))
}

// ============================================================================
// Tree
// ============================================================================

#[test]
fn test_nodes_are_in_document_order() {
    let doc = Document::new(signup());
    let ids: Vec<&str> = doc
        .descendants(doc.root())
        .into_iter()
        .map(|n| doc.element(n).id.as_str())
        .collect();
    assert_eq!(
        ids,
        ["account", "email", "password", "extra", "bio", "country", "token", "go"]
    );
}

#[test]
fn test_lookup_and_navigation() {
    let doc = Document::new(signup());
    let email = doc.by_id("email").unwrap();
    let account = doc.by_id("account").unwrap();

    assert_eq!(doc.by_name("email"), Some(email));
    assert_eq!(doc.parent(email), Some(account));
    assert_eq!(doc.ancestors(email).collect::<Vec<_>>(), [account, doc.root()]);
    assert_eq!(doc.closest_fieldset(email), Some(account));
    assert_eq!(doc.closest_fieldset(account), None);
    assert!(doc.contains(doc.root(), email));
    assert!(doc.contains(email, email));
    assert!(!doc.contains(email, account));
    assert!(find_element(&signup(), "bio").is_some_and(|e| e.tag == Tag::Textarea));
}

#[test]
fn test_selectors_are_parsed_once() {
    let doc = Document::new(signup());
    let email = doc.by_id("email").unwrap();

    assert_eq!(doc.query_all("input").len(), 4);
    assert!(doc.matches(email, "input"));
    assert!(doc.matches(email, "input"));
    assert_eq!(doc.parsed_selectors(), 1);

    // A broken selector is remembered too and keeps failing.
    assert!(!doc.matches(email, "input["));
    assert!(doc.query_all("input[").is_empty());
    assert_eq!(doc.parsed_selectors(), 2);
}

#[test]
fn test_scope_kinds() {
    let doc = Document::new(signup());
    assert_eq!(doc.scope_kind(doc.root()), ScopeKind::Form);
    assert_eq!(doc.scope_kind(doc.by_id("account").unwrap()), ScopeKind::Fieldset);
    assert_eq!(doc.scope_kind(doc.by_id("bio").unwrap()), ScopeKind::Field);
    assert_eq!(doc.scope_kind(doc.by_id("extra").unwrap()), ScopeKind::Field);
}

#[test]
fn test_elements_collection() {
    let doc = Document::new(signup());
    let names = |nodes: Vec<_>| -> Vec<String> {
        nodes.into_iter().map(|n| doc.element(n).id.clone()).collect()
    };

    assert_eq!(
        names(doc.elements(doc.root())),
        ["account", "email", "password", "bio", "country", "token", "go"]
    );
    assert_eq!(
        names(doc.elements(doc.by_id("account").unwrap())),
        ["email", "password"]
    );
    // Plain containers fall back to input/textarea/select descendants.
    assert_eq!(names(doc.elements(doc.by_id("extra").unwrap())), ["bio", "country"]);
    assert_eq!(names(doc.fieldsets(doc.root())), ["account"]);
}

#[test]
fn test_will_validate() {
    let mut doc = Document::new(signup());
    let will = |doc: &Document, id: &str| doc.will_validate(doc.by_id(id).unwrap());

    assert!(will(&doc, "email"));
    assert!(will(&doc, "go"));
    assert!(!will(&doc, "token"));
    assert!(!will(&doc, "account"));
    assert!(!will(&doc, "signup"));

    let account = doc.by_id("account").unwrap();
    doc.set_disabled(account, true);
    assert!(!will(&doc, "email"));
    assert!(doc.is_disabled(doc.by_id("password").unwrap()));
    assert!(will(&doc, "bio"));
}

#[test]
fn test_input_type_defaults() {
    let doc = Document::new(
        Element::form()
            .child(Element::input("a").id("a"))
            .child(Element::button().id("b"))
            .child(Element::select("c").id("c")),
    );
    assert_eq!(doc.input_type(doc.by_id("a").unwrap()), "text");
    assert_eq!(doc.input_type(doc.by_id("b").unwrap()), "submit");
    assert_eq!(doc.input_type(doc.by_id("c").unwrap()), "select-one");
}

// ============================================================================
// Events
// ============================================================================

#[test]
fn test_dispatch_bubbles_target_first() {
    let mut doc = Document::new(signup());
    let email = doc.by_id("email").unwrap();
    let account = doc.by_id("account").unwrap();
    let root = doc.root();

    let seen = Rc::new(RefCell::new(Vec::new()));
    for node in [root, account, email] {
        let seen = Rc::clone(&seen);
        doc.add_listener(node, "invalid", move |ev, current| {
            seen.borrow_mut().push((ev.target, current));
        });
    }

    doc.dispatch(email, CustomEvent::new("invalid").bubbles(true));
    assert_eq!(
        *seen.borrow(),
        [(email, email), (email, account), (email, root)]
    );
    assert_eq!(doc.events().len(), 1);
}

#[test]
fn test_dispatch_without_bubbling_and_type_filter() {
    let mut doc = Document::new(signup());
    let email = doc.by_id("email").unwrap();
    let root = doc.root();

    let count = Rc::new(RefCell::new(0));
    {
        let count = Rc::clone(&count);
        doc.add_listener(root, "valid", move |_, _| *count.borrow_mut() += 1);
    }

    doc.dispatch(email, CustomEvent::new("valid"));
    doc.dispatch(email, CustomEvent::new("invalid").bubbles(true));
    assert_eq!(*count.borrow(), 0);

    doc.dispatch(email, CustomEvent::new("valid").bubbles(true));
    assert_eq!(*count.borrow(), 1);

    let events = doc.take_events();
    assert_eq!(events.len(), 3);
    assert!(doc.events().is_empty());
}
