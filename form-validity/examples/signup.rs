use std::fs::File;

use form_validity::{CustomRule, FormValidator, ValidatorConfig, ValidityEvent};
use formdom::{Document, Element, NodeId};
use simplelog::{Config, LevelFilter, WriteLogger};

fn build() -> Element {
    Element::form().id("signup").children(vec![
        Element::fieldset().id("account").children(vec![
            Element::input("email").input_type("email").required(true),
            Element::input("password")
                .input_type("password")
                .required(true)
                .min_length(8),
        ]),
        Element::fieldset().id("profile").children(vec![
            Element::input("username").class("handle").required(true),
            Element::input("country"),
        ]),
        Element::submit(),
    ])
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set up file logging
    let log_file = File::create("signup.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let mut doc = Document::new(build());
    let form = doc.root();

    // Print every validity event as it bubbles through the form.
    doc.add_listener(form, "invalid", |dispatched, _| {
        if let Some(event) = ValidityEvent::<NodeId>::from_event(&dispatched.event) {
            println!(
                "  invalid {:?}: {} {:?}",
                dispatched.target,
                event.outcome.state,
                event.outcome.message.unwrap_or_default()
            );
        }
    });

    let config = ValidatorConfig::new()
        .rule(
            CustomRule::pattern(".handle", "^[a-z0-9_]+$")?
                .message("Lowercase letters, digits and _ only"),
        )
        .rule(CustomRule::one_of("[name=country]", ["NL", "BE", "DE"]));
    let mut validator = FormValidator::new(&doc, form, config)?;

    println!("empty form:");
    validator.check_validity(&mut doc, None)?;

    for (name, value) in [
        ("email", "ada@example.com"),
        ("password", "correct horse"),
        ("username", "Ada Lovelace"),
        ("country", "FR"),
    ] {
        if let Some(node) = doc.by_name(name) {
            doc.set_value(node, value);
        }
    }
    println!("filled in:");
    validator.check_validity(&mut doc, None)?;

    if let Some(node) = doc.by_name("username") {
        doc.set_value(node, "ada");
    }
    if let Some(node) = doc.by_name("country") {
        doc.set_value(node, "NL");
    }
    println!("fixed:");
    let valid = validator.check_validity(&mut doc, None)?;
    println!("  form valid: {valid}");

    println!("server response:");
    validator.set_validity_json(&mut doc, r#"{"email": "Already registered"}"#)?;

    for fieldset in validator.fieldsets(&doc) {
        println!(
            "  fieldset {:?}: {} invalid",
            fieldset.element(),
            fieldset.invalid().len()
        );
    }

    Ok(())
}
