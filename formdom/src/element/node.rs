use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::Tag;
use crate::validity::Constraints;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn generate_id(prefix: &str) -> String {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id}")
}

#[derive(Debug, Clone)]
pub struct Element {
    // Identity
    pub id: String,
    pub tag: Tag,
    pub name: String,
    pub classes: Vec<String>,

    // Control state
    /// The `type` attribute. Empty means the tag's default.
    pub input_type: String,
    pub value: String,
    pub disabled: bool,
    pub required: bool,
    pub readonly: bool,

    // Declared constraints
    pub constraints: Constraints,

    // Any other attribute, available to selectors
    pub attrs: HashMap<String, String>,

    pub children: Vec<Element>,
}

impl Element {
    fn new(tag: Tag) -> Self {
        Self {
            id: generate_id(tag.as_str()),
            tag,
            name: String::new(),
            classes: Vec::new(),
            input_type: String::new(),
            value: String::new(),
            disabled: false,
            required: false,
            readonly: false,
            constraints: Constraints::default(),
            attrs: HashMap::new(),
            children: Vec::new(),
        }
    }

    pub fn form() -> Self {
        Self::new(Tag::Form)
    }

    pub fn fieldset() -> Self {
        Self::new(Tag::Fieldset)
    }

    pub fn div() -> Self {
        Self::new(Tag::Div)
    }

    /// Create a text input with the given `name`.
    pub fn input(name: impl Into<String>) -> Self {
        Self::new(Tag::Input).name(name)
    }

    pub fn textarea(name: impl Into<String>) -> Self {
        Self::new(Tag::Textarea).name(name)
    }

    pub fn select(name: impl Into<String>) -> Self {
        Self::new(Tag::Select).name(name)
    }

    /// Create a `<button>`; without an explicit type it submits.
    pub fn button() -> Self {
        Self::new(Tag::Button)
    }

    /// Create an `<input type="submit">`.
    pub fn submit() -> Self {
        Self::new(Tag::Input).input_type("submit")
    }

    // Identity
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    // Control state
    pub fn input_type(mut self, input_type: impl Into<String>) -> Self {
        self.input_type = input_type.into();
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    // Constraints
    pub fn min_length(mut self, min_length: usize) -> Self {
        self.constraints.min_length = Some(min_length);
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.constraints.max_length = Some(max_length);
        self
    }

    /// Set the `pattern` attribute. The pattern must match the whole value.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.constraints.pattern = Some(pattern.into());
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.constraints.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.constraints.max = Some(max);
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.constraints.step = Some(step);
        self
    }

    // Attributes
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn get_attr(&self, key: &str) -> Option<&String> {
        self.attrs.get(key)
    }

    /// Resolved `type`, falling back to the tag's default the way the DOM
    /// `type` property does.
    pub fn effective_type(&self) -> &str {
        match self.tag {
            Tag::Input if self.input_type.is_empty() => "text",
            Tag::Button if self.input_type.is_empty() => "submit",
            Tag::Input | Tag::Button => self.input_type.as_str(),
            Tag::Textarea => "textarea",
            Tag::Select => "select-one",
            Tag::Fieldset => "fieldset",
            Tag::Form | Tag::Div => "",
        }
    }

    /// Attribute value as seen by selectors. Boolean attributes are present
    /// with an empty value when set.
    pub fn attribute(&self, key: &str) -> Option<String> {
        let flag = |on: bool| on.then(String::new);
        match key {
            "id" => Some(self.id.clone()),
            "name" => Some(self.name.clone()).filter(|n| !n.is_empty()),
            "class" => Some(self.classes.join(" ")).filter(|c| !c.is_empty()),
            "type" => Some(self.effective_type().to_string()).filter(|t| !t.is_empty()),
            "value" => Some(self.value.clone()),
            "required" => flag(self.required),
            "disabled" => flag(self.disabled),
            "readonly" => flag(self.readonly),
            "pattern" => self.constraints.pattern.clone(),
            "minlength" => self.constraints.min_length.map(|v| v.to_string()),
            "maxlength" => self.constraints.max_length.map(|v| v.to_string()),
            _ => self.attrs.get(key).cloned(),
        }
    }

    // Children
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, new_children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(new_children);
        self
    }
}
