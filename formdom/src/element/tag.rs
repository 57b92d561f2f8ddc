use std::fmt;

/// Element kinds understood by the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Form,
    Fieldset,
    Input,
    Textarea,
    Select,
    Button,
    /// Any non-form element used for grouping (`div`, `section`, ...).
    Div,
}

impl Tag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::Fieldset => "fieldset",
            Self::Input => "input",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Button => "button",
            Self::Div => "div",
        }
    }

    /// Elements that hold a value (`input`, `textarea`, `select`).
    pub fn is_control(self) -> bool {
        matches!(self, Self::Input | Self::Textarea | Self::Select)
    }

    /// Elements that show up in a form's `elements` collection.
    pub fn is_listed(self) -> bool {
        matches!(
            self,
            Self::Fieldset | Self::Input | Self::Textarea | Self::Select | Self::Button
        )
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
