//! A small CSS selector engine covering what form rules need.
//!
//! Supported: selector lists (`a, b`), type and universal selectors, `#id`,
//! `.class`, `[attr]`, `[attr=value]`, `:required`, `:optional`, `:disabled`,
//! `:enabled`, and the descendant and child (`>`) combinators.

use thiserror::Error;

use crate::document::{Document, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected '{ch}' at offset {offset}")]
    Unexpected { ch: char, offset: usize },
    #[error("expected identifier at offset {0}")]
    ExpectedIdent(usize),
    #[error("unterminated attribute selector starting at offset {0}")]
    UnterminatedAttribute(usize),
    #[error("unsupported pseudo-class ':{0}'")]
    UnknownPseudo(String),
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

/// Compound selectors left to right; each carries the combinator that links
/// it to the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    parts: Vec<(Combinator, Compound)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
    pseudos: Vec<Pseudo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pseudo {
    Required,
    Optional,
    Disabled,
    Enabled,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        Parser::new(input).parse_list()
    }

    /// Test whether `node` matches any selector of the list.
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.alternatives
            .iter()
            .any(|complex| complex.matches_at(complex.parts.len() - 1, doc, node))
    }
}

impl std::str::FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Complex {
    fn matches_at(&self, idx: usize, doc: &Document, node: NodeId) -> bool {
        let (combinator, compound) = &self.parts[idx];
        if !compound.matches(doc, node) {
            return false;
        }
        if idx == 0 {
            return true;
        }

        match combinator {
            Combinator::Child => doc
                .parent(node)
                .is_some_and(|parent| self.matches_at(idx - 1, doc, parent)),
            Combinator::Descendant => doc
                .ancestors(node)
                .any(|ancestor| self.matches_at(idx - 1, doc, ancestor)),
        }
    }
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.ids.is_empty()
            && self.classes.is_empty()
            && self.attrs.is_empty()
            && self.pseudos.is_empty()
    }

    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let el = doc.element(node);

        if let Some(tag) = &self.tag {
            if tag != "*" && !tag.eq_ignore_ascii_case(el.tag.as_str()) {
                return false;
            }
        }
        if !self.ids.iter().all(|id| *id == el.id) {
            return false;
        }
        if !self.classes.iter().all(|c| el.classes.contains(c)) {
            return false;
        }

        let attrs_match = self.attrs.iter().all(|(name, expected)| {
            match (el.attribute(name), expected) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == *expected,
            }
        });
        if !attrs_match {
            return false;
        }

        self.pseudos.iter().all(|pseudo| match pseudo {
            Pseudo::Required => el.required,
            Pseudo::Optional => el.tag.is_control() && !el.required,
            Pseudo::Disabled => doc.is_disabled(node),
            Pseudo::Enabled => el.tag.is_listed() && !doc.is_disabled(node),
        })
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Skip whitespace, returning whether any was skipped.
    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(ch) => SelectorError::Unexpected {
                ch,
                offset: self.pos,
            },
            None => SelectorError::ExpectedIdent(self.pos),
        }
    }

    fn parse_list(&mut self) -> Result<Selector, SelectorError> {
        self.skip_ws();
        if self.peek().is_none() {
            return Err(SelectorError::Empty);
        }

        let mut alternatives = Vec::new();
        loop {
            self.skip_ws();
            alternatives.push(self.parse_complex()?);
            match self.peek() {
                None => break,
                Some(',') => self.pos += 1,
                Some(_) => return Err(self.unexpected()),
            }
        }

        Ok(Selector { alternatives })
    }

    fn parse_complex(&mut self) -> Result<Complex, SelectorError> {
        let mut parts = Vec::new();
        let mut combinator = Combinator::Descendant;

        loop {
            let compound = self.parse_compound()?;
            if compound.is_empty() {
                return Err(self.unexpected());
            }
            parts.push((combinator, compound));

            let had_ws = self.skip_ws();
            match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_ws();
                    combinator = Combinator::Child;
                }
                Some(_) if had_ws => combinator = Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            }
        }

        Ok(Complex { parts })
    }

    fn parse_compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();

        if self.peek() == Some('*') {
            self.pos += 1;
            compound.tag = Some("*".to_string());
        } else if self.peek().is_some_and(is_ident_char) {
            compound.tag = Some(self.ident()?.to_ascii_lowercase());
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.ids.push(self.ident()?);
                }
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.ident()?);
                }
                Some('[') => compound.attrs.push(self.attribute()?),
                Some(':') => {
                    self.pos += 1;
                    let name = self.ident()?;
                    let pseudo = match name.as_str() {
                        "required" => Pseudo::Required,
                        "optional" => Pseudo::Optional,
                        "disabled" => Pseudo::Disabled,
                        "enabled" => Pseudo::Enabled,
                        _ => return Err(SelectorError::UnknownPseudo(name)),
                    };
                    compound.pseudos.push(pseudo);
                }
                _ => break,
            }
        }

        Ok(compound)
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(SelectorError::ExpectedIdent(start));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn attribute(&mut self) -> Result<(String, Option<String>), SelectorError> {
        let start = self.pos;
        self.pos += 1; // '['
        self.skip_ws();
        let name = self.ident()?;
        self.skip_ws();

        let value = match self.peek() {
            Some(']') => None,
            Some('=') => {
                self.pos += 1;
                self.skip_ws();
                let value = match self.peek() {
                    Some(quote @ ('"' | '\'')) => {
                        self.pos += 1;
                        let value_start = self.pos;
                        while self.peek().is_some_and(|c| c != quote) {
                            self.pos += 1;
                        }
                        if self.peek().is_none() {
                            return Err(SelectorError::UnterminatedAttribute(start));
                        }
                        let value: String = self.chars[value_start..self.pos].iter().collect();
                        self.pos += 1;
                        value
                    }
                    _ => self.ident()?,
                };
                self.skip_ws();
                Some(value)
            }
            None => return Err(SelectorError::UnterminatedAttribute(start)),
            Some(_) => return Err(self.unexpected()),
        };

        if self.peek() != Some(']') {
            return Err(SelectorError::UnterminatedAttribute(start));
        }
        self.pos += 1;

        Ok((name, value))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}
