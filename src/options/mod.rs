// src/options/mod.rs

//! Option schema and resolution
//!
//! Options are the named, domain-constrained build toggles a recipe exposes.
//! Each option declares a domain (boolean or enumerated set) and a default;
//! resolution applies user overrides and then the recipe's declarative
//! removal rules to produce a conflict-free resolved set.

mod resolver;

pub use resolver::resolve_options;

use crate::error::{Error, Result};
use crate::settings::Os;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The set of values an option may take
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionDomain {
    /// true or false
    Boolean,
    /// One of a fixed set of string values
    Enumerated(Vec<String>),
}

impl OptionDomain {
    /// Parse a raw string value against this domain
    pub fn parse_value(&self, option: &str, raw: &str) -> Result<OptionValue> {
        match self {
            Self::Boolean => match raw {
                "true" | "True" => Ok(OptionValue::Bool(true)),
                "false" | "False" => Ok(OptionValue::Bool(false)),
                _ => Err(self.invalid_value(option, raw)),
            },
            Self::Enumerated(allowed) => {
                if allowed.iter().any(|a| a == raw) {
                    Ok(OptionValue::Choice(raw.to_string()))
                } else {
                    Err(self.invalid_value(option, raw))
                }
            }
        }
    }

    /// Check that an already-typed value belongs to this domain
    pub fn contains(&self, value: &OptionValue) -> bool {
        match (self, value) {
            (_, OptionValue::Unset) => true,
            (Self::Boolean, OptionValue::Bool(_)) => true,
            (Self::Enumerated(allowed), OptionValue::Choice(v)) => {
                allowed.iter().any(|a| a == v)
            }
            _ => false,
        }
    }

    fn invalid_value(&self, option: &str, raw: &str) -> Error {
        Error::InvalidOptionValue {
            option: option.to_string(),
            value: raw.to_string(),
            domain: self.to_string(),
        }
    }
}

impl fmt::Display for OptionDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "true, false"),
            Self::Enumerated(allowed) => write!(f, "{}", allowed.join(", ")),
        }
    }
}

/// A resolved option value
///
/// `Unset` means the option was removed by a rule and is not applicable to
/// this resolution (never that it is merely missing a value).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Choice(String),
    Unset,
}

impl OptionValue {
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// True exactly when the value is `Bool(true)`
    pub fn is_true(&self) -> bool {
        matches!(self, Self::Bool(true))
    }

    pub fn as_choice(&self) -> Option<&str> {
        match self {
            Self::Choice(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Choice(v) => write!(f, "{}", v),
            Self::Unset => write!(f, "<unset>"),
        }
    }
}

/// A single option declaration: name, domain, default
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDecl {
    pub name: String,
    pub domain: OptionDomain,
    pub default: OptionValue,
}

impl OptionDecl {
    /// Declare a boolean option
    pub fn boolean(name: impl Into<String>, default: bool) -> Self {
        Self {
            name: name.into(),
            domain: OptionDomain::Boolean,
            default: OptionValue::Bool(default),
        }
    }

    /// Declare an enumerated option
    pub fn enumerated(
        name: impl Into<String>,
        allowed: impl IntoIterator<Item = impl Into<String>>,
        default: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            domain: OptionDomain::Enumerated(allowed.into_iter().map(Into::into).collect()),
            default: OptionValue::Choice(default.into()),
        }
    }
}

/// The full option schema of a recipe, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSchema {
    decls: Vec<OptionDecl>,
}

impl OptionSchema {
    pub fn new(decls: Vec<OptionDecl>) -> Result<Self> {
        for decl in &decls {
            if !decl.domain.contains(&decl.default) {
                return Err(Error::InvalidOptionValue {
                    option: decl.name.clone(),
                    value: decl.default.to_string(),
                    domain: decl.domain.to_string(),
                });
            }
        }
        Ok(Self { decls })
    }

    pub fn get(&self, name: &str) -> Option<&OptionDecl> {
        self.decls.iter().find(|d| d.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionDecl> {
        self.decls.iter()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

/// Declarative rules that remove (unset) options during resolution
///
/// Platform rules always run before choice rules. Choice rules are applied in
/// a single fixed pass: no removal rule may depend on the outcome of another,
/// so no fixed-point iteration is needed. Any extension that introduces
/// transitive removal chains must revisit this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalRule {
    /// Unset `option` when resolving for `os`
    Platform { os: Os, option: String },
    /// Unset `option` when the boolean option `when_true` resolves to true
    Choice { when_true: String, option: String },
}

impl RemovalRule {
    /// The option this rule removes
    pub fn target(&self) -> &str {
        match self {
            Self::Platform { option, .. } | Self::Choice { option, .. } => option,
        }
    }
}

/// The resolved, conflict-free option set
///
/// Immutable once produced; preserves schema declaration order so repeated
/// resolutions of identical inputs yield byte-identical output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    values: Vec<(String, OptionValue)>,
}

impl ResolvedOptions {
    pub(crate) fn new(values: Vec<(String, OptionValue)>) -> Self {
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// True exactly when `name` resolved to `Bool(true)`
    pub fn is_true(&self, name: &str) -> bool {
        self.get(name).is_some_and(OptionValue::is_true)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for ResolvedOptions {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
