// src/requirements.rs

//! Requirement specification and resolution
//!
//! A recipe declares a static list of requirement specs; each spec may carry
//! a condition over the resolved options ("only when use_xdp is true").
//! Resolution filters the list against the resolved options, preserving
//! declaration order, and rejects version conflicts up front.

use crate::error::{Error, Result};
use crate::options::{OptionValue, ResolvedOptions};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A predicate over resolved boolean options
///
/// Written as the option name with an optional `!` prefix, e.g. `use_xdp`
/// or `!enable_logging`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Condition {
    pub option: String,
    pub negated: bool,
}

impl Condition {
    /// Parse a condition string like `use_xdp` or `!use_xdp`
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let (negated, name) = match s.strip_prefix('!') {
            Some(rest) => (true, rest.trim()),
            None => (false, s),
        };
        if name.is_empty() {
            return Err(Error::ParseError("Empty requirement condition".to_string()));
        }
        Ok(Self {
            option: name.to_string(),
            negated,
        })
    }

    /// Evaluate against resolved options
    ///
    /// The named option must exist and be boolean; an unset option never
    /// satisfies the condition positively (a removed toggle cannot enable a
    /// dependency).
    pub fn evaluate(&self, options: &ResolvedOptions) -> Result<bool> {
        let value = options.get(&self.option).ok_or_else(|| Error::UnknownOption {
            option: self.option.clone(),
        })?;
        let truth = match value {
            OptionValue::Bool(b) => *b,
            OptionValue::Unset => false,
            OptionValue::Choice(v) => {
                return Err(Error::InvalidOptionValue {
                    option: self.option.clone(),
                    value: v.clone(),
                    domain: "true, false".to_string(),
                });
            }
        };
        Ok(truth != self.negated)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", if self.negated { "!" } else { "" }, self.option)
    }
}

impl TryFrom<String> for Condition {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Condition::parse(&s)
    }
}

impl From<Condition> for String {
    fn from(c: Condition) -> Self {
        c.to_string()
    }
}

/// A declared dependency, optionally conditioned on resolved options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementSpec {
    pub package: String,
    pub version: Version,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<Condition>,
}

impl RequirementSpec {
    /// An unconditional requirement
    pub fn new(package: impl Into<String>, version: Version) -> Self {
        Self {
            package: package.into(),
            version,
            when: None,
        }
    }

    /// A requirement gated on a condition
    pub fn when(package: impl Into<String>, version: Version, condition: Condition) -> Self {
        Self {
            package: package.into(),
            version,
            when: Some(condition),
        }
    }
}

/// A concrete resolved dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub package: String,
    pub version: Version,
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.package, self.version)
    }
}

/// Expand requirement specs against the resolved options
///
/// Output keeps declaration order: conditional entries that pass stay at
/// their declared position, never reordered by condition outcome. The same
/// package declared twice at the same version collapses to its first
/// occurrence; two different versions of one package are a hard conflict.
pub fn resolve_requirements(
    specs: &[RequirementSpec],
    options: &ResolvedOptions,
) -> Result<Vec<Requirement>> {
    let mut resolved: Vec<Requirement> = Vec::with_capacity(specs.len());

    for spec in specs {
        if let Some(condition) = &spec.when {
            if !condition.evaluate(options)? {
                continue;
            }
        }

        if let Some(existing) = resolved.iter().find(|r| r.package == spec.package) {
            if existing.version == spec.version {
                continue;
            }
            return Err(Error::ConflictingRequirement {
                package: spec.package.clone(),
                first: existing.version.to_string(),
                second: spec.version.to_string(),
            });
        }

        resolved.push(Requirement {
            package: spec.package.clone(),
            version: spec.version.clone(),
        });
    }

    Ok(resolved)
}
