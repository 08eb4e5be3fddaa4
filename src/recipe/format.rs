// src/recipe/format.rs

//! Recipe file format definitions
//!
//! Recipes are TOML files describing one buildable unit: its option schema,
//! removal rules, requirement specs, and variable mappings. Options, rules,
//! requirements and mappings are arrays of tables so declaration order
//! survives parsing.

use crate::error::{Error, Result};
use crate::options::{OptionDecl, OptionDomain, OptionSchema, OptionValue, RemovalRule};
use crate::recipe::Recipe;
use crate::requirements::{Condition, RequirementSpec};
use crate::settings::Os;
use crate::variables::VariableMapping;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A recipe document as written on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDoc {
    /// Package metadata
    pub package: PackageSection,

    /// Option declarations, in order
    #[serde(default)]
    pub options: Vec<OptionEntry>,

    /// Option removal rules
    #[serde(default)]
    pub rules: Vec<RuleEntry>,

    /// Requirement specs, in order
    #[serde(default)]
    pub requires: Vec<RequireEntry>,

    /// Variable mapping rules
    #[serde(default)]
    pub variables: Vec<VariableEntry>,
}

/// Package metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSection {
    /// Package name
    pub name: String,

    /// Package version
    pub version: String,

    /// Short description
    #[serde(default)]
    pub description: Option<String>,

    /// License identifier
    #[serde(default)]
    pub license: Option<String>,

    /// Upstream URL
    #[serde(default)]
    pub url: Option<String>,
}

/// One option declaration
///
/// An entry with `values` declares an enumerated option; without, a boolean.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionEntry {
    pub name: String,

    /// Allowed values for an enumerated option
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,

    /// Default value (bool for boolean options, string for enumerated)
    pub default: OptionValue,
}

/// One removal rule: exactly one of `when_os` / `when_true` must be set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleEntry {
    /// Option to unset when the rule fires
    pub option: String,

    /// Fire when resolving for this operating system
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_os: Option<String>,

    /// Fire when this boolean option resolves to true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_true: Option<String>,
}

/// One requirement spec
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequireEntry {
    pub package: String,
    pub version: String,

    /// Condition string, e.g. `use_xdp` or `!enable_logging`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,
}

/// One variable mapping rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableEntry {
    /// Resolved option to read
    pub option: String,

    /// Output variable to write
    pub variable: String,

    /// Enumerated value meaning "use the platform default"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Inferred concrete default per os name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub infer: BTreeMap<String, String>,

    /// Platform gates: value to the os names it is valid on
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub only_on: BTreeMap<String, Vec<String>>,
}

impl RecipeDoc {
    /// Convert the on-disk document into a validated `Recipe`
    pub fn into_recipe(self) -> Result<Recipe> {
        let decls = self
            .options
            .into_iter()
            .map(|entry| {
                let domain = match entry.values {
                    Some(values) => OptionDomain::Enumerated(values),
                    None => OptionDomain::Boolean,
                };
                OptionDecl {
                    name: entry.name,
                    domain,
                    default: entry.default,
                }
            })
            .collect();
        let options = OptionSchema::new(decls)?;

        let rules = self
            .rules
            .into_iter()
            .map(|entry| entry.into_rule())
            .collect::<Result<Vec<_>>>()?;

        let requires = self
            .requires
            .into_iter()
            .map(|entry| entry.into_spec())
            .collect::<Result<Vec<_>>>()?;

        let variables = self
            .variables
            .into_iter()
            .map(|entry| entry.into_mapping())
            .collect::<Result<Vec<_>>>()?;

        Ok(Recipe {
            name: self.package.name,
            version: self.package.version,
            description: self.package.description,
            license: self.package.license,
            url: self.package.url,
            options,
            rules,
            requires,
            variables,
        })
    }
}

impl RuleEntry {
    fn into_rule(self) -> Result<RemovalRule> {
        match (self.when_os, self.when_true) {
            (Some(os), None) => Ok(RemovalRule::Platform {
                os: Os::parse(&os)?,
                option: self.option,
            }),
            (None, Some(when_true)) => Ok(RemovalRule::Choice {
                when_true,
                option: self.option,
            }),
            _ => Err(Error::ParseError(format!(
                "Rule for option '{}' must set exactly one of when_os, when_true",
                self.option
            ))),
        }
    }
}

impl RequireEntry {
    fn into_spec(self) -> Result<RequirementSpec> {
        let version = Version::parse(&self.version).map_err(|e| {
            Error::ParseError(format!(
                "Invalid version '{}' for requirement '{}': {}",
                self.version, self.package, e
            ))
        })?;
        let when = self.when.as_deref().map(Condition::parse).transpose()?;
        Ok(RequirementSpec {
            package: self.package,
            version,
            when,
        })
    }
}

impl VariableEntry {
    fn into_mapping(self) -> Result<VariableMapping> {
        let mut infer = BTreeMap::new();
        for (os, value) in self.infer {
            infer.insert(Os::parse(&os)?, value);
        }

        let mut only_on = BTreeMap::new();
        for (value, os_names) in self.only_on {
            let allowed = os_names
                .iter()
                .map(|os| Os::parse(os))
                .collect::<Result<Vec<_>>>()?;
            only_on.insert(value, allowed);
        }

        Ok(VariableMapping {
            option: self.option,
            variable: self.variable,
            default_sentinel: self.default,
            infer,
            only_on,
        })
    }
}
