// src/variables.rs

//! Variable generation
//!
//! Maps the resolved option set plus build settings to the flat key-value
//! variable set handed to the underlying native build system. This is where
//! platform-exclusive option values are validated and "use the platform
//! default" sentinels are replaced by concrete values inferred from the os.

use crate::error::{Error, Result};
use crate::options::{OptionValue, ResolvedOptions};
use crate::settings::{Os, Settings};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A generated variable value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    Bool(bool),
    Text(String),
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Text(t) => write!(f, "{}", t),
        }
    }
}

/// The flat variable set consumed by the downstream build system
///
/// A sorted map so repeated resolutions print and serialize identically.
pub type VariableSet = BTreeMap<String, VariableValue>;

/// Declarative rule mapping one resolved option to one output variable
///
/// Booleans forward as-is; enumerated values forward as text after passing
/// their platform gate; a value equal to `default_sentinel` is replaced by
/// the concrete value the `infer` table declares for the current os.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableMapping {
    /// Resolved option this rule reads
    pub option: String,

    /// Output variable this rule writes
    pub variable: String,

    /// Enumerated value meaning "use the platform default"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sentinel: Option<String>,

    /// Concrete default per operating system, consulted for the sentinel
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub infer: BTreeMap<Os, String>,

    /// Platform gates: enumerated value to the os set it is valid on
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub only_on: BTreeMap<String, Vec<Os>>,
}

impl VariableMapping {
    /// A plain forward of one option into one variable
    pub fn forward(option: impl Into<String>, variable: impl Into<String>) -> Self {
        Self {
            option: option.into(),
            variable: variable.into(),
            default_sentinel: None,
            infer: BTreeMap::new(),
            only_on: BTreeMap::new(),
        }
    }
}

/// Generate the variable set from resolved options and settings
///
/// Pure and deterministic: no environment reads, no randomness. Options that
/// resolved to `Unset` produce no variable. The platform gate is checked on
/// the final emitted value, so it covers both explicitly chosen and inferred
/// values.
pub fn generate_variables(
    mappings: &[VariableMapping],
    options: &ResolvedOptions,
    settings: &Settings,
) -> Result<VariableSet> {
    let mut variables = VariableSet::new();

    for mapping in mappings {
        let value = options
            .get(&mapping.option)
            .ok_or_else(|| Error::UnknownOption {
                option: mapping.option.clone(),
            })?;

        let emitted = match value {
            OptionValue::Unset => continue,
            OptionValue::Bool(b) => VariableValue::Bool(*b),
            OptionValue::Choice(chosen) => {
                let concrete = if mapping.default_sentinel.as_deref() == Some(chosen.as_str()) {
                    mapping.infer.get(&settings.os).cloned().ok_or_else(|| {
                        Error::UnsupportedPlatform {
                            what: format!("default for option '{}'", mapping.option),
                            os: settings.os.to_string(),
                        }
                    })?
                } else {
                    chosen.clone()
                };

                if let Some(allowed) = mapping.only_on.get(&concrete) {
                    if !allowed.contains(&settings.os) {
                        return Err(Error::PlatformIncompatibleOption {
                            option: mapping.option.clone(),
                            value: concrete,
                            os: settings.os.to_string(),
                        });
                    }
                }

                VariableValue::Text(concrete)
            }
        };

        variables.insert(mapping.variable.clone(), emitted);
    }

    Ok(variables)
}
