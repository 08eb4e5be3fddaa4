// src/recipe/mod.rs

//! Recipe aggregate and resolution pipeline
//!
//! A `Recipe` is the complete declarative description of one buildable unit:
//! option schema, removal rules, requirement specs, and variable mappings.
//! Resolving it against a settings context runs options, then requirements,
//! then variables, halting at the first error.

pub mod format;
pub mod parser;

pub use format::RecipeDoc;
pub use parser::{parse_recipe, parse_recipe_file, validate_recipe};

use crate::error::Result;
use crate::options::{resolve_options, OptionSchema, RemovalRule, ResolvedOptions};
use crate::requirements::{resolve_requirements, Requirement, RequirementSpec};
use crate::settings::Settings;
use crate::variables::{generate_variables, VariableMapping, VariableSet};
use serde::Serialize;
use tracing::debug;

/// The complete declarative description of one buildable unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub license: Option<String>,
    pub url: Option<String>,

    pub options: OptionSchema,
    pub rules: Vec<RemovalRule>,
    pub requires: Vec<RequirementSpec>,
    pub variables: Vec<VariableMapping>,
}

/// The result of one recipe resolution
///
/// Immutable once produced; each field is consumed by a different downstream
/// collaborator (packaging metadata, dependency fetch, native build
/// invocation).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub options: ResolvedOptions,
    pub requirements: Vec<Requirement>,
    pub variables: VariableSet,
}

impl Recipe {
    /// Resolve this recipe against build settings and user overrides
    ///
    /// A pure function of its inputs: identical `(settings, overrides)`
    /// always yields an identical `Resolution`. On error the pipeline stops
    /// at the first failing stage and reports exactly that one error.
    pub fn resolve(
        &self,
        settings: &Settings,
        overrides: &[(String, String)],
    ) -> Result<Resolution> {
        debug!(recipe = %self.name, %settings, "resolving recipe");

        let options = resolve_options(&self.options, &self.rules, settings, overrides)?;
        let requirements = resolve_requirements(&self.requires, &options)?;
        let variables = generate_variables(&self.variables, &options, settings)?;

        debug!(
            recipe = %self.name,
            requirements = requirements.len(),
            variables = variables.len(),
            "recipe resolved"
        );

        Ok(Resolution {
            options,
            requirements,
            variables,
        })
    }
}
