// src/lib.rs

//! Cauldron Recipe Resolver
//!
//! Declarative recipe-resolution engine for native-library builds. Given a
//! recipe's option schema, the target build settings, and conditional
//! dependency rules, it computes the effective conflict-free option set, the
//! concrete requirement list, and the variable set handed to the underlying
//! native build system.
//!
//! # Architecture
//!
//! - Recipes: TOML descriptions of one buildable unit (options, rules,
//!   requirements, variable mappings)
//! - Resolution: a pure pipeline of options, then requirements, then
//!   variables, over immutable inputs
//! - Settings: the four-axis build context (os, compiler, build_type, arch)
//!   supplied once per resolution
//!
//! Fetching sources, invoking toolchains, and packaging artifacts are
//! downstream consumers, not part of this crate.

mod error;
pub mod options;
pub mod recipe;
pub mod requirements;
pub mod settings;
pub mod variables;

pub use error::{Error, Result};
pub use options::{
    resolve_options, OptionDecl, OptionDomain, OptionSchema, OptionValue, RemovalRule,
    ResolvedOptions,
};
pub use recipe::{parse_recipe, parse_recipe_file, validate_recipe, Recipe, Resolution};
pub use requirements::{resolve_requirements, Condition, Requirement, RequirementSpec};
pub use settings::{Os, Settings};
pub use variables::{generate_variables, VariableMapping, VariableSet, VariableValue};
