// src/error.rs

//! Crate-wide error type for recipe resolution
//!
//! Every resolver returns `Result`; resolution halts at the first error in
//! pipeline order (options, requirements, variables) and reports exactly one
//! error carrying the offending field so the caller can correct the input and
//! retry the whole resolution.

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while resolving a recipe
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// An override or rule references an option absent from the schema
    #[error("Unknown option '{option}'")]
    UnknownOption { option: String },

    /// A value falls outside the option's declared domain
    #[error("Invalid value '{value}' for option '{option}' (allowed: {domain})")]
    InvalidOptionValue {
        option: String,
        value: String,
        domain: String,
    },

    /// The same package is requested at two different versions
    #[error("Conflicting requirement for package '{package}': {first} vs {second}")]
    ConflictingRequirement {
        package: String,
        first: String,
        second: String,
    },

    /// A resolved option value is not valid for the current settings
    #[error("Option '{option}' value '{value}' is not supported on {os}")]
    PlatformIncompatibleOption {
        option: String,
        value: String,
        os: String,
    },

    /// Default inference has no rule for the given operating system
    #[error("No {what} for unsupported platform '{os}'")]
    UnsupportedPlatform { what: String, os: String },

    /// Recipe description could not be parsed or fails structural validation
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Recipe file could not be read
    #[error("IO error: {0}")]
    IoError(String),
}
