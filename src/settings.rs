// src/settings.rs

//! Build settings context
//!
//! Settings are the immutable four-axis build context (os, compiler,
//! build_type, arch) supplied once per resolution. Only the operating system
//! is interpreted by the resolution engine; the other three axes flow through
//! opaquely to downstream consumers.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumString};

/// Operating systems the engine knows how to resolve for
///
/// Keeping this a closed enum makes default-inference tables checkable at
/// recipe validation time: a table covering every variant is total.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum Os {
    Windows,
    Linux,
    Macos,
    FreeBsd,
    Android,
}

impl Os {
    /// Parse an operating system name
    ///
    /// Unrecognized names are an `UnsupportedPlatform` error rather than a
    /// plain parse failure: there is no resolution rule that could apply to
    /// an os the engine has never heard of.
    pub fn parse(s: &str) -> Result<Self> {
        s.parse().map_err(|_| Error::UnsupportedPlatform {
            what: "resolution rules".to_string(),
            os: s.to_string(),
        })
    }
}

/// The immutable build axis for one recipe resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub os: Os,
    pub compiler: String,
    pub build_type: String,
    pub arch: String,
}

impl Settings {
    pub fn new(
        os: Os,
        compiler: impl Into<String>,
        build_type: impl Into<String>,
        arch: impl Into<String>,
    ) -> Self {
        Self {
            os,
            compiler: compiler.into(),
            build_type: build_type.into(),
            arch: arch.into(),
        }
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "os={} compiler={} build_type={} arch={}",
            self.os, self.compiler, self.build_type, self.arch
        )
    }
}
