// src/options/resolver.rs

//! Option resolution
//!
//! Pure function from (schema, rules, settings, overrides) to a new immutable
//! resolved set; recipe state is never mutated in place.

use crate::error::{Error, Result};
use crate::options::{OptionSchema, OptionValue, RemovalRule, ResolvedOptions};
use crate::settings::Settings;
use tracing::debug;

/// Resolve a recipe's options against build settings and user overrides
///
/// Steps, in fixed order:
/// 1. schema defaults, overlaid with `overrides` (unknown option name or a
///    value outside the option's domain is an error);
/// 2. platform removal rules, in declaration order;
/// 3. choice-driven removal rules, in declaration order, one pass.
///
/// Removing an option that is already unset (or that a rule names but the
/// schema never declared) is a no-op, so rules can be written for the widest
/// platform set without per-platform guards.
pub fn resolve_options(
    schema: &OptionSchema,
    rules: &[RemovalRule],
    settings: &Settings,
    overrides: &[(String, String)],
) -> Result<ResolvedOptions> {
    let mut values: Vec<(String, OptionValue)> = schema
        .iter()
        .map(|decl| (decl.name.clone(), decl.default.clone()))
        .collect();

    for (name, raw) in overrides {
        let decl = schema.get(name).ok_or_else(|| Error::UnknownOption {
            option: name.clone(),
        })?;
        let value = decl.domain.parse_value(name, raw)?;
        if let Some((_, slot)) = values.iter_mut().find(|(n, _)| n == name) {
            *slot = value;
        }
    }

    // Platform rules run before choice rules, so a choice rule never
    // observes an option a platform rule was about to remove.
    for rule in rules {
        if let RemovalRule::Platform { os, option } = rule {
            if *os == settings.os {
                unset(&mut values, option);
                debug!(option = %option, os = %settings.os, "option removed by platform rule");
            }
        }
    }

    for rule in rules {
        if let RemovalRule::Choice { when_true, option } = rule {
            let triggered = values
                .iter()
                .any(|(n, v)| n == when_true && v.is_true());
            if triggered {
                unset(&mut values, option);
                debug!(option = %option, trigger = %when_true, "option removed by choice rule");
            }
        }
    }

    Ok(ResolvedOptions::new(values))
}

fn unset(values: &mut [(String, OptionValue)], option: &str) {
    if let Some((_, v)) = values.iter_mut().find(|(n, _)| n == option) {
        *v = OptionValue::Unset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionDecl;
    use crate::settings::Os;

    fn schema() -> OptionSchema {
        OptionSchema::new(vec![
            OptionDecl::boolean("shared", true),
            OptionDecl::boolean("fPIC", true),
            OptionDecl::enumerated(
                "tls_library",
                ["openssl", "openssl3", "schannel", "default"],
                "default",
            ),
            OptionDecl::boolean("use_xdp", false),
        ])
        .unwrap()
    }

    fn rules() -> Vec<RemovalRule> {
        vec![
            RemovalRule::Platform {
                os: Os::Windows,
                option: "fPIC".to_string(),
            },
            RemovalRule::Choice {
                when_true: "shared".to_string(),
                option: "fPIC".to_string(),
            },
        ]
    }

    fn linux() -> Settings {
        Settings::new(Os::Linux, "gcc", "Release", "x86_64")
    }

    #[test]
    fn test_defaults_applied() {
        let resolved = resolve_options(&schema(), &[], &linux(), &[]).unwrap();
        assert!(resolved.is_true("shared"));
        assert_eq!(resolved.get("use_xdp"), Some(&OptionValue::Bool(false)));
        assert_eq!(
            resolved.get("tls_library").unwrap().as_choice(),
            Some("default")
        );
    }

    #[test]
    fn test_override_applied() {
        let overrides = vec![("use_xdp".to_string(), "true".to_string())];
        let resolved = resolve_options(&schema(), &[], &linux(), &overrides).unwrap();
        assert!(resolved.is_true("use_xdp"));
    }

    #[test]
    fn test_unknown_override_rejected() {
        let overrides = vec![("with_lasers".to_string(), "true".to_string())];
        let err = resolve_options(&schema(), &[], &linux(), &overrides).unwrap_err();
        assert!(matches!(err, Error::UnknownOption { option } if option == "with_lasers"));
    }

    #[test]
    fn test_out_of_domain_override_rejected() {
        let overrides = vec![("tls_library".to_string(), "gnutls".to_string())];
        let err = resolve_options(&schema(), &[], &linux(), &overrides).unwrap_err();
        assert!(matches!(err, Error::InvalidOptionValue { .. }));
    }

    #[test]
    fn test_platform_rule_removes_option() {
        let windows = Settings::new(Os::Windows, "msvc", "Release", "x86_64");
        let overrides = vec![("shared".to_string(), "false".to_string())];
        let resolved = resolve_options(&schema(), &rules(), &windows, &overrides).unwrap();
        assert!(resolved.get("fPIC").unwrap().is_unset());
    }

    #[test]
    fn test_choice_rule_removes_option() {
        // shared defaults to true, which moots fPIC
        let resolved = resolve_options(&schema(), &rules(), &linux(), &[]).unwrap();
        assert!(resolved.get("fPIC").unwrap().is_unset());
    }

    #[test]
    fn test_no_rule_triggered_keeps_option() {
        let overrides = vec![("shared".to_string(), "false".to_string())];
        let resolved = resolve_options(&schema(), &rules(), &linux(), &overrides).unwrap();
        assert_eq!(resolved.get("fPIC"), Some(&OptionValue::Bool(true)));
    }

    #[test]
    fn test_double_removal_is_noop() {
        // On Windows with shared=true both rules target fPIC.
        let windows = Settings::new(Os::Windows, "msvc", "Release", "x86_64");
        let resolved = resolve_options(&schema(), &rules(), &windows, &[]).unwrap();
        assert!(resolved.get("fPIC").unwrap().is_unset());
    }

    #[test]
    fn test_rule_for_undeclared_option_is_noop() {
        let rules = vec![RemovalRule::Platform {
            os: Os::Linux,
            option: "nonexistent".to_string(),
        }];
        let resolved = resolve_options(&schema(), &rules, &linux(), &[]).unwrap();
        assert_eq!(resolved.len(), 4);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let overrides = vec![("use_xdp".to_string(), "true".to_string())];
        let a = resolve_options(&schema(), &rules(), &linux(), &overrides).unwrap();
        let b = resolve_options(&schema(), &rules(), &linux(), &overrides).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_declaration_order_preserved() {
        let resolved = resolve_options(&schema(), &rules(), &linux(), &[]).unwrap();
        let names: Vec<_> = resolved.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["shared", "fPIC", "tls_library", "use_xdp"]);
    }
}
