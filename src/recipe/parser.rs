// src/recipe/parser.rs

//! Recipe file parsing and validation

use crate::error::{Error, Result};
use crate::options::OptionDomain;
use crate::recipe::format::RecipeDoc;
use crate::recipe::Recipe;
use std::path::Path;

/// Parse a recipe from a TOML string
pub fn parse_recipe(content: &str) -> Result<Recipe> {
    let doc: RecipeDoc =
        toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid recipe: {}", e)))?;
    doc.into_recipe()
}

/// Parse a recipe from a file
pub fn parse_recipe_file(path: &Path) -> Result<Recipe> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::IoError(format!("Failed to read recipe file: {}", e)))?;

    parse_recipe(&content)
}

/// Validate a recipe for completeness and correctness
///
/// Hard errors are cross-references that would make every resolution fail:
/// a requirement condition or variable mapping naming an undeclared option,
/// or a mapping whose sentinel, inference values, or gate keys fall outside
/// the option's enumerated domain. Benign gaps come back as warnings.
pub fn validate_recipe(recipe: &Recipe) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    if recipe.name.is_empty() {
        return Err(Error::ParseError("Recipe package name cannot be empty".to_string()));
    }
    if recipe.version.is_empty() {
        return Err(Error::ParseError("Recipe package version cannot be empty".to_string()));
    }

    for spec in &recipe.requires {
        if let Some(condition) = &spec.when {
            match recipe.options.get(&condition.option) {
                None => {
                    return Err(Error::UnknownOption {
                        option: condition.option.clone(),
                    });
                }
                Some(decl) if decl.domain != OptionDomain::Boolean => {
                    return Err(Error::ParseError(format!(
                        "Requirement '{}' condition '{}' references non-boolean option",
                        spec.package, condition
                    )));
                }
                Some(_) => {}
            }
        }
    }

    for mapping in &recipe.variables {
        let decl = match recipe.options.get(&mapping.option) {
            Some(decl) => decl,
            None => {
                return Err(Error::UnknownOption {
                    option: mapping.option.clone(),
                });
            }
        };

        match &decl.domain {
            OptionDomain::Enumerated(allowed) => {
                if let Some(sentinel) = &mapping.default_sentinel {
                    if !allowed.contains(sentinel) {
                        return Err(Error::ParseError(format!(
                            "Mapping for '{}' declares sentinel '{}' outside the option's domain",
                            mapping.option, sentinel
                        )));
                    }
                }
                for gated in mapping.only_on.keys() {
                    if !allowed.contains(gated) {
                        return Err(Error::ParseError(format!(
                            "Mapping for '{}' gates value '{}' outside the option's domain",
                            mapping.option, gated
                        )));
                    }
                }
            }
            OptionDomain::Boolean => {
                if mapping.default_sentinel.is_some()
                    || !mapping.infer.is_empty()
                    || !mapping.only_on.is_empty()
                {
                    return Err(Error::ParseError(format!(
                        "Mapping for boolean option '{}' cannot use default/infer/only_on",
                        mapping.option
                    )));
                }
            }
        }
    }

    // A rule naming an undeclared option is a silent no-op at resolution
    // time; flag it so recipe authors notice the typo.
    for rule in &recipe.rules {
        if !recipe.options.contains(rule.target()) {
            warnings.push(format!(
                "Removal rule targets undeclared option '{}'",
                rule.target()
            ));
        }
    }

    if recipe.description.is_none() {
        warnings.push("Missing package description".to_string());
    }
    if recipe.license.is_none() {
        warnings.push("Missing package license".to_string());
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[package]
name = "demo"
version = "1.0.0"

[[options]]
name = "shared"
default = true

[[options]]
name = "backend"
values = ["a", "b", "default"]
default = "default"
"#;

    #[test]
    fn test_parse_minimal_recipe() {
        let recipe = parse_recipe(MINIMAL).unwrap();
        assert_eq!(recipe.name, "demo");
        assert_eq!(recipe.options.len(), 2);
    }

    #[test]
    fn test_parse_invalid_toml() {
        assert!(parse_recipe("this is not valid toml at all {}").is_err());
    }

    #[test]
    fn test_parse_rules_and_requires() {
        let content = format!(
            "{}{}",
            MINIMAL,
            r#"
[[rules]]
option = "shared"
when_os = "Windows"

[[requires]]
package = "zstd"
version = "1.5.6"

[[requires]]
package = "libbpf"
version = "1.3.0"
when = "shared"
"#
        );
        let recipe = parse_recipe(&content).unwrap();
        assert_eq!(recipe.rules.len(), 1);
        assert_eq!(recipe.requires.len(), 2);
        assert!(recipe.requires[1].when.is_some());
    }

    #[test]
    fn test_validate_empty_name() {
        let content = MINIMAL.replace("name = \"demo\"", "name = \"\"");
        let recipe = parse_recipe(&content).unwrap();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_condition_unknown_option() {
        let content = format!(
            "{}{}",
            MINIMAL,
            r#"
[[requires]]
package = "zstd"
version = "1.5.6"
when = "mystery"
"#
        );
        let recipe = parse_recipe(&content).unwrap();
        assert!(matches!(
            validate_recipe(&recipe).unwrap_err(),
            Error::UnknownOption { option } if option == "mystery"
        ));
    }

    #[test]
    fn test_validate_condition_non_boolean_option() {
        let content = format!(
            "{}{}",
            MINIMAL,
            r#"
[[requires]]
package = "zstd"
version = "1.5.6"
when = "backend"
"#
        );
        let recipe = parse_recipe(&content).unwrap();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_gate_outside_domain() {
        let content = format!(
            "{}{}",
            MINIMAL,
            r#"
[[variables]]
option = "backend"
variable = "BACKEND"

[variables.only_on]
c = ["Windows"]
"#
        );
        let recipe = parse_recipe(&content).unwrap();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_boolean_mapping_with_infer() {
        let content = format!(
            "{}{}",
            MINIMAL,
            r#"
[[variables]]
option = "shared"
variable = "SHARED"

[variables.infer]
Linux = "yes"
"#
        );
        let recipe = parse_recipe(&content).unwrap();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_warnings() {
        let content = format!(
            "{}{}",
            MINIMAL,
            r#"
[[rules]]
option = "fPIC"
when_os = "Windows"
"#
        );
        let recipe = parse_recipe(&content).unwrap();
        let warnings = validate_recipe(&recipe).unwrap();
        assert!(warnings.iter().any(|w| w.contains("fPIC")));
        assert!(warnings.iter().any(|w| w.contains("description")));
        assert!(warnings.iter().any(|w| w.contains("license")));
    }
}
