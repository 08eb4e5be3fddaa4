// tests/recipe_loading.rs

//! Recipe loading from disk

use cauldron::{parse_recipe_file, Error, Os, Settings};
use std::io::Write;

const RECIPE: &str = r#"
[package]
name = "widget"
version = "0.3.1"
description = "Test widget"
license = "MIT"

[[options]]
name = "with_tests"
default = false

[[requires]]
package = "zlib"
version = "1.3.0"

[[requires]]
package = "gtest"
version = "1.15.0"
when = "with_tests"

[[variables]]
option = "with_tests"
variable = "WIDGET_BUILD_TESTS"
"#;

#[test]
fn recipe_loads_from_file() {
    let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
    file.write_all(RECIPE.as_bytes()).unwrap();

    let recipe = parse_recipe_file(file.path()).unwrap();
    assert_eq!(recipe.name, "widget");
    assert_eq!(recipe.requires.len(), 2);

    let settings = Settings::new(Os::Linux, "gcc", "Debug", "aarch64");
    let resolution = recipe.resolve(&settings, &[]).unwrap();
    assert_eq!(resolution.requirements.len(), 1);
    assert_eq!(resolution.requirements[0].package, "zlib");
}

#[test]
fn missing_file_is_io_error() {
    let err = parse_recipe_file(std::path::Path::new("/nonexistent/recipe.toml")).unwrap_err();
    assert!(matches!(err, Error::IoError(_)));
}

#[test]
fn malformed_file_is_parse_error() {
    let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
    file.write_all(b"[package\nname = oops").unwrap();

    let err = parse_recipe_file(file.path()).unwrap_err();
    assert!(matches!(err, Error::ParseError(_)));
}
