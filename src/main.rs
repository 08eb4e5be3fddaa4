// src/main.rs

use anyhow::Result;
use cauldron::{parse_recipe_file, validate_recipe, Os, Settings};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "cauldron")]
#[command(author, version, about = "Recipe-resolution engine for native-library builds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a recipe against build settings
    Resolve {
        /// Path to the recipe TOML file
        recipe: PathBuf,

        /// Target operating system (Windows, Linux, Macos, FreeBsd, Android)
        #[arg(long)]
        os: String,

        /// Target compiler
        #[arg(long, default_value = "gcc")]
        compiler: String,

        /// Build type
        #[arg(long, default_value = "Release")]
        build_type: String,

        /// Target architecture
        #[arg(long, default_value = "x86_64")]
        arch: String,

        /// Option override as name=value (repeatable)
        #[arg(short = 'o', long = "option", value_name = "NAME=VALUE")]
        options: Vec<String>,

        /// Print the resolution as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse and validate a recipe, printing any warnings
    Validate {
        /// Path to the recipe TOML file
        recipe: PathBuf,
    },
}

/// Split a `name=value` override from the command line
fn parse_override(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(anyhow::anyhow!(
            "Invalid option override '{}': expected name=value",
            raw
        )),
    }
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Resolve {
            recipe,
            os,
            compiler,
            build_type,
            arch,
            options,
            json,
        }) => {
            let recipe = parse_recipe_file(&recipe)?;
            info!("Loaded recipe: {} {}", recipe.name, recipe.version);

            let settings = Settings::new(Os::parse(&os)?, compiler, build_type, arch);
            let overrides = options
                .iter()
                .map(|raw| parse_override(raw))
                .collect::<Result<Vec<_>>>()?;

            let resolution = recipe.resolve(&settings, &overrides)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&resolution)?);
                return Ok(());
            }

            println!("{}/{} ({})", recipe.name, recipe.version, settings);
            println!("\nOptions:");
            for (name, value) in resolution.options.iter() {
                println!("  {} = {}", name, value);
            }
            println!("\nRequirements:");
            for requirement in &resolution.requirements {
                println!("  {}", requirement);
            }
            println!("\nVariables:");
            for (name, value) in &resolution.variables {
                println!("  {} = {}", name, value);
            }
            Ok(())
        }
        Some(Commands::Validate { recipe }) => {
            let parsed = parse_recipe_file(&recipe)?;
            let warnings = validate_recipe(&parsed)?;

            println!("Recipe {} {} is valid", parsed.name, parsed.version);
            for warning in &warnings {
                println!("  warning: {}", warning);
            }
            Ok(())
        }
        None => {
            // No command provided, show help
            println!("Cauldron Recipe Resolver v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'cauldron --help' for usage information");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_override_valid() {
        let (name, value) = parse_override("use_xdp=true").unwrap();
        assert_eq!(name, "use_xdp");
        assert_eq!(value, "true");
    }

    #[test]
    fn test_parse_override_trims_whitespace() {
        let (name, value) = parse_override("tls_library = schannel").unwrap();
        assert_eq!(name, "tls_library");
        assert_eq!(value, "schannel");
    }

    #[test]
    fn test_parse_override_missing_equals() {
        assert!(parse_override("use_xdp").is_err());
    }

    #[test]
    fn test_parse_override_empty_name() {
        assert!(parse_override("=true").is_err());
    }
}
