use crate::output::print_json;
use crate::root::Paths;
use anyhow::Context;
use clap::Subcommand;
use handkeys_core::config::{Config, WarnLevel};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration
    Show,

    /// Write a config file with the default values (no-op if one exists)
    Init,

    /// Validate the config for common mistakes
    Validate,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(paths: &Paths, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(paths, json),
        ConfigSubcommand::Init => init(paths, json),
        ConfigSubcommand::Validate => validate(paths, json),
    }
}

fn load(paths: &Paths) -> anyhow::Result<Config> {
    Config::load(&paths.config)
        .with_context(|| format!("failed to load config from {}", paths.config.display()))
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(paths: &Paths, json: bool) -> anyhow::Result<()> {
    let config = load(paths)?;

    if json {
        return print_json(&serde_json::json!({
            "path": paths.config,
            "exists": paths.config.exists(),
            "config": config,
        }));
    }

    let source = if paths.config.exists() {
        paths.config.display().to_string()
    } else {
        format!("{} (not found, using defaults)", paths.config.display())
    };
    println!("# {source}");
    print!("{}", serde_yaml::to_string(&config)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

fn init(paths: &Paths, json: bool) -> anyhow::Result<()> {
    let written = if paths.config.exists() {
        false
    } else {
        Config::default()
            .save(&paths.config)
            .with_context(|| format!("failed to write {}", paths.config.display()))?;
        true
    };

    if json {
        print_json(&serde_json::json!({ "path": paths.config, "written": written }))?;
    } else if written {
        println!("Wrote default config to {}", paths.config.display());
    } else {
        println!("Config already exists at {}", paths.config.display());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(paths: &Paths, json: bool) -> anyhow::Result<()> {
    let config = load(paths)?;
    let warnings = config.validate();

    if json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}
