use crate::output::{print_json, print_table};
use crate::root::Paths;
use anyhow::Context;
use clap::Subcommand;
use handkeys_core::action::{AccessibilityCommand, ActionType, AppPreset};
use handkeys_core::gesture::GestureName;
use handkeys_core::store::GestureStore;
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum GestureSubcommand {
    /// Map a gesture to an action (overwrites any existing mapping)
    Set {
        /// Gesture name, e.g. fist_closed (see `handkeys gesture options`)
        gesture: String,
        /// Launch this executable (absolute path or a name on PATH)
        #[arg(long)]
        app: Option<String>,
        /// Launch a predefined app: browser, terminal, file-manager, editor
        #[arg(long)]
        preset: Option<String>,
        /// Accessibility command, e.g. "Volume Up" or volume-up
        #[arg(long)]
        accessibility: Option<String>,
    },

    /// List configured gestures
    List,

    /// Remove the mapping for one gesture
    Remove { gesture: String },

    /// Delete every mapping
    Reset {
        /// Confirm clearing the whole table
        #[arg(long)]
        yes: bool,
    },

    /// Show the gestures, action types, commands and presets that can be configured
    Options,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(paths: &Paths, subcmd: GestureSubcommand, json: bool) -> anyhow::Result<()> {
    let store = GestureStore::open(&paths.db)
        .with_context(|| format!("failed to open gesture table at {}", paths.db.display()))?;

    match subcmd {
        GestureSubcommand::Set {
            gesture,
            app,
            preset,
            accessibility,
        } => set(&store, &gesture, app, preset, accessibility, json),
        GestureSubcommand::List => list(&store, json),
        GestureSubcommand::Remove { gesture } => remove(&store, &gesture, json),
        GestureSubcommand::Reset { yes } => reset(&store, yes, json),
        GestureSubcommand::Options => options(json),
    }
}

// ---------------------------------------------------------------------------
// set
// ---------------------------------------------------------------------------

fn set(
    store: &GestureStore,
    gesture: &str,
    app: Option<String>,
    preset: Option<String>,
    accessibility: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let gesture: GestureName = gesture.parse()?;

    let (action_type, text) = match (app, preset, accessibility) {
        (Some(app), None, None) => (ActionType::OpenApp, resolve_app(&app)?),
        (None, Some(preset), None) => {
            let preset: AppPreset = preset.parse()?;
            (ActionType::OpenApp, preset.path().to_string())
        }
        (None, None, Some(cmd)) => (ActionType::Accessibility, cmd),
        (None, None, None) => {
            anyhow::bail!("one of --app, --preset or --accessibility is required")
        }
        _ => anyhow::bail!("--app, --preset and --accessibility are mutually exclusive"),
    };

    let action = store
        .upsert(gesture, action_type, &text)
        .with_context(|| format!("failed to save gesture '{gesture}'"))?;

    if !gesture.is_classifiable() {
        tracing::warn!(
            gesture = %gesture,
            "no recognition rule produces this gesture; the mapping will never trigger"
        );
    }

    if json {
        print_json(&serde_json::json!({
            "gesture": gesture,
            "action_type": action_type,
            "action": action.to_string(),
        }))?;
    } else {
        println!("Gesture '{gesture}' set to action '{action}'");
    }
    Ok(())
}

/// Absolute paths are kept as given; bare names are looked up on PATH.
fn resolve_app(app: &str) -> anyhow::Result<String> {
    if Path::new(app).is_absolute() {
        if !Path::new(app).exists() {
            tracing::warn!(path = %app, "app does not exist on this machine");
        }
        return Ok(app.to_string());
    }
    let found = which::which(app).with_context(|| format!("'{app}' not found on PATH"))?;
    Ok(found.display().to_string())
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

fn list(store: &GestureStore, json: bool) -> anyhow::Result<()> {
    let entries = store.list()?;

    if json {
        return print_json(&entries);
    }
    if entries.is_empty() {
        println!("No gestures configured.");
        return Ok(());
    }

    let rows = entries
        .iter()
        .map(|e| {
            vec![
                e.gesture.to_string(),
                e.action_type
                    .map(|t| t.label().to_string())
                    .unwrap_or_else(|| "?".to_string()),
                e.action.to_string(),
                if e.gesture.is_classifiable() {
                    String::new()
                } else {
                    "never triggers".to_string()
                },
            ]
        })
        .collect();
    print_table(&["GESTURE", "TYPE", "ACTION", "NOTE"], rows);
    Ok(())
}

// ---------------------------------------------------------------------------
// remove / reset
// ---------------------------------------------------------------------------

fn remove(store: &GestureStore, gesture: &str, json: bool) -> anyhow::Result<()> {
    let gesture: GestureName = gesture.parse()?;
    let removed = store.remove(gesture)?;

    if json {
        print_json(&serde_json::json!({ "gesture": gesture, "removed": removed }))?;
    } else if removed {
        println!("Removed gesture '{gesture}'.");
    } else {
        println!("Gesture '{gesture}' was not configured.");
    }
    Ok(())
}

fn reset(store: &GestureStore, yes: bool, json: bool) -> anyhow::Result<()> {
    if !yes {
        anyhow::bail!("this deletes every gesture mapping; re-run with --yes to confirm");
    }
    let removed = store.clear_all()?;

    if json {
        print_json(&serde_json::json!({ "removed": removed }))?;
    } else {
        println!("All gesture configurations have been reset.");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// options
// ---------------------------------------------------------------------------

fn options(json: bool) -> anyhow::Result<()> {
    let gestures: Vec<&str> = GestureName::all().iter().map(|g| g.as_str()).collect();
    let types: Vec<&str> = ActionType::all().iter().map(|t| t.label()).collect();
    let commands: Vec<&str> = AccessibilityCommand::all()
        .iter()
        .map(|c| c.label())
        .collect();

    if json {
        let presets: serde_json::Map<String, serde_json::Value> = AppPreset::all()
            .iter()
            .map(|p| (p.as_str().to_string(), p.path().into()))
            .collect();
        return print_json(&serde_json::json!({
            "gestures": gestures,
            "action_types": types,
            "accessibility_commands": commands,
            "presets": presets,
        }));
    }

    println!("Gestures:");
    for g in GestureName::all() {
        let note = if g.is_classifiable() {
            ""
        } else {
            " (not recognized yet)"
        };
        println!("  {g}{note}");
    }
    println!("Action types: {}", types.join(", "));
    println!("Accessibility commands: {}", commands.join(", "));
    println!("App presets:");
    for p in AppPreset::all() {
        println!("  {:<13} {}", p.as_str(), p.path());
    }
    Ok(())
}
