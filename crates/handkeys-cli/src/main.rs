mod cmd;
mod os;
mod output;
mod overlay;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, gesture::GestureSubcommand, run::RunArgs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "handkeys",
    about = "Map webcam hand gestures to app launches and accessibility shortcuts",
    version,
    propagate_version = true
)]
struct Cli {
    /// Directory holding gestures.db and handkeys.yaml (default: nearest ancestor with gestures.db, else cwd)
    #[arg(long, global = true, env = "HANDKEYS_ROOT")]
    root: Option<PathBuf>,

    /// Gesture table database (overrides <root>/gestures.db)
    #[arg(long, global = true, env = "HANDKEYS_DB")]
    db: Option<PathBuf>,

    /// Config file (overrides <root>/handkeys.yaml)
    #[arg(long, global = true, env = "HANDKEYS_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Edit the gesture → action table
    Gesture {
        #[command(subcommand)]
        subcommand: GestureSubcommand,
    },

    /// Inspect and validate the runtime configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Recognize gestures from a landmark stream and trigger their actions
    Run(RunArgs),
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Run(_) => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let paths = root::Paths::resolve(&root, cli.db, cli.config);

    let result = match cli.command {
        Commands::Gesture { subcommand } => cmd::gesture::run(&paths, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&paths, subcommand, cli.json),
        Commands::Run(args) => cmd::run::run(&paths, args, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
