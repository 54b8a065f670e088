use crate::os::SystemActions;
use crate::output::print_json;
use crate::overlay::TerminalOverlay;
use crate::root::Paths;
use anyhow::Context;
use clap::Args;
use handkeys_core::config::{Config, WarnLevel};
use handkeys_core::dispatch::{DryRunActions, OsActions};
use handkeys_core::pipeline::{Pipeline, RunSummary, StopReason};
use handkeys_core::source::{JsonLinesSource, PrecomputedLandmarks};
use handkeys_core::store::{GestureStore, GestureTable};
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Args)]
pub struct RunArgs {
    /// Read landmark frames (JSON lines) from this file; takes precedence over --detector-cmd
    #[arg(long)]
    input: Option<PathBuf>,

    /// Shell command of a detector process that prints landmark frames on stdout
    #[arg(long, env = "HANDKEYS_DETECTOR_CMD")]
    detector_cmd: Option<String>,

    /// Log actions instead of performing them
    #[arg(long)]
    dry_run: bool,
}

pub fn run(paths: &Paths, args: RunArgs, json: bool) -> anyhow::Result<()> {
    let config = Config::load(&paths.config)
        .with_context(|| format!("failed to load config from {}", paths.config.display()))?;
    if let Some(err) = config
        .validate()
        .into_iter()
        .find(|w| w.level == WarnLevel::Error)
    {
        anyhow::bail!("invalid config: {}", err.message);
    }

    let store = GestureStore::open(&paths.db)
        .with_context(|| format!("failed to open gesture table at {}", paths.db.display()))?;
    let table = store.load_all().context("failed to load gestures")?;
    if table.is_empty() {
        anyhow::bail!(
            "no gestures found in the database; add one with 'handkeys gesture set'"
        );
    }
    for gesture in table.keys().filter(|g| !g.is_classifiable()) {
        tracing::warn!(gesture = %gesture, "configured gesture has no recognition rule");
    }

    let os = if args.dry_run {
        None
    } else {
        Some(SystemActions::new()?)
    };

    let stop = Arc::new(AtomicBool::new(false));
    for signal in [signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM] {
        // A second signal while the first is still pending exits immediately.
        signal_hook::flag::register_conditional_shutdown(signal, 1, Arc::clone(&stop))
            .context("failed to install signal handler")?;
        signal_hook::flag::register(signal, Arc::clone(&stop))
            .context("failed to install signal handler")?;
    }

    let mut detector_proc: Option<Child> = None;
    let reader: Box<dyn BufRead + Send> = match (&args.input, &args.detector_cmd) {
        (Some(path), _) => Box::new(BufReader::new(
            std::fs::File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?,
        )),
        (None, Some(cmd)) => {
            let mut child = Command::new("sh")
                .arg("-c")
                .arg(cmd)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::inherit())
                .spawn()
                .with_context(|| format!("failed to start detector '{cmd}'"))?;
            let stdout = child
                .stdout
                .take()
                .context("failed to capture detector stdout")?;
            tracing::info!(cmd = %cmd, pid = child.id(), "detector started");
            detector_proc = Some(child);
            Box::new(BufReader::new(stdout))
        }
        (None, None) => Box::new(BufReader::new(std::io::stdin())),
    };

    let summary = match os {
        Some(os) => drive(table, &config, os, reader, &stop, json),
        None => drive(table, &config, DryRunActions, reader, &stop, json),
    };

    if let Some(mut child) = detector_proc {
        // The detector may already have exited; either way it must not linger.
        let _ = child.kill();
        let _ = child.wait();
    }

    report(&summary, json)?;
    if let StopReason::CaptureFailed { reason } = &summary.stop {
        anyhow::bail!("capture failed: {reason}");
    }
    Ok(())
}

fn drive<A: OsActions>(
    table: GestureTable,
    config: &Config,
    os: A,
    reader: Box<dyn BufRead + Send>,
    stop: &Arc<AtomicBool>,
    json: bool,
) -> RunSummary {
    let mut pipeline = Pipeline::new(table, config, os);
    let mut source = JsonLinesSource::new(reader).with_stop(Arc::clone(stop));
    let mut detector = PrecomputedLandmarks::new(config.min_detection_confidence);
    let mut overlay = TerminalOverlay::new(json);
    pipeline.run(&mut source, &mut detector, &mut overlay, stop)
}

fn report(summary: &RunSummary, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(summary);
    }
    let why = match &summary.stop {
        StopReason::Quit => "quit",
        StopReason::EndOfStream => "end of stream",
        StopReason::CaptureFailed { .. } => "capture failure",
    };
    println!(
        "Stopped ({why}) after {} frames: {} triggered, {} debounced.",
        summary.frames, summary.fired, summary.suppressed
    );
    Ok(())
}
