//! Estate CLI - validate, replay and render slider manifests.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use estate::{GestureScript, RangeSlider, RecordingCanvas, Replayer, SliderManifest, Widget};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "estate")]
#[command(about = "Range slider manifests: validate, replay gestures, render")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a slider manifest
    Validate {
        /// Path to manifest file
        manifest: PathBuf,
    },

    /// Replay a gesture script against a manifest on a virtual clock
    Replay {
        /// Path to manifest file
        manifest: PathBuf,

        /// Path to gesture script
        script: PathBuf,

        /// Print JSON lines instead of text
        #[arg(long)]
        json: bool,
    },

    /// Dump the draw commands of a manifest as JSON
    Render {
        /// Path to manifest file
        manifest: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Validate { manifest } => validate(&manifest),
        Commands::Replay {
            manifest,
            script,
            json,
        } => replay(&manifest, &script, json),
        Commands::Render { manifest } => render(&manifest),
    }
}

/// `RUST_LOG` wins over the `-v` count.
fn init_tracing(verbose: u8) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

const fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn load_manifest(path: &Path) -> Result<SliderManifest> {
    debug!(path = %path.display(), "loading manifest");
    SliderManifest::load(path)
        .with_context(|| format!("failed to load manifest {}", path.display()))
}

fn validate(path: &Path) -> Result<()> {
    let manifest = load_manifest(path)?;
    RangeSlider::from_manifest(&manifest).context("manifest does not form a slider")?;
    println!("Manifest valid: {}", path.display());
    println!("  Domain: [{}, {}] step {}", manifest.min, manifest.max, manifest.step);
    println!("  Selection: [{}, {}]", manifest.low, manifest.high);
    println!(
        "  Timing: debounce {}ms, settle {}ms",
        manifest.debounce_ms, manifest.settle_ms
    );
    Ok(())
}

fn replay(manifest_path: &Path, script_path: &Path, json: bool) -> Result<()> {
    let manifest = load_manifest(manifest_path)?;
    let script = GestureScript::load(script_path)
        .with_context(|| format!("failed to load script {}", script_path.display()))?;
    info!(steps = script.steps.len(), "replaying script");

    let report = Replayer::from_manifest(&manifest)?.run(&script)?;

    if json {
        for notification in &report.notifications {
            println!("{}", serde_json::to_string(notification)?);
        }
        println!("{}", serde_json::to_string(&report)?);
    } else {
        for n in &report.notifications {
            println!("{:>6}ms  on_change({}, {})", n.at_ms, n.low, n.high);
        }
        for s in &report.syncs {
            println!("{:>6}ms  sync -> {:?}", s.at_ms, s.outcome);
        }
        println!(
            "final: [{}, {}] at {}ms{}",
            report.low,
            report.high,
            report.clock_ms,
            if report.mounted { "" } else { " (unmounted)" }
        );
    }
    Ok(())
}

fn render(path: &Path) -> Result<()> {
    let manifest = load_manifest(path)?;
    let replayer = Replayer::from_manifest(&manifest)?;
    let mut canvas = RecordingCanvas::new();
    replayer.slider().paint(&mut canvas);
    info!(commands = canvas.command_count(), "rendered");
    println!("{}", serde_json::to_string_pretty(canvas.commands())?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(0), "warn");
        assert_eq!(default_level(1), "info");
        assert_eq!(default_level(2), "debug");
        assert_eq!(default_level(9), "trace");
    }

    #[test]
    fn test_parse_replay() {
        let cli = Cli::try_parse_from([
            "estate", "-vv", "replay", "price.yaml", "drag.yaml", "--json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Replay { script, json, .. } => {
                assert_eq!(script, PathBuf::from("drag.yaml"));
                assert!(json);
            }
            _ => panic!("Expected Replay"),
        }
    }

    #[test]
    fn test_parse_requires_subcommand() {
        assert!(Cli::try_parse_from(["estate"]).is_err());
    }

    #[test]
    fn test_validate_missing_file_has_context() {
        let err = validate(Path::new("/nonexistent/estate.yaml")).unwrap_err();
        assert!(err.to_string().contains("failed to load manifest"));
    }
}
