use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for isoworks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, clippy and the test suite
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates, warnings denied
    Clippy,
    /// Run all tests
    Test,
    /// Run the tile visibility benchmark
    Bench,
    /// Run the CLI end to end against the headless backend
    Smoke {
        /// Frames for the demo run
        #[arg(long, default_value = "30")]
        frames: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            cargo("fmt", &["fmt", "--all", "--", "--check"])?;
            cargo("clippy", CLIPPY)?;
            cargo("test", &["test", "--workspace"])?;
        }
        Commands::Fmt => cargo("fmt", &["fmt", "--all", "--", "--check"])?,
        Commands::Clippy => cargo("clippy", CLIPPY)?,
        Commands::Test => cargo("test", &["test", "--workspace"])?,
        Commands::Bench => cargo(
            "bench",
            &["bench", "-p", "isoworks-tilemap", "--bench", "bench_visible_tiles"],
        )?,
        Commands::Smoke { frames } => smoke(frames)?,
    }

    Ok(())
}

const CLIPPY: &[&str] = &[
    "clippy",
    "--workspace",
    "--all-targets",
    "--",
    "-D",
    "warnings",
];

fn cargo(step: &str, args: &[&str]) -> Result<()> {
    println!("==> cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{step} failed ({status})");
    }
    Ok(())
}

fn smoke(frames: u32) -> Result<()> {
    let frames = frames.to_string();
    let runs: [&[&str]; 3] = [
        &["info"],
        &["demo", "--frames", &frames],
        &["cull", "--width", "64", "--height", "64", "--camera-x", "200"],
    ];
    for run in runs {
        let mut args = vec!["run", "-q", "-p", "isoworks-cli", "--"];
        args.extend_from_slice(run);
        cargo(&format!("isoworks-cli {}", run[0]), &args)?;
    }
    Ok(())
}
