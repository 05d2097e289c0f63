use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sticky-reveal", version)]
struct Cli {
    /// Log mode changes and per-step activity (overridden by `RUST_LOG`).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a scenario and emit the per-step trace as JSON.
    Replay(ReplayArgs),
    /// Mount a scenario's document and report each managed element's setup.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    /// Input scenario JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output trace JSON; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input scenario JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Replay(args) => cmd_replay(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "sticky_reveal=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let scenario = sticky_reveal::Scenario::from_path(&args.in_path)?;
    let trace = sticky_reveal::replay(&scenario)
        .with_context(|| format!("replay '{}'", args.in_path.display()))?;
    let json = serde_json::to_string_pretty(&trace)?;

    match args.out {
        Some(out) => {
            if let Some(parent) = out.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(&out, json)
                .with_context(|| format!("write trace '{}'", out.display()))?;
            eprintln!("wrote {} frames to {}", trace.len(), out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let scenario = sticky_reveal::Scenario::from_path(&args.in_path)?;
    let report = sticky_reveal::inspect(&scenario)
        .with_context(|| format!("inspect '{}'", args.in_path.display()))?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
