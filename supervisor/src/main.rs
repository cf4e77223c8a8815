//! Offline front end for the supervision engine.
//!
//! `plan` prints the subtask decomposition for a goal; `simulate` runs the
//! engine in-process and streams the action log until the goal completes.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use supervisor::config::load_config;
use supervisor::core::planner::plan;
use supervisor::{ActionLogEntry, AutonomyLevel, ChangeKind, EngineConfig, Supervisor};
use tokio::sync::broadcast::error::RecvError;

#[derive(Parser)]
#[command(
    name = "supervisor",
    version,
    about = "Supervise a simulated autonomous agent"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the subtask plan for a goal as JSON.
    Plan {
        /// Goal text to decompose.
        goal: String,
    },
    /// Run the agent on a goal and print each action as it happens.
    Simulate {
        /// Goal text to pursue.
        goal: String,

        /// Autonomy level recorded for the run.
        #[arg(long, default_value = "supervised")]
        autonomy: AutonomyLevel,

        /// Engine config TOML. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the tick interval in milliseconds.
        #[arg(long)]
        tick_ms: Option<u64>,

        /// Override the RNG seed for a reproducible run.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() {
    supervisor::logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Plan { goal } => cmd_plan(&goal),
        Command::Simulate {
            goal,
            autonomy,
            config,
            tick_ms,
            seed,
        } => {
            let config = simulate_config(config, tick_ms, seed)?;
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_time()
                .build()
                .context("build tokio runtime")?;
            runtime.block_on(cmd_simulate(goal, autonomy, config))
        }
    }
}

fn cmd_plan(goal: &str) -> Result<()> {
    let subtasks = plan(goal);
    let payload = serde_json::to_string_pretty(&subtasks).context("serialize plan")?;
    println!("{}", payload);
    Ok(())
}

fn simulate_config(
    path: Option<PathBuf>,
    tick_ms: Option<u64>,
    seed: Option<u64>,
) -> Result<EngineConfig> {
    let mut config = match path {
        Some(path) => load_config(&path)?,
        None => EngineConfig::default(),
    };
    if let Some(tick_ms) = tick_ms {
        config.tick_interval_ms = tick_ms;
    }
    if seed.is_some() {
        config.seed = seed;
    }
    config.validate().context("invalid engine config")?;
    Ok(config)
}

async fn cmd_simulate(goal: String, autonomy: AutonomyLevel, config: EngineConfig) -> Result<()> {
    let supervisor = Supervisor::new(config)?;
    let mut changes = supervisor.subscribe();

    let snapshot = supervisor.start(goal, autonomy).await;
    let mut printed = print_new(&snapshot.action_log, 0);

    loop {
        match changes.recv().await {
            Ok(change) => {
                printed = print_new(&change.snapshot.action_log, printed);
                match change.kind {
                    ChangeKind::Completed => return Ok(()),
                    ChangeKind::Stopped => bail!("agent stopped before completing its goal"),
                    _ => {}
                }
            }
            Err(RecvError::Lagged(_)) => {
                let snapshot = supervisor.status().await;
                printed = print_new(&snapshot.action_log, printed);
            }
            Err(RecvError::Closed) => bail!("supervisor event channel closed"),
        }
    }
}

/// Print entries past `printed` and return the new count.
fn print_new(entries: &[ActionLogEntry], printed: usize) -> usize {
    for entry in entries.iter().skip(printed) {
        println!(
            "{}  {}  ({})",
            entry.timestamp.format("%H:%M:%S"),
            entry.action,
            entry.details
        );
    }
    printed.max(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plan() {
        let cli = Cli::parse_from(["supervisor", "plan", "Audit the API"]);
        assert!(matches!(cli.command, Command::Plan { goal } if goal == "Audit the API"));
    }

    #[test]
    fn parse_simulate_with_overrides() {
        let cli = Cli::parse_from([
            "supervisor",
            "simulate",
            "goal",
            "--autonomy",
            "full-auto",
            "--tick-ms",
            "5",
            "--seed",
            "3",
        ]);
        match cli.command {
            Command::Simulate {
                autonomy,
                tick_ms,
                seed,
                config,
                ..
            } => {
                assert_eq!(autonomy, AutonomyLevel::FullAuto);
                assert_eq!(tick_ms, Some(5));
                assert_eq!(seed, Some(3));
                assert!(config.is_none());
            }
            Command::Plan { .. } => panic!("expected simulate"),
        }
    }

    #[test]
    fn simulate_rejects_unknown_autonomy() {
        let result = Cli::try_parse_from(["supervisor", "simulate", "goal", "--autonomy", "yolo"]);
        assert!(result.is_err());
    }

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let config = simulate_config(None, Some(5), Some(9)).expect("config");
        assert_eq!(config.tick_interval_ms, 5);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.max_increment, EngineConfig::default().max_increment);
    }

    #[test]
    fn zero_tick_override_is_rejected() {
        let err = simulate_config(None, Some(0), None).expect_err("invalid");
        assert!(format!("{:#}", err).contains("tick_interval_ms"));
    }

    #[test]
    fn print_new_skips_already_printed() {
        let entry = |action: &str| ActionLogEntry {
            timestamp: chrono::Utc::now(),
            action: action.to_string(),
            details: String::new(),
        };
        let entries = vec![entry("a"), entry("b"), entry("c")];
        assert_eq!(print_new(&entries, 1), 3);
        assert_eq!(print_new(&entries[..2], 3), 3);
    }
}
