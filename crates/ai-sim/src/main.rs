//! ai-sim - run goal-driven bots in the reference arena.
//!
//! - `ai-sim run` - run a scenario file (or the built-in arena) headless
//! - `ai-sim demo` - run the built-in arena and print goal chains as it goes

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use ai_sim::{RunSummary, ScenarioConfig, Simulation};

#[derive(Parser)]
#[command(name = "ai-sim")]
#[command(about = "Goal-driven bots with time-sliced path planning", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario headless and print a summary
    Run {
        /// Scenario YAML; the built-in arena when omitted
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Override the scenario's tick count
        #[arg(long)]
        ticks: Option<u64>,
    },

    /// Run the built-in arena, printing each bot's goals periodically
    Demo {
        #[arg(long)]
        ticks: Option<u64>,

        /// Ticks between goal printouts
        #[arg(long, default_value = "50")]
        every: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Run { scenario, ticks } => {
            let config = match scenario {
                Some(path) => ScenarioConfig::load(&path)?,
                None => ScenarioConfig::demo()?,
            };
            run(&config, ticks)
        }
        Commands::Demo { ticks, every } => demo(&ScenarioConfig::demo()?, ticks, every),
    }
}

fn run(config: &ScenarioConfig, ticks: Option<u64>) -> Result<()> {
    let ticks = ticks.unwrap_or(config.ticks);
    tracing::info!(scenario = %config.name, ticks, bots = config.bots.len(), "Starting simulation");

    let mut sim = Simulation::from_config(config)
        .with_context(|| format!("Invalid scenario `{}`", config.name))?;
    let summary = sim.run(ticks);
    print_summary(&summary);
    Ok(())
}

fn demo(config: &ScenarioConfig, ticks: Option<u64>, every: u64) -> Result<()> {
    let ticks = ticks.unwrap_or(config.ticks);
    let every = every.max(1);
    let mut sim = Simulation::from_config(config).context("Invalid built-in scenario")?;

    for _ in 0..ticks {
        let report = sim.step();
        if report.tick % every == 0 {
            println!("tick {:>5}  searches in flight {}", report.tick, report.searches_in_flight);
            for brain in sim.brains() {
                let chain: Vec<&'static str> =
                    brain.active_goals().into_iter().map(Into::into).collect();
                let health = sim.arena().bot(brain.agent).map_or(0.0, |b| b.health);
                println!("  bot {:>3}  hp {:>5.1}  {}", brain.agent, health, chain.join(" > "));
            }
        }
    }

    print_summary(&sim.summary());
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    let stats = &summary.stats;
    println!();
    println!("Ran {} ticks", summary.ticks);
    println!(
        "  searches: {} steps, {} finished",
        stats.search_steps, stats.searches_finished
    );
    println!(
        "  paths:    {} ready, {} failed, {} superseded",
        stats.paths_ready, stats.paths_failed, stats.stale_messages
    );
    println!(
        "  world:    {} pickups, {} doors opened, {} frags",
        stats.pickups, stats.doors_opened, stats.frags
    );
    for (agent, goals) in &summary.goals {
        let chain: Vec<String> = goals.iter().map(ToString::to_string).collect();
        println!("  bot {agent:>3}: {}", chain.join(" > "));
    }
}
