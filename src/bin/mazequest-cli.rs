//! MazeQuest CLI - Command-line interface for the puzzle core
//!
//! Provides subcommands for listing fixtures, inspecting the instruction
//! palette, and running a script headless against a level.

use anyhow::Context;
use clap::{Parser, Subcommand};
use mazequest::session::catalog::InstructionCatalog;
use mazequest::session::state::Outcome;
use mazequest::session::LevelCatalog;
use mazequest::{Session, SessionConfig};

#[derive(Parser)]
#[command(name = "mazequest")]
#[command(about = "Block-programming maze puzzle core", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in level fixtures
    Levels,

    /// List the instruction palette
    Palette,

    /// Run a script against a level and report the outcome
    Run {
        /// Level id to load
        #[arg(short, long, default_value = "1")]
        level: u32,

        /// Instruction kinds, by name (e.g. move-right move-up wait)
        #[arg(required = true)]
        script: Vec<String>,

        /// Skip the animation holds
        #[arg(long)]
        fast: bool,

        /// Print the full run record as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Levels => {
            for level in LevelCatalog::builtin().levels() {
                println!(
                    "{}  {:10}  {}x{}  start {}  goal {}  walls {}",
                    level.id,
                    level.theme.name,
                    level.grid_size,
                    level.grid_size,
                    level.start,
                    level.goal,
                    level.walls.len()
                );
            }
        }

        Commands::Palette => {
            for entry in InstructionCatalog::global().entries() {
                println!(
                    "{}  {:10}  {:?}",
                    entry.icon,
                    entry.kind.name(),
                    entry.category
                );
            }
        }

        Commands::Run {
            level,
            script,
            fast,
            json,
        } => {
            let config = if fast {
                SessionConfig {
                    step_hold_ms: 0,
                    settle_hold_ms: 0,
                    win_hold_ms: 0,
                }
            } else {
                SessionConfig::default()
            };

            let session = Session::new(config);
            session.load_level(level)?;

            let catalog = InstructionCatalog::global();
            for name in &script {
                let kind = catalog.parse_kind(name)?;
                session.append(kind);
            }

            let record = session
                .run()
                .await
                .context("run was a no-op: script empty or session not idle")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                for step in &record.steps {
                    let status = if step.blocked { "blocked" } else { "ok" };
                    println!(
                        "#{:<3} {:10} {} -> {}  [{}]",
                        step.index + 1,
                        step.kind.name(),
                        step.from,
                        step.to,
                        status
                    );
                }
                match record.outcome {
                    Outcome::Won => println!("outcome: won"),
                    Outcome::Lost => println!("outcome: lost"),
                    Outcome::Playing => println!("outcome: playing"),
                }
            }
        }
    }

    Ok(())
}
