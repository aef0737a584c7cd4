//! CLI entrypoint for nightpoll
//!
//! This is the main binary that wires together all layers using
//! dependency injection and hands control to the simulation REPL.

mod repl;

use anyhow::Result;
use clap::Parser;
use nightpoll_application::PollService;
use nightpoll_application::ports::zone::Zone;
use nightpoll_infrastructure::{ConfigLoader, ConsoleMessenger, SimWorld, TokioScheduler};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nightpoll", version, about = "Night-skip polls for shared zones")]
struct Cli {
    /// Path to a config file (merged over ./nightpoll.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ignore config files and run with built-in defaults
    #[arg(long)]
    no_config: bool,

    /// Increase log verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting nightpoll");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())?
    };

    // === Dependency Injection ===
    // Build the simulated world from configuration
    let world = SimWorld::new();
    for seed in &config.world.zones {
        let zone = world.add_zone(seed.name.as_str(), seed.votable);
        zone.set_clock(seed.clock);
    }

    let scheduler = Arc::new(TokioScheduler::new());
    let messenger = Arc::new(ConsoleMessenger::default());

    let handle = PollService::spawn(
        config.poll.clone(),
        Arc::clone(&world) as _,
        Arc::clone(&world) as _,
        scheduler as _,
        messenger as _,
    );

    let repl = repl::SimRepl::new(world, handle.clone(), config.poll);
    repl.run().await?;

    handle.shutdown().await;
    info!("nightpoll stopped");
    Ok(())
}
