//! Odyssey Playback CLI
//!
//! List algorithms, play a trace in the terminal, or serve the web frontend.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use odyssey_trace::{random_seed, Category, Registry, Seed};
use odyssey_vis::{PlaybackSpeed, PlaybackState, Player, Render, TextRenderer, VisConfig, VisServer};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "odyssey-vis")]
#[command(about = "Step through algorithm traces in the terminal or the browser")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List algorithms, optionally for one category
    List {
        category: Option<Category>,
    },
    /// Play an algorithm's trace in the terminal
    Play {
        algorithm: String,

        /// Comma-separated input values; random when omitted
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        seed_values: Option<Vec<i64>>,

        /// Search target for searching algorithms
        #[arg(long, allow_hyphen_values = true)]
        target: Option<i64>,

        /// Speed multiplier, e.g. 2 or 0.5x
        #[arg(long)]
        speed: Option<PlaybackSpeed>,

        /// RNG seed for random input
        #[arg(long)]
        random_seed: Option<u64>,
    },
    /// Serve the web frontend and playback API
    Serve {
        #[arg(long, short)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "odyssey_vis=info,odyssey_trace=info".into()),
        )
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => VisConfig::load(path)?,
        None => VisConfig::default(),
    };

    match cli.command {
        Commands::List { category } => list(&config, category)?,
        Commands::Play {
            algorithm,
            seed_values,
            target,
            speed,
            random_seed: rng_seed,
        } => {
            if let Some(speed) = speed {
                config.playback.speed = speed;
            }
            if let Some(rng_seed) = rng_seed {
                config.seed.seed = rng_seed;
            }
            let seed = seed_values.map(|values| match target {
                Some(target) => Seed::with_target(values, target),
                None => Seed::from(values),
            });
            play(&config, &algorithm, seed).await?;
        }
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.port);
            println!("Odyssey Playback");
            println!("================");
            println!("Open http://localhost:{port} in a browser.");
            VisServer::new(&config)?.serve(port).await?;
        }
    }

    Ok(())
}

fn list(config: &VisConfig, category: Option<Category>) -> odyssey_vis::Result<()> {
    let registry = Registry::standard();
    let catalog = config.load_catalog(&registry)?;
    for descriptor in catalog.iter() {
        if category.is_some_and(|c| c.as_str() != descriptor.category) {
            continue;
        }
        println!(
            "{:<20} {:<36} {:<12} {}",
            descriptor.category, descriptor.id, descriptor.complexity.time, descriptor.name
        );
    }
    Ok(())
}

async fn play(config: &VisConfig, algorithm: &str, seed: Option<Seed>) -> odyssey_vis::Result<()> {
    let registry = Registry::standard();
    let entry = registry
        .get(algorithm)
        .ok_or_else(|| odyssey_trace::Error::UnknownAlgorithm(algorithm.to_string()))?;
    let seed = match seed {
        Some(seed) => seed,
        None => random_seed(entry.category, &config.seed, &mut config.seed.rng()),
    };

    let trace = registry.generate(algorithm, &seed)?;
    info!(algorithm, steps = trace.len(), speed = %config.playback.speed, "playing trace");
    let trace = Arc::new(trace);

    let renderer = TextRenderer::new();
    let player = Player::spawn(&config.playback);
    let mut updates = player.subscribe();
    player.load(trace.clone(), entry.category.visualization()).await?;
    let mut status = player.play().await?;
    let mut next = 0;

    loop {
        while next <= status.current_step {
            if let Some(step) = trace.get(next) {
                println!("Step {} / {}", next + 1, status.total_steps);
                println!("{}", renderer.render(step));
            }
            next += 1;
        }
        if status.state != PlaybackState::Playing {
            break;
        }
        if updates.changed().await.is_err() {
            return Err(odyssey_vis::Error::PlayerClosed);
        }
        status = updates.borrow_and_update().clone();
    }

    Ok(())
}
