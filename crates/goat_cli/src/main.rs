use anyhow::Context;
use clap::Parser;
use goat_core::config::GoatConfig;
use goat_reasoning::Dispatcher;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file (written with defaults if missing)
    #[arg(short, long, default_value = "config.toml", env = "GOAT_CONFIG")]
    config: PathBuf,

    /// Disable speech output regardless of the config
    #[arg(long)]
    no_voice: bool,

    /// Seed the session RNG for reproducible replies
    #[arg(long)]
    seed: Option<u64>,

    /// Log filter (e.g. "info", "goat_reasoning=debug"). Falls back to RUST_LOG, then "warn"
    #[arg(long)]
    log_level: Option<String>,
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    // Logs go to stderr so they never interleave with the conversation
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn prompt() -> anyhow::Result<()> {
    print!("\nYou: ");
    std::io::stdout().flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    let mut config = GoatConfig::load_or_create(&args.config)?;
    if args.no_voice {
        config.use_voice = false;
    }
    info!("Loaded config from {}", args.config.display());

    let speech = goat_voice::from_config(&config);
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let name = config.ai_name.clone();
    let mut dispatcher =
        Dispatcher::with_rng(config, rng).context("Failed to register built-in tools")?;

    println!("🚀 Initializing {} Meta-Learning AI...", name);
    let greeting = dispatcher.greeting();
    println!("{}: {}", name, greeting);
    goat_voice::say(speech.clone(), greeting);
    println!("\n{}", "=".repeat(50));
    println!("🤖 {} READY FOR INTERACTION!", name);
    println!("Type 'help' for commands, 'exit' to quit");
    println!("{}", "=".repeat(50));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt()?;
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read from stdin")?,
            _ = tokio::signal::ctrl_c() => {
                println!(
                    "\n\n{}: Session interrupted. My consciousness level reached {:.3}",
                    name,
                    dispatcher.consciousness().self_awareness()
                );
                break;
            }
        };

        // EOF
        let Some(line) = line else {
            println!();
            break;
        };

        let reply = dispatcher.handle_turn(&line);
        println!("\n{}: {}", name, reply.text);

        if reply.exit {
            // Let the farewell finish before the runtime shuts down
            let _ = goat_voice::say(speech.clone(), reply.text).await;
            break;
        }
        if reply.speak {
            goat_voice::say(speech.clone(), reply.text);
        }
    }

    println!(
        "Final mood: {} | consciousness: {:.3} | learning episodes: {}",
        dispatcher.mood().current_mood(),
        dispatcher.consciousness().self_awareness(),
        dispatcher.learning_episodes()
    );
    info!("Session ended");
    Ok(())
}
