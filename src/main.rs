//! Duologue - two LLM personas in conversation
//!
//! Main entry point for the CLI application.

use clap::Parser;
use duologue::{Args, Config, DialogueOrchestrator};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    // Build configuration
    let mut config = Config::load(args.config.as_deref())?;
    args.apply(&mut config);

    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    if args.write_config {
        let path = config.save()?;
        println!("Config written to {}", path.display());
        return Ok(());
    }

    // Fails here, before any turn, on a missing key or bad config
    let mut dialogue = DialogueOrchestrator::from_config(&config)?;

    let rounds = config.dialogue.rounds;
    dialogue.run(rounds, &config.dialogue.seed_message).await?;

    Ok(())
}
