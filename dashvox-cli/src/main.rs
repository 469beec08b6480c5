// Dashvox Command Line Interface
// Ask the dashboard questions and hear the answers, with the visual revealed mid-answer

mod catalog;
mod render;

use anyhow::Context;
use catalog::Entry;
use clap::{Parser, Subcommand};
use dashvox_spk::voices;
use dashvox_spk::{
    CloudSpeechBackend, CommandPlayer, NarrationConfig, NarrationCoordinator, NarrationOutcome, NarrationRequest,
    SpeechError, Utterance,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dashvox")]
#[command(about = "Dashvox - spoken answers for your business dashboard", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Voice for narration (friendly name or provider voice id)
    #[arg(long, global = true)]
    voice: Option<String>,

    /// Reveal visuals without narrating
    #[arg(long, global = true)]
    mute: bool,

    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the questions in the catalog
    List,

    /// Ask one question
    Ask {
        /// Question id, 1-based position, or (part of) the question text
        query: String,
    },

    /// Ask every question in order
    Tour,

    /// Show the cloud voice catalog
    Voices {
        /// Ask the provider for the voices on this account
        #[arg(long)]
        remote: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::List => list_questions(),
        Commands::Voices { remote: false } => list_voices(),
        Commands::Voices { remote: true } => list_remote_voices(&cli).await?,
        Commands::Ask { ref query } => {
            let entry = catalog::find(query)
                .with_context(|| format!("No question matches '{}'. Try 'dashvox list'.", query))?;
            let narrator = narrator(&cli)?;
            ask(narrator.as_ref(), entry).await?;
        }
        Commands::Tour => {
            let narrator = narrator(&cli)?;
            tour(narrator.as_ref()).await?;
        }
    }

    Ok(())
}

/// Defaults, then the `--config` file, then the environment, then `--voice`.
fn load_config(cli: &Cli) -> anyhow::Result<NarrationConfig> {
    let mut config = match cli.config {
        Some(ref path) => NarrationConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => NarrationConfig::default(),
    };
    config.apply_env();
    if let Some(ref voice) = cli.voice {
        config.default_voice = voice.clone();
    }
    Ok(config)
}

/// Coordinator for narrated runs; `None` when muted.
fn narrator(cli: &Cli) -> anyhow::Result<Option<NarrationCoordinator>> {
    if cli.mute {
        return Ok(None);
    }

    let config = load_config(cli)?;
    let coordinator = NarrationCoordinator::from_config(&config).context("Invalid narration configuration")?;
    info!("Narrating with {}", coordinator.backend().name());
    Ok(Some(coordinator))
}

fn list_questions() {
    for (i, entry) in catalog::entries().iter().enumerate() {
        println!("{:>2}. [{:<9}] {:<20} {}", i + 1, entry.topic.label(), entry.id, entry.question);
    }
}

fn list_voices() {
    for voice in voices::catalog() {
        let marker = if voice.name == voices::DEFAULT_VOICE { "*" } else { " " };
        println!(
            "{} {:<8} {:<22} {:<7} {}",
            marker, voice.name, voice.id, voice.gender, voice.accent
        );
    }
    println!("\n* default voice");
}

async fn list_remote_voices(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    config.cloud.validate().map_err(anyhow::Error::msg)?;
    let cloud = CloudSpeechBackend::new(config.cloud.clone(), Arc::new(CommandPlayer::new(&config.player)))?;

    let listed = cloud.list_voices().await.context("Failed to list provider voices")?;
    for voice in &listed {
        let known = voices::catalog().iter().any(|v| v.id == voice.voice_id);
        println!(
            "{} {:<20} {:<22} {}",
            if known { "*" } else { " " },
            voice.name,
            voice.voice_id,
            voice.category.as_deref().unwrap_or("-")
        );
    }
    println!("\n{} voices; * also in the built-in catalog", listed.len());
    Ok(())
}

async fn tour(narrator: Option<&NarrationCoordinator>) -> anyhow::Result<()> {
    let entries = catalog::entries();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            println!();
        }
        if ask(narrator, entry).await? == NarrationOutcome::Cancelled {
            println!("Tour stopped.");
            break;
        }
    }
    Ok(())
}

async fn ask(narrator: Option<&NarrationCoordinator>, entry: &Entry) -> anyhow::Result<NarrationOutcome> {
    println!("Q: {}", entry.question);
    let visual = render::render(&entry.visual);

    let Some(coordinator) = narrator else {
        println!("A: {}\n", entry.answer);
        print!("{}", visual);
        print_follow_ups(entry);
        return Ok(NarrationOutcome::Completed);
    };

    let voice = coordinator.default_voice().to_string();
    let revealed = Arc::new(AtomicBool::new(false));
    let request = NarrationRequest::new(
        Utterance::new(entry.question, voice.as_str()),
        Utterance::new(entry.answer, voice.as_str()),
    )
    .on_visual_reveal({
        let revealed = revealed.clone();
        let visual = visual.clone();
        move || {
            revealed.store(true, Ordering::SeqCst);
            print!("\n{}", visual);
        }
    });

    println!("A: {}", entry.answer);
    let narration = coordinator.speak_sequentially(request);
    tokio::pin!(narration);
    let result = tokio::select! {
        result = &mut narration => result,
        _ = tokio::signal::ctrl_c() => {
            coordinator.stop();
            narration.await
        }
    };

    match result {
        Ok(NarrationOutcome::Completed) => {
            print_follow_ups(entry);
            Ok(NarrationOutcome::Completed)
        }
        Ok(NarrationOutcome::Cancelled) => Ok(NarrationOutcome::Cancelled),
        Err(e @ SpeechError::NarrationFailed(_)) => {
            warn!("Narration failed: {}", e.root_cause());
            eprintln!("Could not narrate the answer ({}).", e.root_cause());
            if !revealed.load(Ordering::SeqCst) {
                print!("\n{}", visual);
            }
            print_follow_ups(entry);
            Ok(NarrationOutcome::Completed)
        }
        Err(e) => Err(e.into()),
    }
}

fn print_follow_ups(entry: &Entry) {
    let follow_ups = catalog::follow_ups(entry);
    if follow_ups.is_empty() {
        return;
    }
    println!("\nYou might also ask:");
    for follow_up in follow_ups {
        println!("  - {} (dashvox ask {})", follow_up.question, follow_up.id);
    }
}
