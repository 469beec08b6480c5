//! Basic narration example
//!
//! Set ELEVENLABS_API_KEY to use cloud speech; without it the platform
//! synthesizer speaks instead.

use dashvox_spk::{NarrationConfig, NarrationCoordinator, NarrationRequest, Utterance};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = NarrationConfig::from_env();
    let coordinator = NarrationCoordinator::from_config(&config)?;
    let voice = coordinator.default_voice().to_string();

    println!("Using {}", coordinator.backend().name());

    let request = NarrationRequest::new(
        Utterance::new("What is my Return on Ad Spend?", voice.as_str()),
        Utterance::new("Your Return on Ad Spend is 4.5x.", voice.as_str()),
    )
    .on_visual_reveal(|| println!("[visual] ROAS 4.5x"))
    .on_complete(|| println!("Narration finished"));

    match coordinator.speak_sequentially(request).await {
        Ok(outcome) => println!("Outcome: {:?}", outcome),
        Err(e) => eprintln!("Failed to narrate: {}", e),
    }

    Ok(())
}
