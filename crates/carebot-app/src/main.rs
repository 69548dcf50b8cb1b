//! Carebot binary - composition root.
//!
//! 1. Parse CLI flags and load configuration from TOML
//! 2. Resolve the model API key from the environment
//! 3. Build the model client and, in voice mode, the speech backends
//! 4. Start the axum server

mod cli;

use std::sync::Arc;

use clap::Parser;

use carebot_api::state::AppState;
use carebot_consult::{
    OpenAiChatClient, OpenAiTranscriber, OutputDispatcher, TranslateTts, TurnProcessor,
};
use carebot_core::config::CarebotConfig;

use cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = CliArgs::parse();

    let config_file = args.resolve_config_path();
    let loaded = if config_file.exists() {
        CarebotConfig::load(&config_file).map(Some)
    } else {
        Ok(None)
    };
    let mut config = match &loaded {
        Ok(Some(config)) => config.clone(),
        _ => CarebotConfig::default(),
    };

    // Tracing. RUST_LOG wins over the configured level.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .init();

    tracing::info!("Starting Carebot v{}", env!("CARGO_PKG_VERSION"));
    match loaded {
        Ok(Some(_)) => tracing::info!(path = %config_file.display(), "Configuration loaded"),
        Ok(None) => tracing::info!(path = %config_file.display(), "No config file; using defaults"),
        Err(e) => tracing::warn!(
            path = %config_file.display(),
            error = %e,
            "Failed to load config; using defaults"
        ),
    }

    config.server.port = args.resolve_port(config.server.port);
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    config.voice.enabled = args.voice_enabled(config.voice.enabled);

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return Err(e.into());
    }

    let api_key = match config.resolve_api_key() {
        Ok(key) => key,
        Err(e) => {
            tracing::error!(error = %e, "Model API key unavailable");
            return Err(e.into());
        }
    };

    let model = Arc::new(OpenAiChatClient::new(&config.model, api_key.clone())?);
    tracing::info!(model = %config.model.model, endpoint = %model.endpoint(), "Model client ready");

    let state = if config.voice.enabled {
        let tts = TranslateTts::new(&config.voice.tts_base_url)?;
        let stt = OpenAiTranscriber::new(
            config.voice.effective_stt_base_url(&config.model),
            api_key,
            &config.voice.stt_model,
            &config.voice.recognition_language,
        )?;
        tracing::info!(
            recognition_language = %config.voice.recognition_language,
            "Voice mode enabled"
        );
        let processor = TurnProcessor::with_voice(model, OutputDispatcher::new(Arc::new(tts)));
        AppState::new(config, processor).with_recognizer(Arc::new(stt))
    } else {
        tracing::info!("Text-only mode");
        AppState::new(config, TurnProcessor::text_only(model))
    };

    tracing::info!(
        "Consultation page at http://{}:{}/",
        state.config.server.host,
        state.config.server.port
    );

    carebot_api::start_server(state).await?;

    Ok(())
}
