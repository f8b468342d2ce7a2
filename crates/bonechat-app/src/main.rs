//! bonechat application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Initialize tracing
//! 3. Build the predictor and dialogue HTTP clients
//! 4. Run either the REST API server or the terminal chat

mod cli;
mod repl;

use std::sync::Arc;

use clap::Parser;

use bonechat_api::{start_server, AppState};
use bonechat_chat::{ChatOrchestrator, SessionRegistry};
use bonechat_core::config::{BonechatConfig, GeneralConfig};
use bonechat_dialogue::{DialogueService, HttpDialogue};
use bonechat_predictor::{HttpPredictor, ImageAnalyzer};

use cli::{CliArgs, Command};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // The file's log level is needed before tracing is up; the full load
    // happens after init so its warnings are not lost.
    let config_file = args.resolve_config_path();
    let file_log_level = BonechatConfig::load(&config_file)
        .map(|c| c.general.log_level)
        .unwrap_or_else(|_| GeneralConfig::default().log_level);

    // Tracing: RUST_LOG > --log-level > config.
    let log_level = args.resolve_log_level(&file_log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .init();

    tracing::info!("Starting bonechat v{}", env!("CARGO_PKG_VERSION"));
    let mut config = BonechatConfig::load_or_init(&config_file);

    // External services.
    let analyzer: Arc<dyn ImageAnalyzer> = Arc::new(HttpPredictor::from_config(&config.predictor)?);
    let dialogue: Arc<dyn DialogueService> = Arc::new(HttpDialogue::from_config(&config.dialogue)?);
    tracing::info!(
        predictor = %config.predictor.base_url,
        dialogue = %config.dialogue.base_url,
        "Service clients ready"
    );

    match args.command() {
        Command::Serve { .. } => {
            config.general.port = args.resolve_port(config.general.port);
            let sessions = SessionRegistry::new(analyzer, dialogue, config.chat.clone());
            let state = AppState::new(config, sessions);
            start_server(state).await?;
        }
        Command::Chat => {
            let orchestrator = ChatOrchestrator::new(analyzer, dialogue, &config.chat);
            println!("bonechat - /image <path> to submit a radiograph, /restart, /quit");
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = tokio::io::stdout();
            repl::run(&orchestrator, stdin, &mut stdout).await?;
        }
    }

    Ok(())
}
