use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use uplift_chat::session::{EvictionPolicy, MemoryStore, SessionStore};
use uplift_chat::{create_router, AppState, ElevenLabsClient, GeminiClient, Settings};

/// Voice chat backend: Gemini replies, spoken through ElevenLabs
#[derive(Parser, Debug)]
#[command(name = "uplift-chat", version)]
struct Cli {
    /// Config file, e.g. config/uplift-chat (TOML, extension optional)
    #[arg(long)]
    config: Option<String>,

    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        settings.server.port = port;
    }
    settings.validate()?;

    info!("Uplift Chat v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Reply model: {}, voice: {}",
        settings.gemini.model, settings.elevenlabs.voice_id
    );

    let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::new(EvictionPolicy {
        max_sessions: settings.session.max_sessions,
        idle_timeout: settings.session.idle_timeout(),
    }));

    // Periodic eviction of idle sessions
    let sweeper = Arc::clone(&store);
    let sweep_interval = settings.session.sweep_interval();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        loop {
            ticker.tick().await;
            sweeper.sweep().await;
        }
    });

    let state = AppState::new(
        store,
        GeminiClient::new(&settings.gemini),
        ElevenLabsClient::new(&settings.elevenlabs),
    );
    let app = create_router(state, &settings.server.static_dir);

    let addr = format!("{}:{}", settings.server.bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
