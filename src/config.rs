use std::env;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Runtime settings, layered: built-in defaults, then an optional config
/// file, then environment variables (`GEMINI_API_KEY`, `ELEVEN_LABS_API_KEY`,
/// `PORT`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub gemini: GeminiSettings,
    pub elevenlabs: ElevenLabsSettings,
    pub session: SessionSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind address for the HTTP listener
    pub bind: String,

    /// Listen port (the `PORT` env var overrides this)
    pub port: u16,

    /// Directory served at `/` (index.html plus assets)
    pub static_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    /// API key (the `GEMINI_API_KEY` env var overrides this)
    pub api_key: String,

    /// Base URL of the generative-language API; tests point this at a
    /// local mock server
    pub base_url: String,

    /// Model name used for generateContent calls
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ElevenLabsSettings {
    /// API key (the `ELEVEN_LABS_API_KEY` env var overrides this)
    pub api_key: String,

    /// Base URL of the text-to-speech API; tests point this at a
    /// local mock server
    pub base_url: String,

    /// Voice used for synthesis
    pub voice_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Hard cap on live sessions; least-recently-active are evicted past it
    pub max_sessions: usize,

    /// Sessions idle longer than this are evicted
    pub idle_timeout_secs: u64,

    /// How often the background sweeper runs
    pub sweep_interval_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            gemini: GeminiSettings::default(),
            elevenlabs: ElevenLabsSettings::default(),
            session: SessionSettings::default(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 5000,
            static_dir: "frontend".to_string(),
        }
    }
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.0-flash-exp".to_string(),
        }
    }
}

impl Default for ElevenLabsSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.elevenlabs.io".to_string(),
            voice_id: "GBv7mTt0atIp3Br8iCZE".to_string(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_sessions: 1024,
            idle_timeout_secs: 1800, // 30 minutes
            sweep_interval_secs: 60,
        }
    }
}

impl Settings {
    /// Load settings from an optional config file, then apply env overrides.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }
        let mut settings: Settings = builder
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("invalid configuration")?;

        settings.apply_env()?;
        Ok(settings)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(key) = env::var("GEMINI_API_KEY") {
            self.gemini.api_key = key;
        }
        if let Ok(key) = env::var("ELEVEN_LABS_API_KEY") {
            self.elevenlabs.api_key = key;
        }
        if let Ok(port) = env::var("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("invalid PORT value: {port}"))?;
        }
        Ok(())
    }

    /// Reject configurations that would only fail later, on the first request.
    pub fn validate(&self) -> Result<()> {
        if self.gemini.api_key.is_empty() {
            bail!("Gemini API key is not set (GEMINI_API_KEY)");
        }
        if self.elevenlabs.api_key.is_empty() {
            bail!("ElevenLabs API key is not set (ELEVEN_LABS_API_KEY)");
        }
        Ok(())
    }
}

impl SessionSettings {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}
