use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ElevenLabsSettings;
use crate::error::ProviderError;

/// Outcome of a synthesis attempt.
///
/// A refusal from the provider (quota, bad voice, auth) is `Unavailable`, not
/// an error: the chat flow still succeeds and the client falls back to the
/// browser's built-in TTS. Only transport failures are hard errors.
#[derive(Debug)]
pub enum SpeechResult {
    /// MPEG audio bytes, ready for base64 transport
    Audio(Vec<u8>),

    /// The provider refused; callers should fall back to browser TTS
    Unavailable { status: StatusCode },
}

/// Client for the ElevenLabs text-to-speech endpoint
#[derive(Clone)]
pub struct ElevenLabsClient {
    http: Client,
    base_url: String,
    api_key: String,
    voice_id: String,
}

impl ElevenLabsClient {
    pub fn new(settings: &ElevenLabsSettings) -> Self {
        Self {
            http: Client::new(),
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
            voice_id: settings.voice_id.clone(),
        }
    }

    /// Synthesize `text` as MPEG audio with the configured voice.
    pub async fn synthesize(&self, text: &str) -> Result<SpeechResult, ProviderError> {
        let url = format!("{}/v1/text-to-speech/{}", self.base_url, self.voice_id);
        let request = SynthesisRequest {
            text: text.to_string(),
            voice_settings: VoiceSettings::default(),
        };

        let response = self
            .http
            .post(&url)
            .header("accept", "audio/mpeg")
            .header("xi-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("Speech synthesis returned {}, falling back to browser TTS", status);
            return Ok(SpeechResult::Unavailable { status });
        }

        let audio = response.bytes().await?.to_vec();
        debug!("Synthesized {} bytes of audio", audio.len());
        Ok(SpeechResult::Audio(audio))
    }
}

#[derive(Debug, Serialize)]
struct SynthesisRequest {
    text: String,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f64,
    similarity_boost: f64,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
        }
    }
}
