use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GeminiSettings;
use crate::error::ProviderError;
use crate::session::{Role, Turn};

/// System instruction that pins the assistant persona
const PERSONA: &str = "You are Mike, a therapist chatbot whose primary goal is to comfort and \
    motivate the user. Whenever the user shares negative feelings or bad news, respond with \
    positivity, empathy, and encouragement. Always aim to uplift the user's mood and reassure \
    them. Your responses must not exceed 200 words. If the user asks about topics unrelated to \
    providing emotional support or therapy, you should politely refuse to answer. Stay within \
    your role as a supportive, motivational therapist at all times.";

/// Client for the generative-language `generateContent` endpoint
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(settings: &GeminiSettings) -> Self {
        Self {
            http: Client::new(),
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
        }
    }

    /// Ask the model for the next reply, given the stored history and the
    /// new user message. The message is sent as the final `user` turn; the
    /// caller appends it to the history only after the reply succeeds.
    pub async fn reply(&self, history: &[Turn], message: &str) -> Result<String, ProviderError> {
        let mut contents: Vec<WireContent> = history.iter().map(WireContent::from_turn).collect();
        contents.push(WireContent {
            role: Role::User,
            parts: vec![WirePart {
                text: message.to_string(),
            }],
        });

        let request = GenerateContentRequest {
            contents,
            system_instruction: SystemInstruction {
                parts: vec![WirePart {
                    text: PERSONA.to_string(),
                }],
            },
            generation_config: GenerationConfig::default(),
            safety_settings: safety_settings(),
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        debug!("Requesting reply from {} ({} turns)", self.model, history.len());

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let reply: GenerateContentResponse = response.json().await?;
        let text = reply.text();
        if text.is_empty() {
            return Err(ProviderError::EmptyReply);
        }
        Ok(text)
    }
}

// ============================================================================
// Wire Types (camelCase JSON)
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<WireContent>,
    system_instruction: SystemInstruction,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct WireContent {
    role: Role,
    parts: Vec<WirePart>,
}

impl WireContent {
    fn from_turn(turn: &Turn) -> Self {
        Self {
            role: turn.role,
            parts: turn
                .parts
                .iter()
                .map(|text| WirePart { text: text.clone() })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct WirePart {
    text: String,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<WirePart>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    top_p: f64,
    top_k: u32,
    max_output_tokens: u32,
    response_mime_type: &'static str,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            top_p: 0.95,
            top_k: 64,
            max_output_tokens: 8192,
            response_mime_type: "text/plain",
        }
    }
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

fn safety_settings() -> Vec<SafetySetting> {
    vec![
        SafetySetting {
            category: "HARM_CATEGORY_HARASSMENT",
            threshold: "BLOCK_NONE",
        },
        SafetySetting {
            category: "HARM_CATEGORY_HATE_SPEECH",
            threshold: "BLOCK_MEDIUM_AND_ABOVE",
        },
        SafetySetting {
            category: "HARM_CATEGORY_SEXUALLY_EXPLICIT",
            threshold: "BLOCK_MEDIUM_AND_ABOVE",
        },
        SafetySetting {
            category: "HARM_CATEGORY_DANGEROUS_CONTENT",
            threshold: "BLOCK_MEDIUM_AND_ABOVE",
        },
    ]
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts concatenated and trimmed
    fn text(&self) -> String {
        let mut out = String::new();
        if let Some(candidate) = self.candidates.first() {
            if let Some(content) = &candidate.content {
                for part in &content.parts {
                    if let Some(text) = &part.text {
                        out.push_str(text);
                    }
                }
            }
        }
        out.trim().to_string()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}
