// Wire-format tests for the outbound provider clients
//
// These pin down what actually goes over the socket: URLs, auth headers,
// and JSON body shape, verified against local wiremock servers.

use anyhow::Result;
use serde_json::Value;
use uplift_chat::config::{ElevenLabsSettings, GeminiSettings};
use uplift_chat::session::{Role, Turn};
use uplift_chat::{ElevenLabsClient, GeminiClient, ProviderError, SpeechResult};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gemini_client(server: &MockServer) -> GeminiClient {
    GeminiClient::new(&GeminiSettings {
        api_key: "gemini-test-key".to_string(),
        base_url: server.uri(),
        ..Default::default()
    })
}

fn reply_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]}
        }]
    })
}

#[tokio::test]
async fn test_gemini_request_carries_auth_and_full_wire_shape() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash-exp:generateContent"))
        .and(header("x-goog-api-key", "gemini-test-key"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("Hello there.")))
        .mount(&server)
        .await;

    let history = vec![
        Turn::new(Role::User, "Hi"),
        Turn::new(Role::Model, "Hello! How are you feeling today?"),
    ];
    let reply = gemini_client(&server).reply(&history, "A bit anxious").await?;
    assert_eq!(reply, "Hello there.");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: Value = serde_json::from_slice(&requests[0].body)?;

    // History turns followed by the new message, as the final user turn
    let contents = body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[0]["role"], "user");
    assert_eq!(contents[1]["role"], "model");
    assert_eq!(contents[2]["role"], "user");
    assert_eq!(contents[2]["parts"][0]["text"], "A bit anxious");

    // The persona rides along as the system instruction
    let instruction = body["systemInstruction"]["parts"][0]["text"]
        .as_str()
        .unwrap();
    assert!(instruction.contains("You are Mike"));
    assert!(instruction.contains("must not exceed 200 words"));

    // Deterministic, plain-text generation settings
    assert_eq!(body["generationConfig"]["temperature"], 0.0);
    assert_eq!(body["generationConfig"]["topP"], 0.95);
    assert_eq!(body["generationConfig"]["topK"], 64);
    assert_eq!(body["generationConfig"]["maxOutputTokens"], 8192);
    assert_eq!(body["generationConfig"]["responseMimeType"], "text/plain");

    // Safety thresholds: harassment open, the rest at medium-and-above
    let safety = body["safetySettings"].as_array().unwrap();
    assert_eq!(safety.len(), 4);
    assert_eq!(safety[0]["category"], "HARM_CATEGORY_HARASSMENT");
    assert_eq!(safety[0]["threshold"], "BLOCK_NONE");
    assert_eq!(safety[1]["threshold"], "BLOCK_MEDIUM_AND_ABOVE");

    Ok(())
}

#[tokio::test]
async fn test_gemini_reply_text_is_trimmed() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("  Deep breaths. \n")))
        .mount(&server)
        .await;

    let reply = gemini_client(&server).reply(&[], "help").await?;
    assert_eq!(reply, "Deep breaths.");

    Ok(())
}

#[tokio::test]
async fn test_gemini_error_status_surfaces_as_provider_error() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    let err = gemini_client(&server).reply(&[], "hello").await.unwrap_err();
    assert!(
        matches!(&err, ProviderError::Status { status, body }
            if status.as_u16() == 403 && body.contains("API key not valid")),
        "unexpected error: {err:?}"
    );

    Ok(())
}

#[tokio::test]
async fn test_gemini_response_without_text_is_an_empty_reply_error() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": []})),
        )
        .mount(&server)
        .await;

    let err = gemini_client(&server).reply(&[], "hello").await.unwrap_err();
    assert!(matches!(err, ProviderError::EmptyReply));

    Ok(())
}

#[tokio::test]
async fn test_elevenlabs_sends_voice_settings_and_headers() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/text-to-speech/test-voice"))
        .and(header("xi-api-key", "tts-test-key"))
        .and(header("accept", "audio/mpeg"))
        .and(header("content-type", "application/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"mpeg-bytes".to_vec())
                .insert_header("content-type", "audio/mpeg"),
        )
        .mount(&server)
        .await;

    let client = ElevenLabsClient::new(&ElevenLabsSettings {
        api_key: "tts-test-key".to_string(),
        base_url: server.uri(),
        voice_id: "test-voice".to_string(),
    });

    let result = client.synthesize("You are doing great.").await?;
    match result {
        SpeechResult::Audio(audio) => assert_eq!(audio, b"mpeg-bytes"),
        other => panic!("expected audio, got {other:?}"),
    }

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body)?;
    assert_eq!(body["text"], "You are doing great.");
    assert_eq!(body["voice_settings"]["stability"], 0.5);
    assert_eq!(body["voice_settings"]["similarity_boost"], 0.75);

    Ok(())
}

#[tokio::test]
async fn test_elevenlabs_refusal_signals_browser_fallback() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let client = ElevenLabsClient::new(&ElevenLabsSettings {
        api_key: "tts-test-key".to_string(),
        base_url: server.uri(),
        ..Default::default()
    });

    let result = client.synthesize("hello").await?;
    assert!(
        matches!(result, SpeechResult::Unavailable { status } if status.as_u16() == 429),
        "A refusal should be a soft fallback, not an error"
    );

    Ok(())
}

#[tokio::test]
async fn test_elevenlabs_connection_failure_is_a_hard_error() -> Result<()> {
    // Nothing listens on port 1; the connection is refused outright
    let client = ElevenLabsClient::new(&ElevenLabsSettings {
        api_key: "tts-test-key".to_string(),
        base_url: "http://127.0.0.1:1".to_string(),
        ..Default::default()
    });

    let err = client.synthesize("hello").await.unwrap_err();
    assert!(matches!(err, ProviderError::Http(_)));

    Ok(())
}
