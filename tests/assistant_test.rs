use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bibliodesk::genie::service::{BACKEND_ERROR_ANSWER, EMPTY_ANSWER, NOT_CONFIGURED_ANSWER};
use bibliodesk::genie::{GeminiLibrarian, LibrarianAssistant};

const MODEL: &str = "gemini-test";
const GENERATE_PATH: &str = "/v1beta/models/gemini-test:generateContent";

fn librarian(server: &MockServer) -> GeminiLibrarian {
    GeminiLibrarian::new(Some("test-key".to_string()), MODEL, server.uri())
}

#[tokio::test]
async fn test_ask_returns_model_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "Who wrote Systematic Theology?" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "Louis Berkhof, " }, { "text": "first published in 1932." }]
                }
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let answer = librarian(&mock_server)
        .ask("Who wrote Systematic Theology?")
        .await;
    assert_eq!(answer, "Louis Berkhof, first published in 1932.");
}

#[tokio::test]
async fn test_ask_sends_system_instruction() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({
            "systemInstruction": {}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Shalom." }] } }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    assert_eq!(librarian(&mock_server).ask("Hello").await, "Shalom.");
}

#[tokio::test]
async fn test_empty_candidates_give_fallback_answer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&mock_server)
        .await;

    assert_eq!(librarian(&mock_server).ask("Anything?").await, EMPTY_ANSWER);
}

#[tokio::test]
async fn test_backend_error_is_not_propagated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&mock_server)
        .await;

    assert_eq!(
        librarian(&mock_server).ask("Anything?").await,
        BACKEND_ERROR_ANSWER
    );
}

#[tokio::test]
async fn test_missing_key_never_calls_backend() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let assistant = GeminiLibrarian::new(None, MODEL, mock_server.uri());
    assert_eq!(assistant.ask("Anything?").await, NOT_CONFIGURED_ANSWER);
}
