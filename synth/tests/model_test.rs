//! End-to-end synthesis against a mock chat-completions endpoint.

use docgraph_extract::ExtractedText;
use docgraph_synth::{ModelConfig, SynthError, SynthesisRequest, Synthesizer};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

fn synthesizer(server: &MockServer) -> Synthesizer {
    let config = ModelConfig::default()
        .with_base_url(format!("{}/v1", server.uri()))
        .with_model("graph-test");
    Synthesizer::openai(config).unwrap()
}

#[tokio::test]
async fn test_schema_constrained_request_decodes_graph() {
    let server = MockServer::start().await;
    let graph = r#"{"nodes":[{"id":"root","label":"Ownership","parent":null},{"id":"b","label":"Borrowing","parent":"root"}],"edges":[{"source":"root","target":"b"}]}"#;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "graph-test",
            "response_format": {
                "type": "json_schema",
                "json_schema": { "strict": true }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(graph)))
        .expect(1)
        .mount(&server)
        .await;

    let request = SynthesisRequest::new(vec![ExtractedText::truncated_to(
        "notes.txt",
        "Rust ownership".to_string(),
        100,
    )]);

    let candidate = synthesizer(&server)
        .synthesize_request(Some("sk-test"), &request)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(candidate.nodes.len(), 2);
    assert_eq!(candidate.nodes[1].parent_id.as_deref(), Some("root"));
    assert_eq!(candidate.edges[0].target_id, "b");
}

#[tokio::test]
async fn test_unauthorized_is_invalid_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" }
        })))
        .mount(&server)
        .await;

    let err = synthesizer(&server)
        .synthesize(Some("sk-wrong"), "prompt")
        .await
        .unwrap_err();
    assert!(matches!(err, SynthError::InvalidCredential(_)));
}

#[tokio::test]
async fn test_unsupported_response_format() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "message": "'response_format' of type 'json_schema' is not supported with this model" }
        })))
        .mount(&server)
        .await;

    let err = synthesizer(&server)
        .synthesize(Some("sk-test"), "prompt")
        .await
        .unwrap_err();
    assert!(matches!(err, SynthError::UnsupportedResponseFormat(_)));
}

#[tokio::test]
async fn test_server_error_is_generic_api_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let err = synthesizer(&server)
        .synthesize(Some("sk-test"), "prompt")
        .await
        .unwrap_err();
    match err {
        SynthError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "overloaded");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_malformed_content_yields_no_graph() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion(r#"{"nodes": "oops"}"#)),
        )
        .mount(&server)
        .await;

    let result = synthesizer(&server)
        .synthesize(Some("sk-test"), "prompt")
        .await
        .unwrap();
    assert_eq!(result, None);
}

#[tokio::test]
async fn test_blank_credential_never_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("{}")))
        .expect(0)
        .mount(&server)
        .await;

    let err = synthesizer(&server)
        .synthesize(Some(""), "prompt")
        .await
        .unwrap_err();
    assert!(matches!(err, SynthError::MissingCredential));
}
