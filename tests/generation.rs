//! End-to-end generation tests
//!
//! Drives the generator through the local provider against a mock server.

use std::time::Duration;

use craite::core::config::OutputStyle;
use craite::generator::LEARNING_RESOURCES;
use craite::{Config, CraiteError, GenerationMode, GenerationRequest, Generator, ProviderConfig};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REPLY: &str = "Here is the token.\n```solidity\ncontract Token {}\n```\nIt has no features yet.";

fn config_for(server: &MockServer) -> Config {
    let provider =
        ProviderConfig::new("local").with_endpoint(format!("{}/api/generate", server.uri()));
    let mut config = Config::new(provider);
    config.generation.output_style = OutputStyle::Concise;
    config.generation.default_language = None;
    config.generation.system_prompt = None;
    config.tools.enabled.clear();
    config
}

async fn mock_reply(server: &MockServer, reply: &str) {
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({ "model": "codellama", "stream": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": reply })))
        .mount(server)
        .await;
}

/// Prompt text of every request the server received
async fn sent_prompts(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| {
            let body: Value = serde_json::from_slice(&request.body).unwrap();
            body["prompt"].as_str().unwrap().to_string()
        })
        .collect()
}

#[tokio::test]
async fn test_educational_generation() {
    let server = MockServer::start().await;
    mock_reply(&server, REPLY).await;

    let generator = Generator::new(config_for(&server)).unwrap();
    let request = GenerationRequest::new("Create a token").mode(GenerationMode::Educational);
    let result = generator.generate(&request).await.unwrap();

    assert_eq!(result.code, "contract Token {}");
    assert_eq!(result.language, "solidity");
    let explanation = result.explanation.unwrap();
    assert!(explanation.starts_with("Here is the token."));
    assert!(explanation.contains("It has no features yet."));
    assert!(explanation.ends_with(LEARNING_RESOURCES));

    let prompts = sent_prompts(&server).await;
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].starts_with("You are CRAITE"));
    assert!(prompts[0].ends_with("\n\nCreate a token"));
}

#[tokio::test]
async fn test_production_generation() {
    let server = MockServer::start().await;
    mock_reply(&server, REPLY).await;

    let generator = Generator::new(config_for(&server)).unwrap();
    let result = generator
        .generate(&GenerationRequest::new("Create a token").language("Solidity"))
        .await
        .unwrap();

    assert_eq!(result.code, "contract Token {}");
    assert_eq!(result.language, "Solidity");
    assert!(result.explanation.is_none());
    assert!(result.tools_used.is_empty());
}

#[tokio::test]
async fn test_tools_feed_prompt() {
    let server = MockServer::start().await;
    mock_reply(&server, REPLY).await;

    let generator = Generator::new(config_for(&server)).unwrap();
    let request = GenerationRequest::new("Create an ERC721 with tx.origin checks")
        .language("solidity");
    let tools = vec![
        "openzeppelin_contracts".to_string(),
        "no_such_tool".to_string(),
        "security_audit".to_string(),
    ];
    let result = generator.generate_with_tools(&request, &tools).await.unwrap();

    assert_eq!(result.tools_used, vec!["openzeppelin_contracts", "security_audit"]);

    let prompt = &sent_prompts(&server).await[0];
    assert!(prompt.contains("### Additional Context from Tools:"));
    assert!(prompt.contains("**openzeppelin_contracts**:\n- contract_type: ERC721"));
    assert!(prompt.contains("**security_audit**:"));
    assert!(prompt.contains("access_control"));
    assert!(!prompt.contains("no_such_tool"));
}

#[tokio::test]
async fn test_upstream_failure_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let generator = Generator::new(config_for(&server)).unwrap();
    let err = generator
        .generate(&GenerationRequest::new("x"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "upstream");
}

#[tokio::test]
async fn test_cancel_in_flight_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "response": REPLY }))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let generator = Generator::new(config_for(&server)).unwrap();
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let err = generator
        .generate_cancellable(&GenerationRequest::new("x"), &[], &token)
        .await
        .unwrap_err();
    assert!(matches!(err, CraiteError::Cancelled));
}

#[tokio::test]
async fn test_batch_generation_order() {
    let server = MockServer::start().await;
    mock_reply(&server, REPLY).await;

    let generator = Generator::new(config_for(&server)).unwrap();
    let requests = ["rust", "go", "move", "cairo"]
        .into_iter()
        .map(|language| GenerationRequest::new("x").language(language))
        .collect();

    let languages: Vec<String> = generator
        .generate_batch(requests, 2)
        .await
        .into_iter()
        .map(|result| result.unwrap().language)
        .collect();
    assert_eq!(languages, vec!["rust", "go", "move", "cairo"]);
}

#[test]
fn test_unknown_provider_rejected() {
    let config = Config::new(ProviderConfig::new("cohere"));
    let err = Generator::new(config).err().unwrap();
    assert!(matches!(err, CraiteError::Configuration(_)));
}
