use futures::StreamExt;
use interview_llm::{
    ChatClient, ChatCompletionsClient, ChatOptions, ChatRequest, Message, ProviderConfig,
    StreamEvent,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SSE_BODY: &str = concat!(
    "data: {\"id\":\"1\",\"object\":\"chat.completion.chunk\",\"created\":1,\"model\":\"m\",\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\",\"content\":\"\"},\"finish_reason\":null}]}\n\n",
    "data: {\"id\":\"1\",\"object\":\"chat.completion.chunk\",\"created\":1,\"model\":\"m\",\"choices\":[{\"index\":0,\"delta\":{\"content\":\"Hel\"},\"finish_reason\":null}]}\n\n",
    "data: {\"id\":\"1\",\"object\":\"chat.completion.chunk\",\"created\":1,\"model\":\"m\",\"choices\":[{\"index\":0,\"delta\":{\"content\":\"lo\"},\"finish_reason\":null}]}\n\n",
    "data: {\"id\":\"1\",\"object\":\"chat.completion.chunk\",\"created\":1,\"model\":\"m\",\"choices\":[{\"index\":0,\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n",
    "data: [DONE]\n\n",
);

fn request() -> ChatRequest {
    ChatRequest::new(
        "llama-3.3-70b-versatile",
        vec![Message::system("Only Finance."), Message::human("What is a bond?")],
    )
    .with_options(ChatOptions::new().temperature(0.2))
}

fn client_for(server: &MockServer, key: Option<&str>) -> ChatCompletionsClient {
    let mut config = ProviderConfig::default().with_base_url(server.uri());
    if let Some(key) = key {
        config = config.with_api_key(key);
    }
    ChatCompletionsClient::new(config).unwrap()
}

#[tokio::test]
async fn test_streams_fragments_from_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "llama-3.3-70b-versatile",
            "stream": true,
            "messages": [
                {"role": "system", "content": "Only Finance."},
                {"role": "user", "content": "What is a bond?"}
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(SSE_BODY),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("test-key"));
    let events: Vec<StreamEvent> = client
        .chat_stream(request())
        .await
        .unwrap()
        .map(|e| e.unwrap())
        .collect()
        .await;

    assert_eq!(
        events,
        vec![
            StreamEvent::Message { content: "Hel".to_string() },
            StreamEvent::Message { content: "lo".to_string() },
            StreamEvent::Done { finish_reason: Some("stop".to_string()) },
            StreamEvent::Done { finish_reason: None },
        ]
    );
}

#[tokio::test]
async fn test_auth_failure_fails_before_streaming() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string(r#"{"error":{"message":"Invalid API Key"}}"#),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, Some("bad-key"));
    let err = match client.chat_stream(request()).await {
        Ok(_) => panic!("expected an error"),
        Err(e) => e.to_string(),
    };

    assert!(err.starts_with("Groq API error (401"));
    assert!(err.contains("Invalid API Key"));
}

#[tokio::test]
async fn test_missing_key_fails_on_first_use() {
    let server = MockServer::start().await;

    let client = client_for(&server, None);
    let err = match client.chat_stream(request()).await {
        Ok(_) => panic!("expected an error"),
        Err(e) => e.to_string(),
    };

    assert_eq!(err, "Groq API key is not configured");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_connection_refused() {
    let config = ProviderConfig::groq("k").with_base_url("http://127.0.0.1:9");
    let client = ChatCompletionsClient::new(config).unwrap();

    let err = match client.chat_stream(request()).await {
        Ok(_) => panic!("expected an error"),
        Err(e) => e.to_string(),
    };

    assert_eq!(err, "Failed to send request");
}
