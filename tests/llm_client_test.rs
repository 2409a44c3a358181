// Exercises CompletionClient against a mock completions endpoint.
use std::net::TcpListener;
use std::time::Duration;

use mockito::{Matcher, Server};
use serde_json::json;

use spire_coach::engine::llm_client::{NOT_CONFIGURED_MESSAGE, SYSTEM_MESSAGE};
use spire_coach::*;

const PATH: &str = "/v1/chat/completions";

fn endpoint(server: &Server) -> String {
    format!("{}{}", server.url(), PATH)
}

fn client_for(url: &str) -> CompletionClient {
    let config = ClientConfig::new(
        Some("sk-test".into()),
        Some(url.to_string()),
        Some("gpt-test".into()),
    );
    CompletionClient::new(config).expect("build client")
}

#[test]
fn returns_trimmed_content_on_200() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", PATH)
        .match_header("authorization", "Bearer sk-test")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-test",
            "max_tokens": 200,
            "messages": [
                {"role": "system", "content": SYSTEM_MESSAGE},
                {"role": "user", "content": "Game State:\n"}
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"choices": [{"message": {"content": " Play Strike. "}}]}).to_string())
        .create();

    let advice = client_for(&endpoint(&server))
        .get_advice("Game State:\n")
        .unwrap();

    mock.assert();
    assert_eq!(advice, Advice::Completion("Play Strike.".into()));
}

#[test]
fn reports_status_and_body_on_500() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", PATH)
        .with_status(500)
        .with_body("server error")
        .create();

    let client = client_for(&endpoint(&server));

    let err = client.get_advice("prompt").unwrap_err();

    mock.assert();
    assert_eq!(err.kind(), ErrorKind::Http);
    let detail = err.to_string();
    assert!(detail.contains("500"), "{}", detail);
    assert!(detail.contains("server error"), "{}", detail);
}

#[test]
fn malformed_body_is_an_error_not_a_crash() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"id": "cmpl-1", "object": "chat.completion"}).to_string())
        .create();

    let client = client_for(&endpoint(&server));

    let err = client.get_advice("prompt").unwrap_err();

    mock.assert();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[test]
fn refused_connection_is_a_transport_error() {
    // grab a free port, then close it so nothing is listening
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let url = format!("http://127.0.0.1:{}{}", port, PATH);

    let err = client_for(&url).get_advice("prompt").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(!err.to_string().is_empty());
}

#[test]
fn silent_server_times_out_as_transport_error() {
    // the kernel completes the handshake but nobody ever answers
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}{}", listener.local_addr().unwrap(), PATH);
    let config = ClientConfig::new(Some("sk-test".into()), Some(url), None);
    let client = CompletionClient::with_timeouts(
        config,
        Duration::from_millis(200),
        Duration::from_millis(200),
    )
    .unwrap();

    let err = client.get_advice("prompt").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    drop(listener);
}

#[test]
fn no_api_key_never_touches_the_network() {
    let mut server = Server::new();
    let mock = server.mock("POST", PATH).expect(0).create();
    let config = ClientConfig::new(None, Some(endpoint(&server)), None);

    let advice = CompletionClient::new(config)
        .unwrap()
        .get_advice("prompt")
        .unwrap();

    mock.assert();
    assert_eq!(advice, Advice::Advisory(NOT_CONFIGURED_MESSAGE.into()));
}
