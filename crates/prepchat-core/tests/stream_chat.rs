//! End-to-end tests of the chat stream driver against a mock service.

use std::sync::{Arc, Mutex};

use prepchat_core::api::ApiClient;
use prepchat_core::stream::StreamEvent;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

async fn run_stream(server: &MockServer) -> (bool, Vec<StreamEvent>) {
    let client = ApiClient::with_token(server.uri(), "test-token");
    let mut events = Vec::new();
    let ok = client
        .stream_chat("conv-1", "hello", |event| events.push(event), None)
        .await;
    (ok, events)
}

#[tokio::test]
async fn test_stream_chat_decodes_events_in_order() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let mock_server = MockServer::start().await;

    let body = "data: Tell me about\n\ndata:  your experience.\n\ndata: [DONE]\n\n";
    Mock::given(method("POST"))
        .and(path("/chat/stream"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (ok, events) = run_stream(&mock_server).await;
    assert!(ok);
    let texts: Vec<&str> = events.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["Tell me about", " your experience."]);
    assert!(events.iter().all(|e| !e.is_final));
}

#[tokio::test]
async fn test_stream_chat_handles_structured_payloads() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let mock_server = MockServer::start().await;

    let body = concat!(
        "data: {\"content\":\"**Feedback:**\\nGood answer.\"}\n\n",
        "data: {\"content\":\"\\nScore: 7/10\",\"final\":true}\n\n",
    );
    Mock::given(method("POST"))
        .and(path("/chat/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;

    let (ok, events) = run_stream(&mock_server).await;
    assert!(ok);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].text, "**Feedback:**\nGood answer.");
    assert!(!events[0].is_final);
    assert_eq!(events[1].text, "\nScore: 7/10");
    assert!(events[1].is_final);
}

#[tokio::test]
async fn test_stream_chat_recovers_malformed_frames() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let mock_server = MockServer::start().await;

    let body = "data: {broken json\n\ndata: still here\n\ndata: [DONE]\n\n";
    Mock::given(method("POST"))
        .and(path("/chat/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;

    let (ok, events) = run_stream(&mock_server).await;
    assert!(ok);
    let texts: Vec<&str> = events.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["{broken json", "still here"]);
}

#[tokio::test]
async fn test_stream_chat_reports_http_failure_as_false() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/stream"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string("{\"detail\":\"model unavailable\"}"),
        )
        .mount(&mock_server)
        .await;

    let (ok, events) = run_stream(&mock_server).await;
    assert!(!ok);
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_stream_chat_reports_connect_failure_as_false() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    // Nothing is listening on this address.
    let client = ApiClient::with_token("http://127.0.0.1:9", "test-token");
    let mut events = Vec::new();
    let ok = client
        .stream_chat("conv-1", "hello", |event| events.push(event), None)
        .await;
    assert!(!ok);
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_stream_chat_completes_without_sentinel() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let mock_server = MockServer::start().await;

    // No [DONE] and no trailing newline: drain recovers the last line.
    let body = "data: partial service\n\ndata: cut off";
    Mock::given(method("POST"))
        .and(path("/chat/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;

    let (ok, events) = run_stream(&mock_server).await;
    assert!(ok);
    let texts: Vec<&str> = events.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["partial service", "cut off"]);
}

#[tokio::test]
async fn test_stream_chat_reports_progress_per_fragment() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let mock_server = MockServer::start().await;

    let body = "data: hi\n\ndata: [DONE]\n\n";
    Mock::given(method("POST"))
        .and(path("/chat/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;

    let client = ApiClient::with_token(mock_server.uri(), "test-token");
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let ok = client
        .stream_chat(
            "conv-1",
            "hello",
            |_| {},
            Some(Box::new(move |n| sink.lock().expect("poisoned").push(n))),
        )
        .await;

    assert!(ok);
    let seen = seen.lock().expect("poisoned");
    assert!(!seen.is_empty());
    // Counts are cumulative; the final one covers at least the sentinel.
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    let last = *seen.last().expect("non-empty");
    assert!(last >= body.find("[DONE]").expect("sentinel in body"));
    assert!(last <= body.len());
}
