use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

/// Streamed reply body in the service wire format.
fn reply_body() -> String {
    [
        r#"data: {"content":"**Feedback:**\nGood answer overall.\n"}"#,
        "",
        r#"data: {"content":"1. **Clarity:** strong opening\n"}"#,
        "",
        r#"data: {"content":"\nScore: 7/10"}"#,
        "",
        "data: [DONE]",
        "",
    ]
    .join("\n")
}

#[tokio::test]
async fn test_chat_streams_and_formats_reply() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let mock_server = MockServer::start().await;
    let home = tempfile::tempdir().expect("tempdir");

    Mock::given(method("GET"))
        .and(path("/messages/conv-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/stream"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(reply_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("prepchat")
        .env("PREPCHAT_HOME", home.path())
        .env("PREPCHAT_BASE_URL", mock_server.uri())
        .env("PREPCHAT_TOKEN", "test-token")
        .args(["chat", "conv-1"])
        .write_stdin("I led the migration of our billing system\n:q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Prepchat"))
        .stdout(predicate::str::contains(":q to quit"))
        // Raw text is streamed verbatim first.
        .stdout(predicate::str::contains("Good answer overall."))
        // Then the structured rendering.
        .stdout(predicate::str::contains("== Feedback =="))
        .stdout(predicate::str::contains("1. Clarity: strong opening"))
        .stdout(predicate::str::contains("Score: 7/10"))
        .stdout(predicate::str::contains("70%"))
        .stdout(predicate::str::contains("Goodbye!"));
}

#[tokio::test]
async fn test_chat_replays_history_before_prompting() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let mock_server = MockServer::start().await;
    let home = tempfile::tempdir().expect("tempdir");

    let history = serde_json::json!([
        {
            "id": "m1",
            "content": "Tell me about yourself.",
            "role": "assistant",
            "timestamp": "2026-08-08T09:00:00+00:00"
        },
        {
            "id": "m2",
            "content": "I am a backend engineer.",
            "role": "user",
            "timestamp": "2026-08-08T09:01:00+00:00"
        }
    ]);
    Mock::given(method("GET"))
        .and(path("/messages/conv-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(history))
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("prepchat")
        .env("PREPCHAT_HOME", home.path())
        .env("PREPCHAT_BASE_URL", mock_server.uri())
        .env("PREPCHAT_TOKEN", "test-token")
        .args(["chat", "conv-2"])
        .write_stdin(":q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Tell me about yourself."))
        .stdout(predicate::str::contains("> I am a backend engineer."))
        .stdout(predicate::str::contains("Goodbye!"));
}

#[tokio::test]
async fn test_chat_handles_service_error_gracefully() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let mock_server = MockServer::start().await;
    let home = tempfile::tempdir().expect("tempdir");

    Mock::given(method("GET"))
        .and(path("/messages/conv-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/stream"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(serde_json::json!({"detail": "model unavailable"})),
        )
        .mount(&mock_server)
        .await;

    // The chat shows the error but keeps running until :q.
    cargo_bin_cmd!("prepchat")
        .env("PREPCHAT_HOME", home.path())
        .env("PREPCHAT_BASE_URL", mock_server.uri())
        .env("PREPCHAT_TOKEN", "test-token")
        .args(["chat", "conv-3"])
        .write_stdin("hello\n:q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Error:"))
        .stdout(predicate::str::contains("Goodbye!"));
}

#[test]
fn test_chat_fails_without_token() {
    let home = tempfile::tempdir().expect("tempdir");

    cargo_bin_cmd!("prepchat")
        .env("PREPCHAT_HOME", home.path())
        .env_remove("PREPCHAT_TOKEN")
        .args(["chat", "conv-1"])
        .write_stdin(":q\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("PREPCHAT_TOKEN"));
}
