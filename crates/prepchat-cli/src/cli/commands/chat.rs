//! Interactive chat handler.
//!
//! Streams the assistant's reply verbatim as it arrives, then prints the
//! structured rendering once the full message is known. Transport failures
//! surface as a retryable error line; the loop keeps running.

use std::io::{BufRead, Write};

use anyhow::Result;
use prepchat_core::api::ApiClient;
use prepchat_core::format::format_message;

use crate::render::render_blocks;

pub async fn run(base_url: &str, token: &str, session_id: &str) -> Result<()> {
    let client = ApiClient::with_token(base_url, token);

    println!("Prepchat — interview practice session {session_id}");
    println!("Type your answer, :q to quit.");
    println!();

    replay_history(&client, session_id).await;

    let stdin = std::io::stdin();
    let mut input = String::new();
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();

        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            break; // EOF
        }
        let line = input.trim();
        if line.is_empty() {
            continue;
        }
        if line == ":q" {
            break;
        }

        let mut reply = String::new();
        let ok = client
            .stream_chat(
                session_id,
                line,
                |event| {
                    print!("{}", event.text);
                    let _ = std::io::stdout().flush();
                    reply.push_str(&event.text);
                },
                None,
            )
            .await;
        println!();

        if !ok {
            println!("Error: the interview service did not answer. Try again.");
            continue;
        }

        let blocks = format_message(&reply);
        if !blocks.is_empty() {
            println!();
            print!("{}", render_blocks(&blocks));
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Prints the stored transcript; assistant turns get the structured view.
async fn replay_history(client: &ApiClient, session_id: &str) {
    let messages = match client.messages(session_id).await {
        Ok(messages) => messages,
        Err(err) => {
            tracing::warn!("could not fetch session history: {err}");
            return;
        }
    };

    for message in &messages {
        if message.role == "assistant" {
            print!("{}", render_blocks(&format_message(&message.content)));
        } else {
            println!("> {}", message.content);
        }
        println!();
    }
}
