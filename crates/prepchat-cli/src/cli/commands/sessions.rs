//! Session management handlers.

use anyhow::{Context, Result};
use prepchat_core::api::ApiClient;

pub async fn list(base_url: &str, token: &str, query: Option<&str>) -> Result<()> {
    let client = ApiClient::with_token(base_url, token);
    let mut conversations = client.conversations().await.context("list sessions")?;

    if let Some(query) = query {
        let needle = query.to_lowercase();
        conversations.retain(|c| c.title.to_lowercase().contains(&needle));
    }

    if conversations.is_empty() {
        println!("No sessions found.");
        return Ok(());
    }

    for conversation in &conversations {
        let messages = conversation
            .message_count
            .map(|n| format!("  ({n} messages)"))
            .unwrap_or_default();
        println!("{}  {}{}", conversation.id, conversation.title, messages);
    }
    Ok(())
}

pub async fn new(base_url: &str, token: &str, title: &str, domain: &str) -> Result<()> {
    let client = ApiClient::with_token(base_url, token);
    let conversation = client
        .create_conversation(title, domain)
        .await
        .context("create session")?;
    println!("Created session {}  {}", conversation.id, conversation.title);
    Ok(())
}

pub async fn rename(base_url: &str, token: &str, id: &str, title: &str) -> Result<()> {
    let client = ApiClient::with_token(base_url, token);
    client
        .rename_conversation(id, title)
        .await
        .context("rename session")?;
    println!("Renamed session {id}");
    Ok(())
}

pub async fn delete(base_url: &str, token: &str, id: &str) -> Result<()> {
    let client = ApiClient::with_token(base_url, token);
    client
        .delete_conversation(id)
        .await
        .context("delete session")?;
    println!("Deleted session {id}");
    Ok(())
}
