//! Wire types for the interview service API.

use serde::{Deserialize, Serialize};

/// One practice session as listed on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_count: Option<u64>,
}

/// One stored chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub role: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct AuthRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterResponse {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct CreateConversationRequest<'a> {
    pub title: &'a str,
    pub domain: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RenameConversationRequest<'a> {
    pub title: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ChatStreamRequest<'a> {
    pub conversation_id: &'a str,
    pub user_message: &'a str,
}

/// `{"ok": true}` acknowledgement returned by mutating endpoints.
#[derive(Debug, Deserialize)]
pub struct Ack {
    pub ok: bool,
}
