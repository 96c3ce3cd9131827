//! HTTP client for the interview service.
//!
//! Thin JSON wrappers over the remote API plus [`ApiClient::stream_chat`],
//! the transport driver that feeds the chat byte stream through
//! [`StreamDecoder`].

mod error;
mod types;

use anyhow::Result;
use futures_util::StreamExt;
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderValue};

use crate::stream::{ProgressHook, StreamDecoder, StreamEvent, Utf8Carry};

pub use error::{ApiError, ApiErrorKind, classify_reqwest_error};
pub use types::{
    Ack, AuthRequest, ChatStreamRequest, Conversation, CreateConversationRequest, LoginResponse,
    Message, RegisterResponse, RenameConversationRequest,
};

/// Standard User-Agent header for prepchat API requests.
pub const USER_AGENT: &str = concat!("prepchat/", env!("CARGO_PKG_VERSION"));

/// Client for the interview service API.
///
/// Owns the base URL and the bearer token (absent until login). One client
/// may serve many calls; each streaming call gets its own decoder.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: None,
        }
    }

    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let mut client = Self::new(base_url);
        client.token = Some(token.into());
        client
    }

    /// `POST /auth/login`, returning the access token.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let body = AuthRequest { email, password };
        let response: LoginResponse = self
            .send_json(self.request(Method::POST, "/auth/login").json(&body))
            .await?;
        Ok(response.access)
    }

    /// `POST /auth/register`, returning the new user id.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    pub async fn register(&self, email: &str, password: &str) -> Result<String> {
        let body = AuthRequest { email, password };
        let response: RegisterResponse = self
            .send_json(self.request(Method::POST, "/auth/register").json(&body))
            .await?;
        Ok(response.user_id)
    }

    /// `GET /health`.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    pub async fn health(&self) -> Result<bool> {
        let response: Ack = self.send_json(self.request(Method::GET, "/health")).await?;
        Ok(response.ok)
    }

    /// `GET /conversations`.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    pub async fn conversations(&self) -> Result<Vec<Conversation>> {
        self.send_json(self.request(Method::GET, "/conversations"))
            .await
    }

    /// `POST /conversations`.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    pub async fn create_conversation(&self, title: &str, domain: &str) -> Result<Conversation> {
        let body = CreateConversationRequest { title, domain };
        self.send_json(self.request(Method::POST, "/conversations").json(&body))
            .await
    }

    /// `PATCH /conversations/{id}`.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    pub async fn rename_conversation(&self, id: &str, title: &str) -> Result<()> {
        let body = RenameConversationRequest { title };
        let path = format!("/conversations/{id}");
        let _: Ack = self
            .send_json(self.request(Method::PATCH, &path).json(&body))
            .await?;
        Ok(())
    }

    /// `DELETE /conversations/{id}`.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    pub async fn delete_conversation(&self, id: &str) -> Result<()> {
        let path = format!("/conversations/{id}");
        let _: Ack = self.send_json(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    /// `GET /messages/{conversation_id}`.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    pub async fn messages(&self, conversation_id: &str) -> Result<Vec<Message>> {
        let path = format!("/messages/{conversation_id}");
        self.send_json(self.request(Method::GET, &path)).await
    }

    /// `POST /chat/stream`: sends one user message and decodes the reply
    /// stream, invoking `on_event` per content increment in arrival order.
    ///
    /// Returns `true` when the stream completed and `false` on transport
    /// failure (failed request, non-success status, or a broken body
    /// read). Errors never cross this boundary; events already delivered
    /// are not retracted. Dropping the response on every exit path
    /// releases the connection.
    pub async fn stream_chat(
        &self,
        conversation_id: &str,
        user_message: &str,
        mut on_event: impl FnMut(StreamEvent),
        progress: Option<ProgressHook>,
    ) -> bool {
        let body = ChatStreamRequest {
            conversation_id,
            user_message,
        };
        let result = self
            .request(Method::POST, "/chat/stream")
            .json(&body)
            .send()
            .await;
        let response = match result {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("chat stream request failed: {err}");
                return false;
            }
        };
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "chat stream rejected");
            return false;
        }

        let mut decoder = match progress {
            Some(hook) => StreamDecoder::with_progress(hook),
            None => StreamDecoder::new(),
        };
        let mut carry = Utf8Carry::new();
        let mut byte_stream = response.bytes_stream();

        while let Some(chunk) = byte_stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(err) => {
                    tracing::warn!("chat stream interrupted: {err}");
                    return false;
                }
            };
            let text = carry.push(&chunk);
            for event in decoder.feed(&text) {
                on_event(event);
            }
            if decoder.is_finished() {
                break;
            }
        }

        if !decoder.is_finished() {
            for event in decoder.finish() {
                on_event(event);
            }
        }
        true
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.http.request(method, url).headers(self.headers())
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("user-agent", HeaderValue::from_static(USER_AGENT));
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        if let Some(token) = &self.token {
            headers.insert(
                "authorization",
                HeaderValue::from_str(&format!("Bearer {token}"))
                    .unwrap_or_else(|_| HeaderValue::from_static("")),
            );
        }
        headers
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T> {
        let response = builder.send().await.map_err(classify_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ApiError::http_status(status.as_u16(), &error_body).into());
        }
        response.json().await.map_err(|err| {
            ApiError::new(
                ApiErrorKind::Parse,
                format!("Failed to parse response: {err}"),
            )
            .into()
        })
    }
}
