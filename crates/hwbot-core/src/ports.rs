use async_trait::async_trait;

use crate::{
    domain::{ChatId, Cursor, HttpReply},
    Result,
};

/// Hexagonal port for the homework-review API.
///
/// Implementations return the raw reply; status and body checks happen in
/// the poll cycle. Transport failures must map to
/// [`crate::Error::EndpointUnreachable`].
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    /// Identity of the endpoint, used in diagnostics.
    fn endpoint(&self) -> &str;

    async fn fetch(&self, from_date: Cursor) -> Result<HttpReply>;
}

/// Hexagonal port for delivering notifications to a chat.
///
/// Failures must map to [`crate::Error::NotificationFailure`].
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<()>;
}
