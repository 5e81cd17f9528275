use serde::{Deserialize, Serialize};

use crate::api::{check, ApiClient};
use crate::error::AppResult;

/// A direct-message conversation as the backend lists it, denormalized with
/// the other participant and the latest message preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub chat_id: i64,
    pub friend_id: i64,
    pub friend_user_id: String,
    pub friend_email: String,
    pub friend_avatar: Option<String>,
    pub last_message: Option<String>,
    pub last_message_time: Option<String>,
}

/// One message, in server insertion order. Timestamps stay opaque server
/// strings; the client never does date math on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub text: String,
    pub created_at: String,
    pub sender_email: String,
    pub sender_avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatsResponse {
    #[serde(default)]
    chats: Vec<Chat>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct CreateChatRequest {
    action: &'static str,
    user_id: i64,
    friend_id: i64,
}

#[derive(Debug, Deserialize)]
struct CreateChatResponse {
    chat_id: i64,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    action: &'static str,
    chat_id: i64,
    sender_id: i64,
    message_text: &'a str,
}

impl ApiClient {
    pub async fn list_chats(&self, user_id: i64) -> AppResult<Vec<Chat>> {
        let res = self
            .client
            .get(&self.endpoints.chat)
            .query(&[("action", "chats".to_string()), ("user_id", user_id.to_string())])
            .send()
            .await?;

        let res = check(res, "Failed to load chats").await?;
        Ok(res.json::<ChatsResponse>().await?.chats)
    }

    pub async fn list_messages(&self, chat_id: i64) -> AppResult<Vec<Message>> {
        let res = self
            .client
            .get(&self.endpoints.chat)
            .query(&[("action", "messages".to_string()), ("chat_id", chat_id.to_string())])
            .send()
            .await?;

        let res = check(res, "Failed to load messages").await?;
        Ok(res.json::<MessagesResponse>().await?.messages)
    }

    /// Create the DM with a friend, or get the existing one back.
    pub async fn create_chat(&self, user_id: i64, friend_id: i64) -> AppResult<i64> {
        let res = self
            .client
            .post(&self.endpoints.chat)
            .json(&CreateChatRequest {
                action: "create_chat",
                user_id,
                friend_id,
            })
            .send()
            .await?;

        let res = check(res, "Failed to create chat").await?;
        Ok(res.json::<CreateChatResponse>().await?.chat_id)
    }

    /// Post a message into the chat. The caller refreshes the message list
    /// afterwards rather than reading anything out of the acknowledgement.
    pub async fn send_message(
        &self,
        chat_id: i64,
        sender_id: i64,
        message_text: &str,
    ) -> AppResult<()> {
        let res = self
            .client
            .post(&self.endpoints.chat)
            .json(&SendMessageRequest {
                action: "send_message",
                chat_id,
                sender_id,
                message_text,
            })
            .send()
            .await?;

        check(res, "Failed to send message").await?;
        Ok(())
    }
}
