//! Minimal Telegram Bot API client.
//!
//! Only the handful of methods the bot needs: long polling, plain and edited
//! text messages with inline keyboards, photo uploads and callback
//! acknowledgements.

use crate::dispatcher::MessageSink;
use crate::error::{BotError, Result};
use crate::presentation::{Delivery, Keyboard, Outbound};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const POLL_GRACE_SECS: u64 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<i64>,
}

pub struct TelegramClient {
    client: Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(BotError::Http)?;

        Ok(Self {
            client,
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    pub async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>> {
        let mut body = Map::new();
        body.insert("timeout".to_string(), json!(timeout_secs));
        body.insert(
            "allowed_updates".to_string(),
            json!(["message", "callback_query"]),
        );
        if let Some(offset) = offset {
            body.insert("offset".to_string(), json!(offset));
        }

        let response = self
            .client
            .post(self.method_url("getUpdates"))
            .timeout(Duration::from_secs(timeout_secs.saturating_add(POLL_GRACE_SECS)))
            .json(&Value::Object(body))
            .send()
            .await?;

        decode(response).await
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<Message> {
        let mut body = json!({ "chat_id": chat_id, "text": text });
        if let Some(keyboard) = keyboard {
            body["reply_markup"] = reply_markup(keyboard);
        }
        self.call("sendMessage", &body).await
    }

    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<()> {
        let mut body = json!({ "chat_id": chat_id, "message_id": message_id, "text": text });
        if let Some(keyboard) = keyboard {
            body["reply_markup"] = reply_markup(keyboard);
        }
        // The result is either the edited message or `true`.
        let _: Value = self.call("editMessageText", &body).await?;
        Ok(())
    }

    pub async fn send_photo(
        &self,
        chat_id: i64,
        path: &Path,
        caption: &str,
        protect_content: bool,
    ) -> Result<Message> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "photo".to_string(), |n| n.to_string_lossy().into_owned());
        debug!("Uploading {} ({} bytes)", path.display(), bytes.len());

        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .text("protect_content", protect_content.to_string())
            .part("photo", Part::bytes(bytes).file_name(file_name));

        let response = self
            .client
            .post(self.method_url("sendPhoto"))
            .multipart(form)
            .send()
            .await?;

        decode(response).await
    }

    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<()> {
        let _: bool = self
            .call(
                "answerCallbackQuery",
                &json!({ "callback_query_id": callback_query_id }),
            )
            .await?;
        Ok(())
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, body: &Value) -> Result<T> {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await?;

        decode(response).await
    }
}

impl MessageSink for TelegramClient {
    async fn send(&self, chat_id: i64, origin: Option<i64>, message: &Outbound) -> Result<()> {
        match (message, origin) {
            (
                Outbound::Text {
                    text,
                    keyboard,
                    delivery: Delivery::EditOrigin,
                },
                Some(message_id),
            ) => {
                self.edit_message_text(chat_id, message_id, text, keyboard.as_ref())
                    .await
            }
            (Outbound::Text { text, keyboard, .. }, _) => self
                .send_message(chat_id, text, keyboard.as_ref())
                .await
                .map(|_| ()),
            (
                Outbound::Photo {
                    path,
                    caption,
                    protect_content,
                },
                _,
            ) => self
                .send_photo(chat_id, path, caption, *protect_content)
                .await
                .map(|_| ()),
        }
    }

    async fn acknowledge(&self, callback_query_id: &str) -> Result<()> {
        self.answer_callback_query(callback_query_id).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let envelope: ApiResponse<T> = response
        .json()
        .await
        .map_err(|e| BotError::InvalidResponse(format!("HTTP {status}: {e}")))?;

    if envelope.ok {
        envelope
            .result
            .ok_or_else(|| BotError::InvalidResponse("missing result".to_string()))
    } else {
        Err(BotError::Api {
            code: envelope.error_code,
            description: envelope
                .description
                .unwrap_or_else(|| status.to_string()),
        })
    }
}

fn reply_markup(keyboard: &Keyboard) -> Value {
    let rows: Vec<Vec<Value>> = keyboard
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|b| json!({ "text": b.label, "callback_data": b.data }))
                .collect()
        })
        .collect();
    json!({ "inline_keyboard": rows })
}
