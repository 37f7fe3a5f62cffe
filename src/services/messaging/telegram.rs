use anyhow::Context;
use async_trait::async_trait;
use serde_json::{json, Value};

use super::MessagingProvider;
use crate::models::{Keyboard, Update};

pub struct TelegramClient {
    token: String,
    api_url: String,
    client: reqwest::Client,
}

impl TelegramClient {
    pub fn new(token: String, api_url: String) -> Self {
        Self {
            token,
            api_url,
            client: reqwest::Client::new(),
        }
    }

    async fn call(&self, method: &str, body: Value) -> anyhow::Result<Value> {
        let url = format!("{}/bot{}/{}", self.api_url, self.token, method);

        let data: Value = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("failed to call Telegram {method}"))?
            .json()
            .await
            .with_context(|| format!("failed to parse Telegram {method} response"))?;

        if data["ok"].as_bool() != Some(true) {
            let description = data["description"].as_str().unwrap_or("unknown error");
            anyhow::bail!("Telegram {method} failed: {description}");
        }

        Ok(data["result"].clone())
    }

    /// Long-polls for updates after `offset`, waiting up to `timeout_secs`.
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> anyhow::Result<Vec<Update>> {
        let result = self
            .call(
                "getUpdates",
                json!({
                    "offset": offset,
                    "timeout": timeout_secs,
                    "allowed_updates": ["message", "callback_query"],
                }),
            )
            .await?;

        serde_json::from_value(result).context("failed to decode Telegram updates")
    }

    pub async fn set_webhook(&self, url: &str, secret: &str) -> anyhow::Result<()> {
        let mut body = json!({
            "url": url,
            "allowed_updates": ["message", "callback_query"],
        });
        if !secret.is_empty() {
            body["secret_token"] = json!(secret);
        }
        self.call("setWebhook", body).await?;
        Ok(())
    }

    pub async fn delete_webhook(&self) -> anyhow::Result<()> {
        self.call("deleteWebhook", json!({})).await?;
        Ok(())
    }
}

/// Single-column `inline_keyboard` markup.
pub fn keyboard_markup(keyboard: &Keyboard) -> Value {
    let rows: Vec<Value> = keyboard
        .buttons
        .iter()
        .map(|b| json!([{ "text": b.label, "callback_data": b.payload }]))
        .collect();
    json!({ "inline_keyboard": rows })
}

#[async_trait]
impl MessagingProvider for TelegramClient {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> anyhow::Result<()> {
        let mut body = json!({ "chat_id": chat_id, "text": text });
        if let Some(kb) = keyboard {
            body["reply_markup"] = keyboard_markup(kb);
        }
        self.call("sendMessage", body).await?;
        Ok(())
    }

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> anyhow::Result<()> {
        let mut body = json!({ "chat_id": chat_id, "message_id": message_id, "text": text });
        if let Some(kb) = keyboard {
            body["reply_markup"] = keyboard_markup(kb);
        }
        self.call("editMessageText", body).await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> anyhow::Result<()> {
        let mut body = json!({ "callback_query_id": callback_id });
        if let Some(text) = text {
            body["text"] = json!(text);
        }
        self.call("answerCallbackQuery", body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CallbackData;

    #[test]
    fn test_keyboard_markup_is_single_column() {
        let keyboard = Keyboard::single_column(vec![
            ("Aziz".to_string(), CallbackData::Provider(1)),
            ("Bobur".to_string(), CallbackData::Provider(2)),
        ]);
        let markup = keyboard_markup(&keyboard);

        let rows = markup["inline_keyboard"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].as_array().unwrap().len(), 1);
        assert_eq!(rows[0][0]["text"], "Aziz");
        assert_eq!(rows[1][0]["callback_data"], "provider:2");
    }
}
