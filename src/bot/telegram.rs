// src/bot/telegram.rs

//! Telegram Bot API transport and the long-polling loop.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::bot::render::{OutgoingMessage, ParseMode};
use crate::bot::service::BotService;
use crate::bot::types::{ApiResponse, Update, User};
use crate::error::{AppError, Result};
use crate::models::BotConfig;

/// Pause after a failed poll before trying again.
pub const POLL_BACKOFF: Duration = Duration::from_secs(5);

/// Delivery channel used by the polling loop.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Long-poll for updates with IDs at or above `offset`.
    async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>>;

    async fn send_message(&self, chat_id: i64, message: &OutgoingMessage) -> Result<()>;

    async fn answer_callback(&self, callback_id: &str) -> Result<()>;
}

/// HTTP client for the Bot API.
pub struct TelegramClient {
    client: Client,
    base: String,
}

impl TelegramClient {
    pub fn new(config: &BotConfig) -> Result<Self> {
        if config.token.trim().is_empty() {
            return Err(AppError::config("bot token is empty"));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.poll_timeout_secs + 10))
            .build()?;
        Ok(Self {
            client,
            base: format!("{}/bot{}", config.api_base.trim_end_matches('/'), config.token),
        })
    }

    /// Identity of the bot behind the token.
    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", &json!({})).await
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, body: &Value) -> Result<T> {
        let response = self
            .client
            .post(format!("{}/{}", self.base, method))
            .json(body)
            .send()
            .await?;
        let envelope: ApiResponse<T> = response.json().await?;
        match envelope {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse { description, .. } => Err(AppError::Telegram {
                method: method.to_string(),
                message: description.unwrap_or_else(|| "no description".to_string()),
            }),
        }
    }
}

/// JSON body of a `sendMessage` call.
pub fn message_body(chat_id: i64, message: &OutgoingMessage) -> Value {
    let mut body = json!({
        "chat_id": chat_id,
        "text": message.text,
    });
    if message.parse_mode == ParseMode::Markdown {
        body["parse_mode"] = json!("Markdown");
    }
    if message.disable_preview {
        body["link_preview_options"] = json!({ "is_disabled": true });
    }
    if !message.buttons.is_empty() {
        let rows: Vec<Value> = message
            .buttons
            .iter()
            .map(|b| json!([{ "text": b.text, "callback_data": b.data }]))
            .collect();
        body["reply_markup"] = json!({ "inline_keyboard": rows });
    }
    body
}

#[async_trait]
impl Transport for TelegramClient {
    async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>> {
        self.call(
            "getUpdates",
            &json!({
                "offset": offset,
                "timeout": timeout_secs,
                "allowed_updates": ["message", "callback_query"],
            }),
        )
        .await
    }

    async fn send_message(&self, chat_id: i64, message: &OutgoingMessage) -> Result<()> {
        let _: Value = self.call("sendMessage", &message_body(chat_id, message)).await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<()> {
        let _: Value = self
            .call("answerCallbackQuery", &json!({ "callback_query_id": callback_id }))
            .await?;
        Ok(())
    }
}

async fn deliver(transport: &dyn Transport, chat_id: i64, messages: Vec<OutgoingMessage>) {
    for message in messages {
        if let Err(e) = transport.send_message(chat_id, &message).await {
            log::warn!("Failed to send message to chat {}: {}", chat_id, e);
        }
    }
}

/// Handle one update. Send failures are logged, never returned.
pub async fn dispatch(transport: &dyn Transport, service: &BotService, update: Update) {
    if let Some(message) = update.message {
        if let Some(text) = message.text.as_deref() {
            let replies = service.handle_text(text);
            deliver(transport, message.chat.id, replies).await;
        }
    } else if let Some(callback) = update.callback_query {
        if let (Some(message), Some(data)) = (callback.message.as_ref(), callback.data.as_deref()) {
            let replies = service.handle_callback(data);
            deliver(transport, message.chat.id, replies).await;
        }
        if let Err(e) = transport.answer_callback(&callback.id).await {
            log::warn!("Failed to answer callback {}: {}", callback.id, e);
        }
    }
}

/// Fetch and handle one batch of updates, returning the next offset.
pub async fn poll_once(
    transport: &dyn Transport,
    service: &BotService,
    offset: i64,
    timeout_secs: u64,
) -> Result<i64> {
    let updates = transport.get_updates(offset, timeout_secs).await?;
    let mut next = offset;
    for update in updates {
        next = next.max(update.update_id + 1);
        dispatch(transport, service, update).await;
    }
    Ok(next)
}

/// Serve updates one at a time until `shutdown` resolves.
pub async fn run_polling<F>(transport: &dyn Transport, service: &BotService, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let timeout = service.config().poll_timeout_secs;
    let mut offset = 0;
    log::info!("Polling for updates");

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            result = poll_once(transport, service, offset, timeout) => match result {
                Ok(next) => offset = next,
                Err(e) => {
                    log::error!("Polling failed: {}", e);
                    tokio::select! {
                        _ = &mut shutdown => break,
                        _ = tokio::time::sleep(POLL_BACKOFF) => {}
                    }
                }
            },
        }
    }
    log::info!("Polling stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use crate::bot::render::InlineButton;
    use crate::models::Document;
    use crate::services::{Corpus, CorpusHandle};

    #[derive(Default)]
    struct MockTransport {
        batches: Mutex<VecDeque<Vec<Update>>>,
        sent: Mutex<Vec<(i64, String)>>,
        answered: Mutex<Vec<String>>,
        fail_sends: bool,
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn get_updates(&self, _offset: i64, _timeout_secs: u64) -> Result<Vec<Update>> {
            Ok(self.batches.lock().unwrap().pop_front().unwrap_or_default())
        }

        async fn send_message(&self, chat_id: i64, message: &OutgoingMessage) -> Result<()> {
            if self.fail_sends {
                return Err(AppError::Telegram {
                    method: "sendMessage".to_string(),
                    message: "blocked".to_string(),
                });
            }
            self.sent.lock().unwrap().push((chat_id, message.text.clone()));
            Ok(())
        }

        async fn answer_callback(&self, callback_id: &str) -> Result<()> {
            self.answered.lock().unwrap().push(callback_id.to_string());
            Ok(())
        }
    }

    fn service() -> BotService {
        let corpus = Corpus::new(vec![Document {
            id: 7,
            title: "Hukum kucing".to_string(),
            url: "https://www.muftiwp.gov.my/ms/artikel/7-x".to_string(),
            date: "1 Mac 2024".to_string(),
            hits: 2,
            category: "Irsyad Hukum - Umum".to_string(),
            content: "Kucing boleh dipelihara.".to_string(),
        }]);
        BotService::new(Arc::new(CorpusHandle::new(corpus)), BotConfig::default())
    }

    fn updates(raw: &str) -> Vec<Update> {
        serde_json::from_str(raw).unwrap()
    }

    #[tokio::test]
    async fn test_poll_once_dispatches_and_advances_offset() {
        let transport = MockTransport::default();
        transport.batches.lock().unwrap().push_back(updates(
            r#"[
                {"update_id": 40, "message": {"message_id": 1, "chat": {"id": 9}, "text": "kucing"}},
                {"update_id": 41, "callback_query": {"id": "cb", "from": {"id": 1},
                    "message": {"message_id": 2, "chat": {"id": 9}}, "data": "view_7"}}
            ]"#,
        ));

        let next = poll_once(&transport, &service(), 0, 1).await.unwrap();
        assert_eq!(next, 42);

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0].1, "🔍 Mencari fatwa...");
        assert!(sent[2].1.starts_with("📖 *Hukum kucing*"));
        assert_eq!(*transport.answered.lock().unwrap(), vec!["cb".to_string()]);
    }

    #[tokio::test]
    async fn test_callback_answered_even_when_unknown() {
        let transport = MockTransport::default();
        let update = updates(
            r#"[{"update_id": 1, "callback_query": {"id": "cb2", "from": {"id": 1},
                "message": {"message_id": 2, "chat": {"id": 9}}, "data": "view_404"}}]"#,
        );
        for u in update {
            dispatch(&transport, &service(), u).await;
        }
        assert!(transport.sent.lock().unwrap().is_empty());
        assert_eq!(transport.answered.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_send_failures_do_not_stop_polling() {
        let transport = MockTransport {
            fail_sends: true,
            ..MockTransport::default()
        };
        transport.batches.lock().unwrap().push_back(updates(
            r#"[{"update_id": 5, "message": {"message_id": 1, "chat": {"id": 9}, "text": "/start"}}]"#,
        ));
        assert_eq!(poll_once(&transport, &service(), 0, 1).await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_run_polling_stops_on_shutdown() {
        let transport = MockTransport::default();
        run_polling(&transport, &service(), async {}).await;
    }

    #[test]
    fn test_message_body() {
        let message = OutgoingMessage::markdown("*hi*")
            .without_preview()
            .with_buttons(vec![InlineButton {
                text: "📖 Baca Fatwa 1".to_string(),
                data: "view_7".to_string(),
            }]);
        let body = message_body(9, &message);
        assert_eq!(body["parse_mode"], "Markdown");
        assert_eq!(body["link_preview_options"]["is_disabled"], true);
        assert_eq!(body["reply_markup"]["inline_keyboard"][0][0]["callback_data"], "view_7");

        let plain = message_body(9, &OutgoingMessage::plain("x"));
        assert!(plain.get("parse_mode").is_none());
        assert!(plain.get("reply_markup").is_none());
    }
}
