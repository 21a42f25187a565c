use crate::channel::{Channel, ChatAdmin, DiceEmoji, IncomingMessage, OutgoingMessage};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use todobot_core::{ReplyMarkup, TodoError, TodoResult, MENU_KEYBOARD};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Default Bot API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";

/// Telegram Bot API channel adapter.
///
/// Uses the Telegram Bot HTTP API for sending messages and long-polling
/// (`getUpdates`) for receiving them. Incoming text messages are forwarded
/// through a `tokio::sync::mpsc` channel as [`IncomingMessage`]s.
pub struct TelegramChannel {
    bot_token: String,
    base_url: String,
    client: reqwest::Client,
    poll_timeout: Duration,
    poll_backoff: Duration,
    event_tx: mpsc::Sender<IncomingMessage>,
    event_rx: Option<mpsc::Receiver<IncomingMessage>>,
}

// ── Telegram API response types ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TelegramResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct TelegramUpdate {
    update_id: i64,
    message: Option<TelegramMessagePayload>,
}

#[derive(Debug, Deserialize)]
struct TelegramMessagePayload {
    message_id: i64,
    from: Option<TelegramUser>,
    chat: TelegramChat,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TelegramUser {
    id: i64,
    first_name: String,
    #[serde(default)]
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TelegramChat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct TelegramChatMember {
    status: String,
    user: TelegramUser,
}

// ── Telegram API request types ──────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GetUpdatesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: [&'static str; 1],
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to_message_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<WireMarkup>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WireMarkup {
    Keyboard {
        keyboard: Vec<Vec<KeyboardButton>>,
        resize_keyboard: bool,
        selective: bool,
    },
    Remove {
        remove_keyboard: bool,
        selective: bool,
    },
}

#[derive(Debug, Serialize)]
struct KeyboardButton {
    text: &'static str,
}

#[derive(Debug, Serialize)]
struct SendDiceRequest {
    chat_id: i64,
    emoji: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatIdRequest {
    chat_id: i64,
}

impl WireMarkup {
    fn from_markup(markup: ReplyMarkup) -> Option<Self> {
        match markup {
            ReplyMarkup::None => None,
            ReplyMarkup::Menu => Some(WireMarkup::Keyboard {
                keyboard: MENU_KEYBOARD
                    .iter()
                    .map(|row| row.iter().map(|&text| KeyboardButton { text }).collect())
                    .collect(),
                resize_keyboard: true,
                selective: true,
            }),
            ReplyMarkup::Remove => Some(WireMarkup::Remove {
                remove_keyboard: true,
                selective: true,
            }),
        }
    }
}

// ── Implementation ──────────────────────────────────────────────────────────

impl TelegramChannel {
    /// Create a new `TelegramChannel` talking to the public Bot API.
    ///
    /// * `bot_token` – The bot token obtained from @BotFather.
    /// * `event_buffer` – Capacity of the internal mpsc event buffer.
    pub fn new(bot_token: impl Into<String>, event_buffer: usize) -> Self {
        Self::with_base_url(bot_token, DEFAULT_API_BASE_URL, event_buffer)
    }

    /// Same as [`TelegramChannel::new`] but against another API host
    /// (a local Bot API server, or a mock in tests).
    pub fn with_base_url(
        bot_token: impl Into<String>,
        base_url: impl Into<String>,
        event_buffer: usize,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::channel(event_buffer.max(1));
        Self {
            bot_token: bot_token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            poll_timeout: Duration::from_secs(30),
            poll_backoff: Duration::from_secs(5),
            event_tx,
            event_rx: Some(event_rx),
        }
    }

    /// Long-poll timeout passed to `getUpdates`.
    pub fn poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Pause after a failed poll before trying again.
    pub fn poll_backoff(mut self, backoff: Duration) -> Self {
        self.poll_backoff = backoff;
        self
    }

    /// Take the receiving half of the event channel.
    ///
    /// This can only be called once; subsequent calls return `None`.
    pub fn take_event_receiver(&mut self) -> Option<mpsc::Receiver<IncomingMessage>> {
        self.event_rx.take()
    }

    /// Start long-polling the Telegram `getUpdates` endpoint.
    ///
    /// Runs until the event receiver is dropped, forwarding every incoming
    /// text message through the mpsc channel. Failed polls are logged and
    /// retried after the back-off. It should be spawned onto a Tokio task.
    pub async fn poll_updates(&self) {
        let mut offset: Option<i64> = None;

        loop {
            let (messages, next_offset) = match self.poll_once(offset).await {
                Ok(batch) => batch,
                Err(e) => {
                    warn!(error = %e, backoff_secs = self.poll_backoff.as_secs(), "Telegram poll failed");
                    tokio::time::sleep(self.poll_backoff).await;
                    continue;
                }
            };
            offset = next_offset.or(offset);

            for message in messages {
                // If the receiver is dropped we stop.
                if self.event_tx.send(message).await.is_err() {
                    debug!("Event receiver dropped, stopping Telegram poller");
                    return;
                }
            }
        }
    }

    /// Fetch one batch of updates starting at `offset`.
    ///
    /// Returns the text messages in the batch and the offset that
    /// acknowledges every update seen, or `None` if the batch was empty.
    pub async fn poll_once(
        &self,
        offset: Option<i64>,
    ) -> TodoResult<(Vec<IncomingMessage>, Option<i64>)> {
        let request = GetUpdatesRequest {
            offset,
            timeout: self.poll_timeout.as_secs(),
            allowed_updates: ["message"],
        };
        let updates: Vec<TelegramUpdate> = self.call("getUpdates", &request).await?;

        let next_offset = updates.iter().map(|u| u.update_id + 1).max();
        let messages = updates
            .into_iter()
            .filter_map(|update| update.message)
            .filter_map(|msg| {
                let text = msg.text?;
                Some(IncomingMessage {
                    chat_id: msg.chat.id,
                    sender_id: msg.from.map(|u| u.id),
                    message_id: msg.message_id,
                    text,
                })
            })
            .collect();

        Ok((messages, next_offset))
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.bot_token, method)
    }

    /// POST `payload` to a Bot API method and unwrap the `{ok, result}` envelope.
    async fn call<P, R>(&self, method: &str, payload: &P) -> TodoResult<R>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        // without_url() keeps the bot token out of error messages
        let response = self
            .client
            .post(self.api_url(method))
            .json(payload)
            .send()
            .await
            .map_err(|e| TodoError::Http(format!("Telegram {method} error: {}", e.without_url())))?;

        let raw = response
            .text()
            .await
            .map_err(|e| TodoError::Http(format!("Telegram {method} error: {}", e.without_url())))?;
        let body: TelegramResponse<R> = serde_json::from_str(&raw)?;

        if !body.ok {
            return Err(TodoError::Channel(format!(
                "Telegram {method} failed: {}",
                body.description.unwrap_or_default()
            )));
        }

        body.result
            .ok_or_else(|| TodoError::Channel(format!("Telegram {method} returned no result")))
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, message: OutgoingMessage) -> TodoResult<()> {
        let payload = SendMessageRequest {
            chat_id: message.chat_id,
            text: &message.text,
            reply_to_message_id: message.reply_to_message_id,
            reply_markup: WireMarkup::from_markup(message.markup),
        };
        let _: serde_json::Value = self.call("sendMessage", &payload).await?;
        Ok(())
    }

    async fn send_dice(&self, chat_id: i64, emoji: DiceEmoji) -> TodoResult<()> {
        let payload = SendDiceRequest {
            chat_id,
            emoji: emoji.as_emoji(),
        };
        let _: serde_json::Value = self.call("sendDice", &payload).await?;
        Ok(())
    }

    async fn chat_administrators(&self, chat_id: i64) -> TodoResult<Vec<ChatAdmin>> {
        let members: Vec<TelegramChatMember> = self
            .call("getChatAdministrators", &ChatIdRequest { chat_id })
            .await?;

        Ok(members
            .into_iter()
            .map(|m| ChatAdmin {
                user_id: m.user.id,
                first_name: m.user.first_name,
                username: m.user.username,
                status: m.status,
            })
            .collect())
    }
}
