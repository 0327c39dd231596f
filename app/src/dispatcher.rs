//! Glue between inbound updates, the state machine and an outbound sink.

use crate::error::Result;
use crate::event::Event;
use crate::navigation::Navigator;
use crate::presentation::{Delivery, FAILURE_NOTICE, Outbound};
use crate::session::{SessionId, SessionStore};
use crate::telegram::Update;
use tracing::{debug, error, info, warn};

/// Somewhere outbound messages can be delivered to.
pub trait MessageSink {
    /// Delivers one message. `origin` is the message whose button produced
    /// the event, used for [`Delivery::EditOrigin`].
    fn send(
        &self,
        chat_id: i64,
        origin: Option<i64>,
        message: &Outbound,
    ) -> impl Future<Output = Result<()>> + Send;

    fn acknowledge(&self, callback_query_id: &str) -> impl Future<Output = Result<()>> + Send;
}

/// An update reduced to what the state machine cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub session: SessionId,
    pub chat_id: i64,
    pub origin: Option<i64>,
    pub callback_query_id: Option<String>,
    pub event: Event,
}

impl Inbound {
    /// Returns `None` for updates the bot does not react to.
    pub fn from_update(update: &Update) -> Option<Self> {
        if let Some(query) = &update.callback_query {
            let message = query.message.as_ref()?;
            let data = query.data.as_deref().unwrap_or_default();
            return Some(Self {
                session: SessionId(query.from.id),
                chat_id: message.chat.id,
                origin: Some(message.message_id),
                callback_query_id: Some(query.id.clone()),
                event: Event::from_callback_data(data),
            });
        }

        let message = update.message.as_ref()?;
        let text = message.text.as_deref()?;
        if !is_start_command(text) {
            return None;
        }

        Some(Self {
            session: SessionId(message.from.as_ref().map_or(message.chat.id, |u| u.id)),
            chat_id: message.chat.id,
            origin: None,
            callback_query_id: None,
            event: Event::Start,
        })
    }
}

// Accepts `/start`, `/start@SomeBot` and `/start <payload>`.
fn is_start_command(text: &str) -> bool {
    let command = text.split_whitespace().next().unwrap_or_default();
    let command = command.split('@').next().unwrap_or_default();
    command == "/start"
}

pub struct Dispatcher<'a, S> {
    navigator: Navigator<'a>,
    sessions: S,
}

impl<'a, S: SessionStore> Dispatcher<'a, S> {
    pub fn new(navigator: Navigator<'a>, sessions: S) -> Self {
        Self {
            navigator,
            sessions,
        }
    }

    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    pub async fn dispatch<K: MessageSink>(&self, update: &Update, sink: &K) {
        let Some(inbound) = Inbound::from_update(update) else {
            // Inline-mode queries carry no message but still show a spinner.
            if let Some(query) = &update.callback_query {
                acknowledge(sink, &query.id).await;
            }
            debug!("Ignoring update {}", update.update_id);
            return;
        };

        if let Some(id) = &inbound.callback_query_id {
            acknowledge(sink, id).await;
        }

        info!("Chat {}: {}", inbound.chat_id, inbound.event);

        let session = self.sessions.get(inbound.session);
        let transition = self.navigator.handle(session, &inbound.event);
        self.sessions.put(inbound.session, transition.session);

        deliver(sink, inbound.chat_id, inbound.origin, &transition.messages).await;
    }
}

/// Sends `messages` in order and stops at the first failure.
///
/// A failed edit is only logged. Any other failure is reported to the user
/// with the generic failure notice. Nothing is retried.
pub async fn deliver<K: MessageSink>(
    sink: &K,
    chat_id: i64,
    origin: Option<i64>,
    messages: &[Outbound],
) {
    for message in messages {
        let Err(e) = sink.send(chat_id, origin, message).await else {
            continue;
        };

        error!("Failed to deliver message to chat {}: {}", chat_id, e);

        let was_edit = matches!(
            message,
            Outbound::Text {
                delivery: Delivery::EditOrigin,
                ..
            }
        ) && origin.is_some();

        if was_edit {
            return;
        }

        if let Err(e) = sink
            .send(chat_id, None, &Outbound::text(FAILURE_NOTICE))
            .await
        {
            error!("Failed to send failure notice to chat {}: {}", chat_id, e);
        }
        return;
    }
}

async fn acknowledge<K: MessageSink>(sink: &K, callback_query_id: &str) {
    if let Err(e) = sink.acknowledge(callback_query_id).await {
        warn!(
            "Failed to answer callback query {}: {}",
            callback_query_id, e
        );
    }
}
