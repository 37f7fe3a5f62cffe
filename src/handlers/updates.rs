use std::sync::Arc;

use crate::models::update::{CallbackQuery, IncomingMessage};
use crate::models::{Event, Reply, Update};
use crate::services::conversation;
use crate::state::AppState;

pub const FALLBACK_REPLY: &str = "Something went wrong, please try again with /start.";

/// Where replies to one inbound event go.
#[derive(Debug, Clone)]
struct ReplyTarget {
    chat_id: i64,
    message_id: Option<i64>,
    callback_id: Option<String>,
}

/// Routes one inbound update through the conversation and delivers its replies.
pub async fn handle_update(state: &Arc<AppState>, update: Update) {
    if let Some(query) = update.callback_query {
        handle_callback(state, query).await;
    } else if let Some(message) = update.message {
        handle_message(state, message).await;
    } else {
        tracing::debug!(update_id = update.update_id, "ignoring unsupported update");
    }
}

async fn handle_message(state: &Arc<AppState>, message: IncomingMessage) {
    let (Some(from), Some(text)) = (message.from, message.text) else {
        return;
    };

    let target = ReplyTarget {
        chat_id: message.chat.id,
        message_id: None,
        callback_id: None,
    };

    tracing::info!(user_id = from.id, chat_id = target.chat_id, "incoming message");
    process(state, from.id, Event::from_text(text.trim()), target).await;
}

async fn handle_callback(state: &Arc<AppState>, query: CallbackQuery) {
    let (chat_id, message_id) = match &query.message {
        Some(message) => (message.chat.id, Some(message.message_id)),
        None => (query.from.id, None),
    };

    let target = ReplyTarget {
        chat_id,
        message_id,
        callback_id: Some(query.id),
    };

    let event = Event::from_payload(query.data.as_deref().unwrap_or_default());
    tracing::info!(user_id = query.from.id, chat_id, "incoming selection");
    process(state, query.from.id, event, target).await;
}

async fn process(state: &Arc<AppState>, user_id: i64, event: Event, target: ReplyTarget) {
    match conversation::handle_event(state, user_id, event).await {
        Ok(Some(replies)) => deliver(state, &target, replies).await,
        Ok(None) => {}
        Err(e) => {
            tracing::error!(error = %e, user_id, "conversation processing failed");
            deliver(state, &target, vec![Reply::text(FALLBACK_REPLY)]).await;
        }
    }
}

async fn deliver(state: &Arc<AppState>, target: &ReplyTarget, replies: Vec<Reply>) {
    let mut notice: Option<String> = None;

    for reply in replies {
        let result = match reply {
            Reply::Send { text, keyboard } => {
                state
                    .messaging
                    .send_message(target.chat_id, &text, keyboard.as_ref())
                    .await
            }
            Reply::Edit { text, keyboard } => match target.message_id {
                Some(message_id) => {
                    state
                        .messaging
                        .edit_message(target.chat_id, message_id, &text, keyboard.as_ref())
                        .await
                }
                None => {
                    state
                        .messaging
                        .send_message(target.chat_id, &text, keyboard.as_ref())
                        .await
                }
            },
            Reply::Notify(text) => {
                notice = Some(text);
                Ok(())
            }
        };

        if let Err(e) = result {
            tracing::error!(error = %e, chat_id = target.chat_id, "failed to send reply");
        }
    }

    // Acknowledge the pressed button so the client stops waiting.
    if let Some(callback_id) = &target.callback_id {
        if let Err(e) = state
            .messaging
            .answer_callback(callback_id, notice.as_deref())
            .await
        {
            tracing::error!(error = %e, "failed to answer callback");
        }
    }
}
