use crate::state::{Outcome, StateHandle};
use mynah_api::client::{ApiClient, ApiError};
use mynah_core::{RequestStatus, idempotency_key};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

const CHAT_FAILED: &str = "Failed to connect to the server. Please try again.";
const NO_RESPONSE: &str = "No response from server. Please check your connection.";
const CLEAR_FAILED: &str = "Failed to clear context. Please try again.";

/// Drives one chat turn at a time: optimistic user append, a single request,
/// then the bot reply or an inline error. The log is append-only and ordered
/// by submission; nothing is retried.
pub struct TurnOrchestrator {
    api: Arc<ApiClient>,
    state: StateHandle,
}

impl TurnOrchestrator {
    pub fn new(api: Arc<ApiClient>, state: StateHandle) -> Self {
        Self { api, state }
    }

    /// Submits the current draft. Blank drafts, an in-flight turn or
    /// transcription, and an active recording all make this a no-op.
    pub async fn submit(&self) -> Outcome {
        let (question, session) = {
            let mut st = self.state.lock();
            if st.is_busy() || st.recording.is_active() {
                return Outcome::Ignored;
            }
            let question = st.draft.trim().to_string();
            if question.is_empty() {
                return Outcome::Ignored;
            }

            // The user message lands before the request goes out.
            st.conversation.append_user(&question);
            st.draft.clear();
            st.banner = None;
            st.turn = RequestStatus::Pending;
            (question, st.conversation.session_id().cloned())
        };

        let key = idempotency_key(session.as_ref(), epoch_ms(), &question);
        log::debug!("chat turn ({} chars), key {key}", question.len());

        let result = self.api.send_chat(&question, session.as_ref(), &key).await;

        let mut st = self.state.lock();
        match result {
            Ok(reply) => {
                if let Some(id) = reply.session_id {
                    st.conversation.set_session(id);
                }
                st.conversation.append_bot(reply.answer);
                st.turn = RequestStatus::Idle;
                Outcome::Completed
            }
            Err(err) => {
                log::warn!("chat turn failed: {err}");
                let text = match &err {
                    ApiError::Transport(_) => NO_RESPONSE.to_string(),
                    ApiError::Api { message } => {
                        message.clone().unwrap_or_else(|| CHAT_FAILED.to_string())
                    }
                    _ => CHAT_FAILED.to_string(),
                };
                st.conversation.append_error(format!("Error: {text}"));
                st.banner = Some(text.clone());
                st.turn = RequestStatus::Error(text);
                Outcome::Failed
            }
        }
    }

    /// Clears the server-side context for the current session, then resets
    /// the local conversation as one unit. Without a session there is
    /// nothing to clear; on failure everything is kept.
    pub async fn clear_context(&self) -> Outcome {
        let Some(session) = self.state.lock().conversation.session_id().cloned() else {
            return Outcome::Ignored;
        };

        match self.api.clear_context(&session).await {
            Ok(()) => {
                let mut st = self.state.lock();
                st.conversation.reset();
                st.banner = None;
                Outcome::Completed
            }
            Err(err) => {
                log::warn!("context clear failed: {err}");
                let mut st = self.state.lock();
                let text = match &err {
                    ApiError::Api {
                        message: Some(message),
                    } => message.clone(),
                    _ => CLEAR_FAILED.to_string(),
                };
                st.banner = Some(text);
                Outcome::Failed
            }
        }
    }
}

fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
