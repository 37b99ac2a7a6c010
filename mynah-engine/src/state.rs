use mynah_core::{
    Conversation, DocumentUpload, Message, Playback, RecordingPhase, RequestStatus, SessionId,
};
use std::sync::{Arc, Mutex, MutexGuard};

/// How an orchestrator operation ended. Failures are already written into
/// the shared state by the time this is returned; no error crosses the
/// orchestrator boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Failed,
    /// Entry conditions not met; nothing changed and no request was issued.
    Ignored,
}

/// Everything the front-end renders, in one place. Mutations happen inside
/// short lock sections between awaits, so each handler observes the same
/// run-to-completion semantics a single-threaded event loop would give it.
#[derive(Debug, Default)]
pub struct ClientState {
    pub conversation: Conversation,
    /// The input box. Voice transcription lands here; submission drains it.
    pub draft: String,
    /// Single dismissible error banner, last write wins.
    pub banner: Option<String>,
    pub turn: RequestStatus,
    pub ingest: RequestStatus,
    pub recording: RecordingPhase,
    /// Speech-to-text in flight. Shares the busy affordance with the turn
    /// channel without occupying it.
    pub transcribing: bool,
    pub playback: Playback,
    pub staged_file: Option<DocumentUpload>,
    /// URL input for ingestion; empty means none.
    pub staged_url: String,
}

impl ClientState {
    pub fn is_busy(&self) -> bool {
        self.turn.is_pending() || self.transcribing
    }
}

/// Shared handle to [`ClientState`]. Orchestrators mutate through it; the
/// front-end reads snapshots.
#[derive(Debug, Clone, Default)]
pub struct StateHandle {
    inner: Arc<Mutex<ClientState>>,
}

impl StateHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, ClientState> {
        self.inner.lock().unwrap()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.lock().conversation.messages().to_vec()
    }

    pub fn message_count(&self) -> usize {
        self.lock().conversation.len()
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.lock().conversation.session_id().cloned()
    }

    pub fn context(&self) -> String {
        self.lock().conversation.context().to_string()
    }

    pub fn banner(&self) -> Option<String> {
        self.lock().banner.clone()
    }

    pub fn dismiss_banner(&self) {
        self.lock().banner = None;
    }

    pub fn draft(&self) -> String {
        self.lock().draft.clone()
    }

    pub fn set_draft(&self, text: &str) {
        self.lock().draft = text.to_string();
    }

    pub fn turn_status(&self) -> RequestStatus {
        self.lock().turn.clone()
    }

    pub fn ingest_status(&self) -> RequestStatus {
        self.lock().ingest.clone()
    }

    pub fn recording_phase(&self) -> RecordingPhase {
        self.lock().recording
    }

    pub fn playback(&self) -> Playback {
        self.lock().playback
    }

    pub fn staged_filename(&self) -> Option<String> {
        self.lock().staged_file.as_ref().map(|d| d.filename.clone())
    }

    pub fn staged_url(&self) -> String {
        self.lock().staged_url.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.lock().is_busy()
    }

    /// The send affordance: something to send, nothing in flight, and not
    /// mid-recording.
    pub fn can_send(&self) -> bool {
        let st = self.lock();
        !st.is_busy() && !st.draft.trim().is_empty() && !st.recording.is_active()
    }

    pub fn can_record(&self) -> bool {
        let st = self.lock();
        !st.is_busy() && st.recording == RecordingPhase::Inactive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_idle_everywhere() {
        let state = StateHandle::new();
        assert!(state.messages().is_empty());
        assert!(state.session_id().is_none());
        assert_eq!(state.context(), "");
        assert!(state.banner().is_none());
        assert!(!state.is_busy());
        assert!(state.can_record());
        assert!(!state.can_send());
    }

    #[test]
    fn send_affordance_needs_a_non_blank_draft() {
        let state = StateHandle::new();
        state.set_draft("   ");
        assert!(!state.can_send());
        state.set_draft("hello");
        assert!(state.can_send());
    }

    #[test]
    fn transcription_in_flight_blocks_send_and_record() {
        let state = StateHandle::new();
        state.set_draft("hello");
        state.lock().transcribing = true;
        assert!(state.is_busy());
        assert!(!state.can_send());
        assert!(!state.can_record());
    }

    #[test]
    fn banner_is_dismissible() {
        let state = StateHandle::new();
        state.lock().banner = Some("Failed to upload. Please try again.".into());
        assert!(state.banner().is_some());
        state.dismiss_banner();
        assert!(state.banner().is_none());
    }
}
