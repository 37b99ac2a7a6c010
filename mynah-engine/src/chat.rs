use crate::ingest::IngestOrchestrator;
use crate::state::{Outcome, StateHandle};
use crate::traits::{Microphone, SpeechSink};
use crate::turn::TurnOrchestrator;
use crate::voice::{SpeechPlayback, VoiceCapture};
use mynah_api::client::ApiClient;
use std::sync::Arc;

/// The whole client behind one handle: conversation state plus the four
/// request orchestrators, wired to an API client and the two audio
/// capabilities. Front-ends call these methods and render the state.
pub struct ChatClient {
    state: StateHandle,
    turn: TurnOrchestrator,
    ingest: IngestOrchestrator,
    capture: VoiceCapture,
    playback: SpeechPlayback,
}

impl ChatClient {
    pub fn new(api: ApiClient, microphone: Arc<dyn Microphone>, sink: Arc<dyn SpeechSink>) -> Self {
        let api = Arc::new(api);
        let state = StateHandle::new();
        Self {
            turn: TurnOrchestrator::new(api.clone(), state.clone()),
            ingest: IngestOrchestrator::new(api.clone(), state.clone()),
            capture: VoiceCapture::new(api.clone(), state.clone(), microphone),
            playback: SpeechPlayback::new(api, state.clone(), sink),
            state,
        }
    }

    pub fn state(&self) -> &StateHandle {
        &self.state
    }

    pub fn set_draft(&self, text: &str) {
        self.state.set_draft(text);
    }

    pub async fn submit(&self) -> Outcome {
        self.turn.submit().await
    }

    pub async fn clear_context(&self) -> Outcome {
        self.turn.clear_context().await
    }

    pub fn select_file(&self, filename: &str, bytes: Vec<u8>) -> bool {
        self.ingest.select_file(filename, bytes)
    }

    pub fn set_url(&self, url: &str) {
        self.ingest.set_url(url);
    }

    pub fn clear_selection(&self) {
        self.ingest.clear_selection();
    }

    pub async fn upload(&self) -> Outcome {
        self.ingest.upload().await
    }

    pub async fn start_recording(&self) -> Outcome {
        self.capture.start().await
    }

    pub async fn stop_recording(&self) -> Outcome {
        self.capture.stop().await
    }

    pub async fn toggle_playback(&self, index: usize) -> Outcome {
        self.playback.toggle(index).await
    }

    pub fn playback_finished(&self) {
        self.playback.playback_finished();
    }
}
