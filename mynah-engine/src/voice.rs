use crate::state::{Outcome, StateHandle};
use crate::traits::{CaptureHandle, CaptureSpec, Microphone, SpeechSink};
use mynah_api::client::{ApiClient, ApiError};
use mynah_core::{AudioClip, AudioEncoding, CAPTURE_PREFERENCE, RecordingPhase, Sender};
use std::sync::{Arc, Mutex};

const NO_FORMAT: &str = "No supported audio format found";
const MIC_BLOCKED: &str = "Could not access microphone. Please check permissions.";
const RECORDING_FAILED: &str = "Recording error. Please try again.";
const UNINTELLIGIBLE: &str = "Could not understand audio. Please try again.";
const VOICE_FAILED: &str = "Error processing voice input. Please try again.";
const PLAYBACK_FAILED: &str = "Error playing audio response.";
const NO_RESPONSE: &str = "No response from server. Please check your connection.";

/// Records one utterance and turns it into draft text. The device handle
/// exists only between a successful `start` and the end of `stop`; `finish`
/// consumes it, so the microphone is released on every path.
pub struct VoiceCapture {
    api: Arc<ApiClient>,
    state: StateHandle,
    microphone: Arc<dyn Microphone>,
    active: Mutex<Option<Box<dyn CaptureHandle>>>,
}

impl VoiceCapture {
    pub fn new(api: Arc<ApiClient>, state: StateHandle, microphone: Arc<dyn Microphone>) -> Self {
        Self {
            api,
            state,
            microphone,
            active: Mutex::new(None),
        }
    }

    /// Negotiates an encoding and opens the device. Capture only starts
    /// when both succeed; every failure leaves the phase `Inactive`.
    pub async fn start(&self) -> Outcome {
        {
            let st = self.state.lock();
            if st.recording != RecordingPhase::Inactive || st.is_busy() {
                return Outcome::Ignored;
            }
        }

        let Some(encoding) = self.pick_encoding() else {
            self.state.lock().banner = Some(NO_FORMAT.to_string());
            return Outcome::Failed;
        };
        log::debug!("capture encoding: {encoding:?}");

        match self.microphone.open(&CaptureSpec::default(), encoding).await {
            Ok(handle) => {
                *self.active.lock().unwrap() = Some(handle);
                let mut st = self.state.lock();
                st.recording = RecordingPhase::Recording;
                st.banner = None;
                Outcome::Completed
            }
            Err(err) => {
                log::warn!("microphone open failed: {err:#}");
                self.state.lock().banner = Some(MIC_BLOCKED.to_string());
                Outcome::Failed
            }
        }
    }

    /// Finalizes the capture and sends it for transcription. The transcript
    /// lands in the draft for the user to review; it is never auto-sent.
    pub async fn stop(&self) -> Outcome {
        {
            let mut st = self.state.lock();
            if st.recording != RecordingPhase::Recording {
                return Outcome::Ignored;
            }
            st.recording = RecordingPhase::Stopping;
        }

        let handle = self.active.lock().unwrap().take();
        let Some(handle) = handle else {
            let mut st = self.state.lock();
            st.recording = RecordingPhase::Inactive;
            st.banner = Some(RECORDING_FAILED.to_string());
            return Outcome::Failed;
        };

        let clip = match handle.finish().await {
            Ok(clip) => clip,
            Err(err) => {
                log::warn!("capture finalize failed: {err:#}");
                let mut st = self.state.lock();
                st.recording = RecordingPhase::Inactive;
                st.banner = Some(RECORDING_FAILED.to_string());
                return Outcome::Failed;
            }
        };

        self.state.lock().transcribing = true;
        let result = self.api.transcribe(&clip).await;

        let mut st = self.state.lock();
        st.transcribing = false;
        st.recording = RecordingPhase::Inactive;
        match result {
            Ok(text) => {
                st.draft = text;
                st.banner = None;
                Outcome::Completed
            }
            Err(err) => {
                log::warn!("transcription failed: {err}");
                let text = match err {
                    ApiError::Transport(_) => VOICE_FAILED,
                    _ => UNINTELLIGIBLE,
                };
                st.banner = Some(text.to_string());
                Outcome::Failed
            }
        }
    }

    fn pick_encoding(&self) -> Option<AudioEncoding> {
        CAPTURE_PREFERENCE
            .iter()
            .copied()
            .find(|e| self.microphone.is_supported(*e))
    }
}

/// Speaks bot messages on demand. One message at most is audible; toggling
/// the one already playing stops it, toggling another takes the slot over.
pub struct SpeechPlayback {
    api: Arc<ApiClient>,
    state: StateHandle,
    sink: Arc<dyn SpeechSink>,
}

enum Action {
    Stop,
    Load(String),
}

impl SpeechPlayback {
    pub fn new(api: Arc<ApiClient>, state: StateHandle, sink: Arc<dyn SpeechSink>) -> Self {
        Self { api, state, sink }
    }

    pub async fn toggle(&self, index: usize) -> Outcome {
        let action = {
            let mut st = self.state.lock();
            if st.playback.is_playing(index) {
                Action::Stop
            } else if st.playback.loading().is_some() {
                // One synthesis at a time; other toggles are disabled.
                return Outcome::Ignored;
            } else {
                let Some(message) = st.conversation.message(index) else {
                    return Outcome::Ignored;
                };
                if message.sender != Sender::Bot {
                    return Outcome::Ignored;
                }
                let text = message.text.clone();
                st.playback.begin_loading(index);
                Action::Load(text)
            }
        };

        match action {
            Action::Stop => {
                if let Err(err) = self.sink.stop().await {
                    log::warn!("sink stop failed: {err:#}");
                }
                self.state.lock().playback.finish();
                Outcome::Completed
            }
            Action::Load(text) => self.load_and_play(index, &text).await,
        }
    }

    /// Natural end of the current clip, reported by the embedder.
    pub fn playback_finished(&self) {
        self.state.lock().playback.finish();
    }

    async fn load_and_play(&self, index: usize, text: &str) -> Outcome {
        let bytes = match self.api.synthesize(text).await {
            Ok(bytes) => bytes,
            Err(err) => {
                log::warn!("synthesis failed: {err}");
                let mut st = self.state.lock();
                st.playback.clear();
                st.banner = Some(match &err {
                    ApiError::Transport(_) => NO_RESPONSE.to_string(),
                    ApiError::Api {
                        message: Some(message),
                    } => message.clone(),
                    _ => PLAYBACK_FAILED.to_string(),
                });
                return Outcome::Failed;
            }
        };

        let clip = AudioClip::new(AudioEncoding::Mp3, bytes);
        match self.sink.start(clip).await {
            Ok(()) => {
                let mut st = self.state.lock();
                // A newer toggle may have claimed the loading slot while
                // synthesis ran.
                if st.playback.loading() == Some(index) {
                    st.playback.begin_playing(index);
                }
                Outcome::Completed
            }
            Err(err) => {
                log::warn!("audio sink failed: {err:#}");
                let mut st = self.state.lock();
                st.playback.clear();
                st.banner = Some(PLAYBACK_FAILED.to_string());
                Outcome::Failed
            }
        }
    }
}
