use serde::{Deserialize, Serialize};

/// Lifecycle of one request channel. `Error` is idle-with-history: the last
/// attempt failed and its user-facing text is retained, but a new submission
/// is allowed. Only `Pending` blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    Idle,
    Pending,
    Error(String),
}

impl RequestStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestStatus::Pending)
    }

    pub fn can_submit(&self) -> bool {
        !self.is_pending()
    }

    pub fn last_error(&self) -> Option<&str> {
        match self {
            RequestStatus::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

impl Default for RequestStatus {
    fn default() -> Self {
        RequestStatus::Idle
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordingPhase {
    Inactive,
    Recording,
    Stopping,
}

impl RecordingPhase {
    pub fn is_active(&self) -> bool {
        !matches!(self, RecordingPhase::Inactive)
    }
}

impl Default for RecordingPhase {
    fn default() -> Self {
        RecordingPhase::Inactive
    }
}

/// Which log entry is audible and which is waiting on synthesis. An index is
/// never in both slots: starting to load clears `playing` and starting to
/// play clears `loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Playback {
    playing: Option<usize>,
    loading: Option<usize>,
}

impl Playback {
    pub fn playing(&self) -> Option<usize> {
        self.playing
    }

    pub fn loading(&self) -> Option<usize> {
        self.loading
    }

    pub fn is_playing(&self, index: usize) -> bool {
        self.playing == Some(index)
    }

    pub fn is_idle(&self) -> bool {
        self.playing.is_none() && self.loading.is_none()
    }

    pub fn begin_loading(&mut self, index: usize) {
        self.loading = Some(index);
        self.playing = None;
    }

    pub fn begin_playing(&mut self, index: usize) {
        self.playing = Some(index);
        self.loading = None;
    }

    /// Natural end of playback.
    pub fn finish(&mut self) {
        self.playing = None;
    }

    pub fn clear(&mut self) {
        self.playing = None;
        self.loading = None;
    }
}
