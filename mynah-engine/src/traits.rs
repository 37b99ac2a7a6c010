use async_trait::async_trait;
use mynah_core::{AudioClip, AudioEncoding};
use serde::{Deserialize, Serialize};

/// What capture asks of the device: one channel at speech rate, with the
/// device-side cleanups on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSpec {
    pub channels: u16,
    pub sample_rate_hz: u32,
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
}

impl Default for CaptureSpec {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate_hz: 16_000,
            echo_cancellation: true,
            noise_suppression: true,
        }
    }
}

/// Microphone access. Real devices and test doubles both live behind this;
/// the orchestrator never touches audio hardware directly.
#[async_trait]
pub trait Microphone: Send + Sync {
    /// Whether the device can deliver a finished clip in this encoding.
    fn is_supported(&self, encoding: AudioEncoding) -> bool;

    async fn open(
        &self,
        spec: &CaptureSpec,
        encoding: AudioEncoding,
    ) -> anyhow::Result<Box<dyn CaptureHandle>>;
}

/// A capture in progress. `finish` consumes the handle, so the device is
/// released on every path; an error yields no clip.
#[async_trait]
pub trait CaptureHandle: Send {
    async fn finish(self: Box<Self>) -> anyhow::Result<AudioClip>;
}

/// The single audio output slot. Starting a clip replaces whatever held the
/// slot; `start` resolves once playback has begun, and the embedder reports
/// natural completion back through the playback orchestrator.
#[async_trait]
pub trait SpeechSink: Send + Sync {
    async fn start(&self, clip: AudioClip) -> anyhow::Result<()>;

    /// Stop and rewind.
    async fn stop(&self) -> anyhow::Result<()>;
}
