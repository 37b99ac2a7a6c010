pub mod dsp;
pub mod recorder;

pub use dsp::{encode_wav_mono_f32le, resample_mono_f32};
pub use recorder::{AudioCaptureError, AudioRecorder, CapturedAudio};
