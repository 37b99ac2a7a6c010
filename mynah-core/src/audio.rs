use serde::{Deserialize, Serialize};

/// Container/codec of a finished audio clip. Capture negotiates the first
/// entry of [`CAPTURE_PREFERENCE`] the device supports; `Mp3` only occurs on
/// the playback side, where the synthesis endpoint returns MP3 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioEncoding {
    WebmOpus,
    Webm,
    Mp4,
    Wav,
    Mp3,
}

impl AudioEncoding {
    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioEncoding::WebmOpus => "audio/webm;codecs=opus",
            AudioEncoding::Webm => "audio/webm",
            AudioEncoding::Mp4 => "audio/mp4",
            AudioEncoding::Wav => "audio/wav",
            AudioEncoding::Mp3 => "audio/mp3",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            AudioEncoding::WebmOpus | AudioEncoding::Webm => "webm",
            AudioEncoding::Mp4 => "mp4",
            AudioEncoding::Wav => "wav",
            AudioEncoding::Mp3 => "mp3",
        }
    }
}

/// Capture encodings in preference order, best first.
pub const CAPTURE_PREFERENCE: [AudioEncoding; 4] = [
    AudioEncoding::WebmOpus,
    AudioEncoding::Webm,
    AudioEncoding::Mp4,
    AudioEncoding::Wav,
];

/// One finalized utterance or synthesized reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioClip {
    pub encoding: AudioEncoding,
    pub bytes: Vec<u8>,
}

impl AudioClip {
    pub fn new(encoding: AudioEncoding, bytes: Vec<u8>) -> Self {
        Self { encoding, bytes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preference_order_is_opus_first_wav_last() {
        assert_eq!(CAPTURE_PREFERENCE[0], AudioEncoding::WebmOpus);
        assert_eq!(CAPTURE_PREFERENCE[3], AudioEncoding::Wav);
        assert!(!CAPTURE_PREFERENCE.contains(&AudioEncoding::Mp3));
    }

    #[test]
    fn every_encoding_has_a_concrete_extension() {
        assert_eq!(AudioEncoding::WebmOpus.extension(), "webm");
        assert_eq!(AudioEncoding::Webm.extension(), "webm");
        assert_eq!(AudioEncoding::Mp4.extension(), "mp4");
        assert_eq!(AudioEncoding::Wav.extension(), "wav");
        assert_eq!(AudioEncoding::Mp3.extension(), "mp3");
    }
}
