use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use mynah_core::SessionId;
use serde::Deserialize;
use thiserror::Error;

/// A reply the service marked as failed, or one missing the payload a
/// successful reply must carry. HTTP 2xx is no guarantee of success; only
/// `status == "success"` plus the expected payload counts.
///
/// `message` holds the server's own wording when it offered any, else the
/// HTTP status phrase for non-2xx replies. `None` means a nominally-2xx
/// reply with nothing quotable; callers substitute their own fallback text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("service failure: {}", .message.as_deref().unwrap_or("no detail"))]
pub struct ServiceFailure {
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub answer: String,
    pub session_id: Option<SessionId>,
}

#[derive(Debug, Deserialize)]
struct ChatEnvelope {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<ChatData>,
}

#[derive(Debug, Deserialize)]
struct ChatData {
    answer: String,
    #[serde(default)]
    session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AckEnvelope {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptEnvelope {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SpeechEnvelope {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    audio: Option<String>,
}

pub fn parse_chat(status: u16, body: &[u8]) -> Result<ChatReply, ServiceFailure> {
    match serde_json::from_slice::<ChatEnvelope>(body) {
        Ok(env) if is_success(&env.status) => match env.data {
            Some(data) => Ok(ChatReply {
                answer: data.answer,
                session_id: data.session_id.map(SessionId::new),
            }),
            // A success flag without an answer is still a failure, and the
            // success message is not quotable as an error.
            None => Err(failure(status, None)),
        },
        Ok(env) => Err(failure(status, env.message)),
        Err(_) => Err(failure(status, None)),
    }
}

/// For endpoints whose success carries no payload the client uses
/// (context clear, ingestion, health).
pub fn parse_ack(status: u16, body: &[u8]) -> Result<(), ServiceFailure> {
    match serde_json::from_slice::<AckEnvelope>(body) {
        Ok(env) if is_success(&env.status) => Ok(()),
        Ok(env) => Err(failure(status, env.message)),
        Err(_) => Err(failure(status, None)),
    }
}

/// An empty transcript counts as a failure; there is nothing to put in the
/// input draft.
pub fn parse_transcript(status: u16, body: &[u8]) -> Result<String, ServiceFailure> {
    match serde_json::from_slice::<TranscriptEnvelope>(body) {
        Ok(env) if is_success(&env.status) => match env.text.filter(|t| !t.is_empty()) {
            Some(text) => Ok(text),
            None => Err(failure(status, None)),
        },
        Ok(env) => Err(failure(status, env.message)),
        Err(_) => Err(failure(status, None)),
    }
}

/// Returns the base64 payload as sent; [`decode_audio`] turns it into bytes.
pub fn parse_speech(status: u16, body: &[u8]) -> Result<String, ServiceFailure> {
    match serde_json::from_slice::<SpeechEnvelope>(body) {
        Ok(env) if is_success(&env.status) => match env.audio.filter(|a| !a.is_empty()) {
            Some(audio) => Ok(audio),
            None => Err(failure(status, None)),
        },
        Ok(env) => Err(failure(status, env.message)),
        Err(_) => Err(failure(status, None)),
    }
}

/// Decodes the synthesized-speech payload. Isolated from playback so
/// malformed payloads are testable without an audio device.
pub fn decode_audio(b64: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(b64)
}

fn is_success(status: &Option<String>) -> bool {
    status.as_deref() == Some("success")
}

fn failure(status: u16, message: Option<String>) -> ServiceFailure {
    let message = message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .or_else(|| status_phrase(status));
    ServiceFailure { message }
}

fn status_phrase(status: u16) -> Option<String> {
    if (200..300).contains(&status) {
        return None;
    }
    let phrase = reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason());
    Some(match phrase {
        Some(p) => p.to_string(),
        None => format!("HTTP {status}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_success_yields_answer_and_session() {
        let body = br#"{"status":"success","message":"Request successful","data":{"question":"What is X?","answer":"X is Y","timestamp":"2024-01-01T00:00:00Z","session_id":"abc"}}"#;
        let reply = parse_chat(200, body).unwrap();
        assert_eq!(reply.answer, "X is Y");
        assert_eq!(reply.session_id, Some(SessionId::new("abc")));
    }

    #[test]
    fn two_hundred_with_error_status_is_a_failure() {
        let body = br#"{"status":"error","message":"Question is required"}"#;
        let err = parse_chat(200, body).unwrap_err();
        assert_eq!(err.message.as_deref(), Some("Question is required"));
    }

    #[test]
    fn success_flag_without_payload_is_a_failure_with_no_quotable_text() {
        let body = br#"{"status":"success","message":"Request successful"}"#;
        let err = parse_chat(200, body).unwrap_err();
        assert_eq!(err.message, None);
    }

    #[test]
    fn non_2xx_without_message_falls_back_to_the_status_phrase() {
        let err = parse_ack(500, b"").unwrap_err();
        assert_eq!(err.message.as_deref(), Some("Internal Server Error"));

        let err = parse_ack(599, b"not json").unwrap_err();
        assert_eq!(err.message.as_deref(), Some("HTTP 599"));
    }

    #[test]
    fn envelope_message_wins_over_the_status_phrase() {
        let body = br#"{"status":"error","message":"No file or URL provided"}"#;
        let err = parse_ack(400, body).unwrap_err();
        assert_eq!(err.message.as_deref(), Some("No file or URL provided"));
    }

    #[test]
    fn ack_success_is_accepted() {
        let body = br#"{"status":"success","message":"Context cleared successfully"}"#;
        assert!(parse_ack(200, body).is_ok());
    }

    #[test]
    fn empty_transcript_is_a_failure() {
        let body = br#"{"status":"success","text":""}"#;
        assert!(parse_transcript(200, body).is_err());

        let body = br#"{"status":"success","text":"hello world"}"#;
        assert_eq!(parse_transcript(200, body).unwrap(), "hello world");
    }

    #[test]
    fn speech_payload_decodes_to_bytes() {
        let body = br#"{"status":"success","audio":"AQID"}"#;
        let b64 = parse_speech(200, body).unwrap();
        assert_eq!(decode_audio(&b64).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn corrupt_base64_is_rejected() {
        assert!(decode_audio("not base64!!").is_err());
    }
}
