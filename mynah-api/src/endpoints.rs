use crate::request::{HttpRequest, MultipartForm};
use mynah_core::{AudioClip, DocumentUpload, SessionId};
use serde_json::json;

pub fn chat_request(
    base_url: &str,
    question: &str,
    session: Option<&SessionId>,
    idempotency_key: &str,
) -> HttpRequest {
    let mut req = HttpRequest::post_json(
        join_url(base_url, "/api/v1/chat"),
        &json!({ "question": question }),
    )
    .with_header("X-Idempotency-Key", idempotency_key);

    if let Some(session) = session {
        req = req.with_header("X-Session-ID", session.as_str());
    }
    req
}

/// Clearing is always scoped to one session; callers without a session id
/// have nothing to clear.
pub fn clear_context_request(base_url: &str, session: &SessionId) -> HttpRequest {
    HttpRequest::delete(join_url(base_url, "/api/v1/context"))
        .with_header("X-Session-ID", session.as_str())
}

pub fn ingest_file_request(base_url: &str, doc: &DocumentUpload) -> HttpRequest {
    let form = MultipartForm::new().file(
        "file",
        &doc.filename,
        doc.kind.mime_type(),
        &doc.bytes,
    );
    HttpRequest::post_form(join_url(base_url, "/api/v1/rag"), form)
}

pub fn ingest_url_request(base_url: &str, url: &str) -> HttpRequest {
    HttpRequest::post_json(join_url(base_url, "/api/v1/rag"), &json!({ "url": url }))
}

pub fn transcribe_request(base_url: &str, clip: &AudioClip) -> HttpRequest {
    let filename = format!("recording.{}", clip.encoding.extension());
    let form = MultipartForm::new().file(
        "audio",
        &filename,
        clip.encoding.mime_type(),
        &clip.bytes,
    );
    HttpRequest::post_form(join_url(base_url, "/api/v1/voice/speech-to-text"), form)
}

pub fn synthesize_request(base_url: &str, text: &str) -> HttpRequest {
    HttpRequest::post_json(
        join_url(base_url, "/api/v1/voice/text-to-speech"),
        &json!({ "text": text }),
    )
}

pub fn health_request(base_url: &str) -> HttpRequest {
    HttpRequest::get(join_url(base_url, "/api/v1/health"))
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}
