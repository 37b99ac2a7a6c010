use uuid::Uuid;

/// A fully described request, as pure data. Builders produce these and the
/// client executes them, so every endpoint's exact wire shape is assertable
/// in tests without a server.
#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Empty,
    Json(String),
    MultipartFormData { boundary: String, bytes: Vec<u8> },
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self::bare("GET", url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::bare("DELETE", url)
    }

    pub fn post_json(url: impl Into<String>, payload: &serde_json::Value) -> Self {
        Self {
            method: "POST".into(),
            url: url.into(),
            headers: vec![
                ("Content-Type".into(), "application/json".into()),
                ("Accept".into(), "application/json".into()),
            ],
            body: Body::Json(payload.to_string()),
        }
    }

    pub fn post_form(url: impl Into<String>, form: MultipartForm) -> Self {
        let content_type = form.content_type();
        Self {
            method: "POST".into(),
            url: url.into(),
            headers: vec![
                ("Content-Type".into(), content_type),
                ("Accept".into(), "application/json".into()),
            ],
            body: form.finish(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn bare(method: &str, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: vec![("Accept".into(), "application/json".into())],
            body: Body::Empty,
        }
    }
}

// Bodies carry whole documents and audio clips; Debug prints their size,
// not their bytes.
impl std::fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let body_summary = match &self.body {
            Body::Empty => "Empty".to_string(),
            Body::Json(s) => format!("Json(len={})", s.len()),
            Body::MultipartFormData { boundary, bytes } => {
                format!(
                    "MultipartFormData(boundary={}, bytes_len={})",
                    boundary,
                    bytes.len()
                )
            }
        };

        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("body", &body_summary)
            .finish()
    }
}

/// Hand-assembled `multipart/form-data` body with CRLF framing. Every form
/// the service receives carries a single file part, so that is all the
/// builder offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartForm {
    boundary: String,
    bytes: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self {
            boundary: format!("Boundary-{}", Uuid::new_v4()),
            bytes: Vec::new(),
        }
    }

    pub fn file(mut self, name: &str, filename: &str, mime_type: &str, content: &[u8]) -> Self {
        self.bytes
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.bytes.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        self.bytes
            .extend_from_slice(format!("Content-Type: {mime_type}\r\n\r\n").as_bytes());
        self.bytes.extend_from_slice(content);
        self.bytes.extend_from_slice(b"\r\n");
        self
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    fn finish(mut self) -> Body {
        self.bytes
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        Body::MultipartFormData {
            boundary: self.boundary,
            bytes: self.bytes,
        }
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = HttpRequest::get("http://localhost:8000/api/v1/health")
            .with_header("X-Session-ID", "abc");
        assert_eq!(req.header("x-session-id"), Some("abc"));
        assert_eq!(req.header("accept"), Some("application/json"));
    }

    #[test]
    fn multipart_form_frames_a_file_part() {
        let form = MultipartForm::new().file("audio", "recording.wav", "audio/wav", b"RIFF");
        let content_type = form.content_type();
        let req = HttpRequest::post_form("http://localhost:8000/api/v1/voice/speech-to-text", form);

        assert_eq!(req.header("content-type"), Some(content_type.as_str()));
        match &req.body {
            Body::MultipartFormData { boundary, bytes } => {
                let s = String::from_utf8_lossy(bytes);
                assert!(content_type.ends_with(boundary.as_str()));
                assert!(s.contains("name=\"audio\"; filename=\"recording.wav\""));
                assert!(s.contains("Content-Type: audio/wav"));
                assert!(s.contains("RIFF"));
                assert!(s.ends_with(&format!("--{boundary}--\r\n")));
            }
            other => panic!("expected multipart body, got {other:?}"),
        }
    }

    #[test]
    fn debug_summarizes_body_bytes() {
        let form = MultipartForm::new().file("file", "data.csv", "text/csv", &[0u8; 4096]);
        let req = HttpRequest::post_form("http://localhost:8000/api/v1/rag", form);
        let s = format!("{req:?}");
        assert!(s.contains("bytes_len="));
        assert!(!s.contains("\\0"));
    }
}
