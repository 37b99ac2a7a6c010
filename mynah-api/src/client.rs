use crate::endpoints;
use crate::envelope::{self, ChatReply, ServiceFailure};
use crate::request::{Body, HttpRequest};
use anyhow::Context;
use mynah_core::{AudioClip, ClientConfig, DocumentUpload, SessionId};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Why a call against the service did not produce its result. Orchestrators
/// match on this to pick user-facing wording; nothing here is shown to the
/// user verbatim.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No usable response: refused connection, DNS failure, timeout.
    #[error("no response from the service")]
    Transport(#[from] reqwest::Error),

    /// The service answered and declined, or answered nonsense.
    #[error("service failure: {}", .message.as_deref().unwrap_or("no detail"))]
    Api { message: Option<String> },

    /// A success reply whose audio payload was not valid base64.
    #[error("undecodable audio payload")]
    Decode(#[from] base64::DecodeError),

    /// The request could not even be assembled.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<ServiceFailure> for ApiError {
    fn from(failure: ServiceFailure) -> Self {
        ApiError::Api {
            message: failure.message,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Executor for every call the client makes. The underlying reqwest client
/// is built once, with both timeouts fixed up front; a hung endpoint
/// becomes an ordinary `Transport` failure instead of a stuck turn.
#[derive(Debug, Clone)]
pub struct ApiClient {
    cfg: ClientConfig,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(cfg: ClientConfig) -> anyhow::Result<Self> {
        Url::parse(&cfg.base_url).with_context(|| format!("invalid base url: {}", cfg.base_url))?;
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()
            .context("build http client")?;
        Ok(Self { cfg, http })
    }

    pub fn base_url(&self) -> &str {
        &self.cfg.base_url
    }

    pub async fn send_chat(
        &self,
        question: &str,
        session: Option<&SessionId>,
        idempotency_key: &str,
    ) -> Result<ChatReply, ApiError> {
        let req = endpoints::chat_request(&self.cfg.base_url, question, session, idempotency_key);
        let resp = self.execute(&req).await?;
        Ok(envelope::parse_chat(resp.status, &resp.body)?)
    }

    pub async fn clear_context(&self, session: &SessionId) -> Result<(), ApiError> {
        let req = endpoints::clear_context_request(&self.cfg.base_url, session);
        let resp = self.execute(&req).await?;
        Ok(envelope::parse_ack(resp.status, &resp.body)?)
    }

    pub async fn ingest_document(&self, doc: &DocumentUpload) -> Result<(), ApiError> {
        let req = endpoints::ingest_file_request(&self.cfg.base_url, doc);
        let resp = self.execute(&req).await?;
        Ok(envelope::parse_ack(resp.status, &resp.body)?)
    }

    pub async fn ingest_url(&self, url: &str) -> Result<(), ApiError> {
        let req = endpoints::ingest_url_request(&self.cfg.base_url, url);
        let resp = self.execute(&req).await?;
        Ok(envelope::parse_ack(resp.status, &resp.body)?)
    }

    pub async fn transcribe(&self, clip: &AudioClip) -> Result<String, ApiError> {
        let req = endpoints::transcribe_request(&self.cfg.base_url, clip);
        let resp = self.execute(&req).await?;
        Ok(envelope::parse_transcript(resp.status, &resp.body)?)
    }

    /// Returns the decoded MP3 bytes for the given text.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ApiError> {
        let req = endpoints::synthesize_request(&self.cfg.base_url, text);
        let resp = self.execute(&req).await?;
        let b64 = envelope::parse_speech(resp.status, &resp.body)?;
        Ok(envelope::decode_audio(&b64)?)
    }

    pub async fn health(&self) -> Result<(), ApiError> {
        let req = endpoints::health_request(&self.cfg.base_url);
        let resp = self.execute(&req).await?;
        Ok(envelope::parse_ack(resp.status, &resp.body)?)
    }

    async fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut headers = HeaderMap::new();
        for (k, v) in &req.headers {
            let name = HeaderName::from_bytes(k.as_bytes())
                .map_err(|_| ApiError::InvalidRequest(format!("invalid header name: {k}")))?;
            let value = HeaderValue::from_str(v)
                .map_err(|_| ApiError::InvalidRequest(format!("invalid value for header {k}")))?;
            headers.insert(name, value);
        }

        let builder = match req.method.as_str() {
            "GET" => self.http.get(&req.url),
            "POST" => self.http.post(&req.url),
            "DELETE" => self.http.delete(&req.url),
            other => {
                return Err(ApiError::InvalidRequest(format!(
                    "unsupported method: {other}"
                )));
            }
        }
        .headers(headers);

        let builder = match &req.body {
            Body::Empty => builder,
            Body::Json(s) => builder.body(s.clone()),
            Body::MultipartFormData { bytes, .. } => builder.body(bytes.clone()),
        };

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await?.to_vec();
        Ok(HttpResponse { status, body })
    }
}
