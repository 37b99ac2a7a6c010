use crate::state::{Outcome, StateHandle};
use mynah_api::client::{ApiClient, ApiError};
use mynah_core::{DocumentUpload, RequestStatus};
use std::sync::Arc;

const INVALID_FILE: &str = "Please select a valid CSV, PDF, or DOC/DOCX file";
const NOTHING_STAGED: &str = "Please select a file or enter a URL";
const NO_RESPONSE: &str = "No response from server. Please check your connection.";
const UPLOAD_FAILED: &str = "Failed to upload. Please try again.";
const UPLOAD_OK: &str = "RAG data uploaded successfully.";

/// Feeds documents and URLs to the retrieval endpoint. Staging is at most
/// one file or one URL; the file wins when both are present. Uploads run on
/// their own channel and never block chat turns.
pub struct IngestOrchestrator {
    api: Arc<ApiClient>,
    state: StateHandle,
}

enum Payload {
    File(DocumentUpload),
    Url(String),
}

impl IngestOrchestrator {
    pub fn new(api: Arc<ApiClient>, state: StateHandle) -> Self {
        Self { api, state }
    }

    /// Stages a local file. Disallowed types are rejected on the spot, with
    /// no request and no change to what was already staged.
    pub fn select_file(&self, filename: &str, bytes: Vec<u8>) -> bool {
        match DocumentUpload::from_file(filename, bytes) {
            Some(doc) => {
                let mut st = self.state.lock();
                st.staged_file = Some(doc);
                st.banner = None;
                true
            }
            None => {
                self.state.lock().banner = Some(INVALID_FILE.to_string());
                false
            }
        }
    }

    pub fn set_url(&self, url: &str) {
        self.state.lock().staged_url = url.trim().to_string();
    }

    pub fn clear_selection(&self) {
        let mut st = self.state.lock();
        st.staged_file = None;
        st.staged_url.clear();
    }

    /// Sends whatever is staged. Success appends a confirmation notice to
    /// the log and clears the staging; failure keeps the staging for retry.
    pub async fn upload(&self) -> Outcome {
        let payload = {
            let mut st = self.state.lock();
            if st.ingest.is_pending() {
                return Outcome::Ignored;
            }
            let payload = if let Some(doc) = st.staged_file.clone() {
                Payload::File(doc)
            } else if !st.staged_url.is_empty() {
                Payload::Url(st.staged_url.clone())
            } else {
                st.banner = Some(NOTHING_STAGED.to_string());
                return Outcome::Ignored;
            };
            st.ingest = RequestStatus::Pending;
            st.banner = None;
            payload
        };

        let result = match &payload {
            Payload::File(doc) => {
                log::debug!("ingesting file {} ({} bytes)", doc.filename, doc.bytes.len());
                self.api.ingest_document(doc).await
            }
            Payload::Url(url) => {
                log::debug!("ingesting url {url}");
                self.api.ingest_url(url).await
            }
        };

        let mut st = self.state.lock();
        match result {
            Ok(()) => {
                st.conversation.append_notice(UPLOAD_OK);
                st.staged_file = None;
                st.staged_url.clear();
                st.ingest = RequestStatus::Idle;
                Outcome::Completed
            }
            Err(err) => {
                log::warn!("ingestion failed: {err}");
                let text = match &err {
                    ApiError::Transport(_) => NO_RESPONSE.to_string(),
                    ApiError::Api {
                        message: Some(message),
                    } => message.clone(),
                    _ => UPLOAD_FAILED.to_string(),
                };
                st.banner = Some(text.clone());
                st.ingest = RequestStatus::Error(text);
                Outcome::Failed
            }
        }
    }
}
