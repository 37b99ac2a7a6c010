use mynah_api::client::{ApiClient, ApiError};
use mynah_core::{AudioClip, AudioEncoding, ClientConfig, DocumentUpload, SessionId};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    let cfg = ClientConfig {
        base_url: server.uri(),
        ..Default::default()
    };
    ApiClient::new(cfg).unwrap()
}

#[tokio::test]
async fn chat_round_trip_returns_answer_and_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/chat"))
        .and(body_string_contains("What is X?"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "message": "Request successful",
            "data": {
                "question": "What is X?",
                "answer": "X is Y",
                "timestamp": "2024-01-01T00:00:00Z",
                "session_id": "abc"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let reply = client
        .send_chat("What is X?", None, "anonymous-1-what-is-x?")
        .await
        .unwrap();

    assert_eq!(reply.answer, "X is Y");
    assert_eq!(reply.session_id, Some(SessionId::new("abc")));
}

#[tokio::test]
async fn chat_forwards_session_and_idempotency_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/chat"))
        .and(header("X-Session-ID", "abc"))
        .and(header("X-Idempotency-Key", "abc-42-hello"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "data": { "answer": "hi", "session_id": "abc" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let session = SessionId::new("abc");
    client
        .send_chat("hello", Some(&session), "abc-42-hello")
        .await
        .unwrap();
}

#[tokio::test]
async fn declined_2xx_reply_surfaces_the_server_wording() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "error",
            "message": "Question is required"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.send_chat("hi", None, "k").await.unwrap_err();
    match err {
        ApiError::Api { message } => assert_eq!(message.as_deref(), Some("Question is required")),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn http_500_without_body_falls_back_to_the_status_phrase() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/context"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.clear_context(&SessionId::new("abc")).await.unwrap_err();
    match err {
        ApiError::Api { message } => {
            assert_eq!(message.as_deref(), Some("Internal Server Error"))
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn refused_connection_is_a_transport_error() {
    // Nothing listens on the discard port.
    let cfg = ClientConfig {
        base_url: "http://127.0.0.1:9".into(),
        ..Default::default()
    };
    let client = ApiClient::new(cfg).unwrap();

    let err = client.send_chat("hi", None, "k").await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn document_upload_is_multipart_under_the_file_field() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/rag"))
        .and(body_string_contains("name=\"file\"; filename=\"data.csv\""))
        .and(body_string_contains("Content-Type: text/csv"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "message": "File processed"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let doc = DocumentUpload::from_file("data.csv", b"a,b\n1,2\n".to_vec()).unwrap();
    client.ingest_document(&doc).await.unwrap();
}

#[tokio::test]
async fn transcription_sends_the_clip_and_returns_the_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/voice/speech-to-text"))
        .and(body_string_contains("name=\"audio\"; filename=\"recording.wav\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "text": "hello from voice"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let clip = AudioClip::new(AudioEncoding::Wav, b"RIFFdata".to_vec());
    let text = client.transcribe(&clip).await.unwrap();
    assert_eq!(text, "hello from voice");
}

#[tokio::test]
async fn synthesis_returns_decoded_bytes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/voice/text-to-speech"))
        .and(body_string_contains("X is Y"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "audio": "AQID"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let bytes = client.synthesize("X is Y").await.unwrap();
    assert_eq!(bytes, vec![1, 2, 3]);
}

#[tokio::test]
async fn corrupt_audio_payload_is_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/voice/text-to-speech"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "audio": "!!not-base64!!"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.synthesize("hi").await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn health_probe_accepts_a_success_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "message": "Service is healthy"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.health().await.unwrap();
}
