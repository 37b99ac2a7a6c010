use crate::types::SessionId;

/// Builds the advisory idempotency key sent with every chat turn:
/// `{session|anonymous}-{epoch-millis}-{normalized question}`, where the
/// question is trimmed, lowercased, and whitespace runs become single
/// hyphens. The server may use it to drop duplicates; the client never
/// assumes it does.
pub fn idempotency_key(session: Option<&SessionId>, epoch_ms: u64, question: &str) -> String {
    let scope = session.map(SessionId::as_str).unwrap_or("anonymous");
    let lowered = question.trim().to_lowercase();
    let normalized = lowered.split_whitespace().collect::<Vec<_>>().join("-");
    format!("{scope}-{epoch_ms}-{normalized}")
}
