use crate::types::{Message, Sender, SessionId};
use serde::{Deserialize, Serialize};

/// Conversation log plus the context transcript the server receives on the
/// next turn. `context` accumulates exactly one `"User: {q}\nAI: {a}\n"`
/// pair per completed turn, in turn order. Reset clears the session id, the
/// context and the log together; nothing else removes entries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Conversation {
    session_id: Option<SessionId>,
    context: String,
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Appends a user message with the trimmed text. Whitespace-only input
    /// appends nothing; returns whether a message was added.
    pub fn append_user(&mut self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.messages.push(Message::user(trimmed));
        true
    }

    /// Appends a bot answer and extends the context with this turn's pair.
    /// The question is the most recent user message; without one the answer
    /// is still logged but no pair can be formed.
    pub fn append_bot(&mut self, text: impl Into<String>) {
        let answer = text.into();
        if let Some(question) = self.last_user_text().map(str::to_owned) {
            self.context
                .push_str(&format!("User: {question}\nAI: {answer}\n"));
        }
        self.messages.push(Message::bot(answer));
    }

    /// Appends a bot-sender notice (upload confirmations and the like)
    /// without touching the context transcript.
    pub fn append_notice(&mut self, text: impl Into<String>) {
        self.messages.push(Message::bot(text));
    }

    pub fn append_error(&mut self, text: impl Into<String>) {
        self.messages.push(Message::error(text));
    }

    pub fn set_session(&mut self, id: SessionId) {
        self.session_id = Some(id);
    }

    /// Clears session id, context and log as one unit.
    pub fn reset(&mut self) {
        self.session_id = None;
        self.context.clear();
        self.messages.clear();
    }

    pub fn last_user_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.sender == Sender::User)
            .map(|m| m.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_then_bot_forms_one_context_pair() {
        let mut conv = Conversation::new();
        assert!(conv.append_user("What is X?"));
        conv.append_bot("X is Y");

        assert_eq!(conv.len(), 2);
        assert_eq!(conv.context(), "User: What is X?\nAI: X is Y\n");
    }

    #[test]
    fn context_pairs_accumulate_in_turn_order() {
        let mut conv = Conversation::new();
        conv.append_user("first");
        conv.append_bot("one");
        conv.append_user("second");
        conv.append_bot("two");

        assert_eq!(
            conv.context(),
            "User: first\nAI: one\nUser: second\nAI: two\n"
        );
    }

    #[test]
    fn whitespace_only_user_text_is_a_no_op() {
        let mut conv = Conversation::new();
        assert!(!conv.append_user("   \t  "));
        assert!(conv.is_empty());
        assert_eq!(conv.context(), "");
    }

    #[test]
    fn user_text_is_stored_trimmed() {
        let mut conv = Conversation::new();
        conv.append_user("  hello  ");
        assert_eq!(conv.messages()[0].text, "hello");
    }

    #[test]
    fn notice_and_error_leave_context_untouched() {
        let mut conv = Conversation::new();
        conv.append_user("q");
        conv.append_bot("a");
        conv.append_notice("RAG data uploaded successfully.");
        conv.append_error("Error: something went wrong");

        assert_eq!(conv.len(), 4);
        assert_eq!(conv.context(), "User: q\nAI: a\n");
        assert_eq!(conv.messages()[2].sender, Sender::Bot);
        assert_eq!(conv.messages()[3].sender, Sender::Error);
    }

    #[test]
    fn bot_without_any_user_message_logs_but_forms_no_pair() {
        let mut conv = Conversation::new();
        conv.append_bot("unprompted");
        assert_eq!(conv.len(), 1);
        assert_eq!(conv.context(), "");
    }

    #[test]
    fn reset_clears_session_context_and_log_together() {
        let mut conv = Conversation::new();
        conv.set_session(SessionId::new("abc"));
        conv.append_user("q");
        conv.append_bot("a");

        conv.reset();

        assert!(conv.session_id().is_none());
        assert_eq!(conv.context(), "");
        assert!(conv.is_empty());
    }

    #[test]
    fn last_user_text_skips_bot_and_error_entries() {
        let mut conv = Conversation::new();
        conv.append_user("real question");
        conv.append_error("Error: boom");
        conv.append_notice("notice");
        assert_eq!(conv.last_user_text(), Some("real question"));
    }
}
