//! Application state and its update cycle.
//!
//! `ChatState` owns everything the view renders. It changes only through
//! [`ChatState::update`], which may hand back an [`Effect`] for the caller to
//! run. Network completions come back in as [`Action::Settled`].

use crate::client::ExchangeError;
use crate::conversation::Conversation;
use crate::formatter::format_reply;
use crate::message::Message;
use crate::policy::ErrorPolicy;

/// Questions offered while the conversation is still empty
pub const EXAMPLE_QUESTIONS: [&str; 4] = [
    "Quels sont les hôpitaux disponibles?",
    "Quels médecins sont disponibles?",
    "Pouvez-vous me donner des informations sur les patients?",
    "Quels sont les avis des patients sur l'hôpital Wheeler?",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    InsertChar(char),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    SetInput(String),
    Submit,
    SubmitExample(usize),
    Settled(Result<String, ExchangeError>),
    DismissNotice,
}

/// Work the caller must perform on behalf of the state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SendChat { message: String },
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

#[derive(Debug, Clone, Default)]
pub struct ChatState {
    conversation: Conversation,
    input: String,
    cursor: usize, // in chars, not bytes
    pending: bool,
    notice: Option<String>,
    error_policy: ErrorPolicy,
}

impl ChatState {
    pub fn new(error_policy: ErrorPolicy) -> Self {
        Self {
            error_policy,
            ..Self::default()
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        self.error_policy
    }

    /// Example questions are only offered before the first message.
    pub fn shows_examples(&self) -> bool {
        self.conversation.is_empty()
    }

    pub fn update(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::InsertChar(c) => {
                let byte_pos = char_to_byte_index(&self.input, self.cursor);
                self.input.insert(byte_pos, c);
                self.cursor += 1;
            }
            Action::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let byte_pos = char_to_byte_index(&self.input, self.cursor);
                    self.input.remove(byte_pos);
                }
            }
            Action::Delete => {
                if self.cursor < self.input.chars().count() {
                    let byte_pos = char_to_byte_index(&self.input, self.cursor);
                    self.input.remove(byte_pos);
                }
            }
            Action::CursorLeft => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            Action::CursorRight => {
                let char_count = self.input.chars().count();
                self.cursor = (self.cursor + 1).min(char_count);
            }
            Action::CursorHome => {
                self.cursor = 0;
            }
            Action::CursorEnd => {
                self.cursor = self.input.chars().count();
            }
            Action::SetInput(text) => {
                self.cursor = text.chars().count();
                self.input = text;
            }
            Action::Submit => return self.submit(),
            Action::SubmitExample(idx) => {
                let question = EXAMPLE_QUESTIONS.get(idx)?;
                if self.pending {
                    tracing::debug!("example ignored, a request is already pending");
                    return None;
                }
                self.update(Action::SetInput((*question).to_string()));
                return self.submit();
            }
            Action::Settled(result) => self.settle(result),
            Action::DismissNotice => {
                self.notice = None;
            }
        }
        None
    }

    fn submit(&mut self) -> Option<Effect> {
        if self.input.trim().is_empty() {
            return None;
        }
        // One exchange at a time; the typed text stays put for a later submit
        if self.pending {
            tracing::debug!("submit ignored, a request is already pending");
            return None;
        }

        let message = std::mem::take(&mut self.input);
        self.cursor = 0;
        self.notice = None;
        self.conversation.push(Message::user(message.clone()));
        self.pending = true;

        Some(Effect::SendChat { message })
    }

    fn settle(&mut self, result: Result<String, ExchangeError>) {
        self.pending = false;

        match result {
            Ok(raw) => {
                let reply = format_reply(&raw);
                tracing::info!(
                    items = reply.items.as_ref().map_or(0, Vec::len),
                    "reply received"
                );
                self.conversation.push(reply);
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to get response");
                if self.error_policy == ErrorPolicy::Surfaced {
                    self.notice = Some(err.to_string());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> ChatState {
        let mut state = ChatState::default();
        for c in text.chars() {
            state.update(Action::InsertChar(c));
        }
        state
    }

    #[test]
    fn test_blank_submit_is_noop() {
        let mut state = typed("   \t ");
        assert_eq!(state.update(Action::Submit), None);
        assert!(state.conversation().is_empty());
        assert!(!state.is_pending());
    }

    #[test]
    fn test_empty_submit_is_noop() {
        let mut state = ChatState::default();
        assert_eq!(state.update(Action::Submit), None);
        assert!(state.conversation().is_empty());
    }

    #[test]
    fn test_submit_appends_user_message_and_requests() {
        let mut state = typed(" Bonjour ");
        let effect = state.update(Action::Submit);

        assert_eq!(
            effect,
            Some(Effect::SendChat { message: " Bonjour ".to_string() })
        );
        assert_eq!(state.conversation().messages(), &[Message::user(" Bonjour ")]);
        assert!(state.is_pending());
        assert_eq!(state.input(), "");
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn test_successful_exchange() {
        let mut state = typed("Quels hôpitaux?");
        state.update(Action::Submit);
        let effect = state.update(Action::Settled(Ok(
            "Voici les hôpitaux:\n*Hôpital A\n*Hôpital B".to_string(),
        )));

        assert_eq!(effect, None);
        assert!(!state.is_pending());
        let messages = state.conversation().messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].is_user);
        assert_eq!(messages[0].text, "Quels hôpitaux?");
        assert!(!messages[1].is_user);
        assert_eq!(messages[1].text, "Voici les hôpitaux:");
        assert_eq!(
            messages[1].items,
            Some(vec!["Hôpital A".to_string(), "Hôpital B".to_string()])
        );
    }

    #[test]
    fn test_failed_exchange_is_silent_by_default() {
        let mut state = typed("Bonjour");
        state.update(Action::Submit);
        state.update(Action::Settled(Err(ExchangeError::Http {
            status: 500,
            body: "Failed to generate response".to_string(),
        })));

        assert!(!state.is_pending());
        assert_eq!(state.conversation().len(), 1);
        assert!(state.conversation().messages()[0].is_user);
        assert_eq!(state.notice(), None);
    }

    #[test]
    fn test_failed_exchange_surfaced_sets_notice() {
        let mut state = ChatState::new(ErrorPolicy::Surfaced);
        state.update(Action::SetInput("Bonjour".to_string()));
        state.update(Action::Submit);
        state.update(Action::Settled(Err(ExchangeError::Transport(
            "connection refused".to_string(),
        ))));

        assert_eq!(state.conversation().len(), 1);
        assert_eq!(
            state.notice(),
            Some("Failed to reach the assistant: connection refused")
        );

        state.update(Action::DismissNotice);
        assert_eq!(state.notice(), None);
    }

    #[test]
    fn test_next_submit_clears_notice() {
        let mut state = ChatState::new(ErrorPolicy::Surfaced);
        state.update(Action::SetInput("un".to_string()));
        state.update(Action::Submit);
        state.update(Action::Settled(Err(ExchangeError::Malformed("eof".to_string()))));
        assert!(state.notice().is_some());

        state.update(Action::SetInput("deux".to_string()));
        state.update(Action::Submit);
        assert_eq!(state.notice(), None);
    }

    #[test]
    fn test_submit_while_pending_is_rejected() {
        let mut state = typed("premier");
        assert!(state.update(Action::Submit).is_some());

        state.update(Action::SetInput("second".to_string()));
        assert_eq!(state.update(Action::Submit), None);
        assert_eq!(state.conversation().len(), 1);
        assert_eq!(state.input(), "second");

        state.update(Action::Settled(Ok("ok".to_string())));
        assert_eq!(
            state.update(Action::Submit),
            Some(Effect::SendChat { message: "second".to_string() })
        );
    }

    #[test]
    fn test_submit_example() {
        let mut state = ChatState::default();
        assert!(state.shows_examples());

        let effect = state.update(Action::SubmitExample(1));
        assert_eq!(
            effect,
            Some(Effect::SendChat { message: EXAMPLE_QUESTIONS[1].to_string() })
        );
        assert_eq!(state.conversation().messages()[0].text, EXAMPLE_QUESTIONS[1]);
        assert!(!state.shows_examples());
    }

    #[test]
    fn test_submit_example_out_of_range() {
        let mut state = ChatState::default();
        assert_eq!(state.update(Action::SubmitExample(EXAMPLE_QUESTIONS.len())), None);
        assert!(state.conversation().is_empty());
        assert_eq!(state.input(), "");
    }

    #[test]
    fn test_cursor_editing_is_utf8_safe() {
        let mut state = typed("hpital");
        state.update(Action::CursorHome);
        state.update(Action::CursorRight);
        state.update(Action::InsertChar('ô'));
        assert_eq!(state.input(), "hôpital");
        assert_eq!(state.cursor(), 2);

        state.update(Action::Backspace);
        assert_eq!(state.input(), "hpital");

        state.update(Action::CursorEnd);
        state.update(Action::CursorRight);
        assert_eq!(state.cursor(), 6);
        state.update(Action::Delete);
        assert_eq!(state.input(), "hpital");

        state.update(Action::CursorLeft);
        state.update(Action::Delete);
        assert_eq!(state.input(), "hpita");
    }

    #[test]
    fn test_backspace_at_start_does_nothing() {
        let mut state = typed("a");
        state.update(Action::CursorHome);
        state.update(Action::Backspace);
        assert_eq!(state.input(), "a");
        assert_eq!(state.cursor(), 0);
    }
}
