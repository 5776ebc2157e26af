use super::client::{ChatRequest, ChatTransport, TransportError, interpret_reply, with_deadline};
use super::error::SendError;
use crate::config::SendSettings;
use crate::history::{HISTORY_LIMIT, HistoryStore, UserKey};
use crate::storage::KeyValueStore;
use crate::types::ChatMessage;
use std::time::Duration;

/// Owns the conversation for one user key and walks each send through
/// `begin` → `PendingSend::dispatch` → `complete`.
pub struct SendController<S> {
    history: HistoryStore<S>,
    user_key: UserKey,
    messages: Vec<ChatMessage>,
    settings: SendSettings,
    in_flight: bool,
}

/// A send that has been recorded locally and is ready to go out.
#[derive(Clone, Debug)]
pub struct PendingSend {
    request: ChatRequest,
    endpoint: Option<String>,
    timeout: Duration,
}

impl<S: KeyValueStore> SendController<S> {
    pub fn new(history: HistoryStore<S>, settings: SendSettings) -> Self {
        let user_key = history.user_key();
        let messages = history.load(&user_key);
        tracing::debug!(user = %user_key, entries = messages.len(), "history loaded");
        Self {
            history,
            user_key,
            messages,
            settings,
            in_flight: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn user_key(&self) -> &UserKey {
        &self.user_key
    }

    pub fn is_sending(&self) -> bool {
        self.in_flight
    }

    /// Record the user's message and mark the controller busy.
    pub fn begin(&mut self, input: &str) -> Result<PendingSend, SendError> {
        let text = input.trim();
        if text.is_empty() {
            return Err(SendError::EmptyInput);
        }
        if self.in_flight {
            return Err(SendError::Busy);
        }

        self.record(ChatMessage::user(text));
        self.in_flight = true;

        Ok(PendingSend {
            request: ChatRequest {
                message: text.to_string(),
                user_key: self.user_key.to_string(),
            },
            endpoint: self.settings.endpoint.clone(),
            timeout: self.settings.timeout,
        })
    }

    /// Record the assistant side of the exchange, success or failure, and go idle.
    pub fn complete(&mut self, outcome: Result<String, SendError>) -> &ChatMessage {
        let content = match outcome {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(%err, "send failed");
                err.user_message()
            }
        };
        self.in_flight = false;
        self.record(ChatMessage::assistant(content));
        &self.messages[self.messages.len() - 1]
    }

    /// All three steps in one go, for callers that can hold the controller
    /// across the network wait.
    pub async fn send_message(
        &mut self,
        input: &str,
        transport: &dyn ChatTransport,
    ) -> Result<&ChatMessage, SendError> {
        let pending = self.begin(input)?;
        let outcome = pending.dispatch(transport).await;
        Ok(self.complete(outcome))
    }

    fn record(&mut self, message: ChatMessage) {
        self.messages.push(message);
        if self.messages.len() > HISTORY_LIMIT {
            let excess = self.messages.len() - HISTORY_LIMIT;
            self.messages.drain(..excess);
        }
        if let Err(err) = self.history.save(&self.user_key, &self.messages) {
            tracing::warn!(%err, "history not persisted");
        }
    }
}

impl PendingSend {
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }

    /// Make the single request, bounded by the configured timeout.
    pub async fn dispatch(self, transport: &dyn ChatTransport) -> Result<String, SendError> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            return Err(SendError::ConfigMissing);
        };

        tracing::debug!(endpoint, chars = self.request.message.len(), "sending message");
        match with_deadline(transport.post(endpoint, &self.request), self.timeout).await {
            None => Err(SendError::Timeout(self.timeout)),
            Some(Err(TransportError::Network(detail))) => Err(SendError::Network(detail)),
            Some(Ok(reply)) => {
                tracing::info!(status = reply.status, "endpoint answered");
                interpret_reply(&reply)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::client::EndpointReply;
    use crate::storage::MemoryStore;
    use crate::types::Role;
    use async_trait::async_trait;

    struct Echo;

    #[async_trait(?Send)]
    impl ChatTransport for Echo {
        async fn post(
            &self,
            _endpoint: &str,
            request: &ChatRequest,
        ) -> Result<EndpointReply, TransportError> {
            Ok(EndpointReply {
                status: 200,
                body: format!(r#"{{"reply":"echo {}"}}"#, request.message),
            })
        }
    }

    fn controller() -> SendController<MemoryStore> {
        SendController::new(
            HistoryStore::new(MemoryStore::new()),
            SendSettings {
                endpoint: Some("https://chat.test/".into()),
                timeout: Duration::from_secs(1),
            },
        )
    }

    #[test]
    fn begin_trims_and_records_user_message() {
        let mut chat = controller();
        let pending = chat.begin("  hello  ").unwrap();
        assert_eq!(pending.request().message, "hello");
        assert_eq!(pending.request().user_key, chat.user_key().as_str());
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].content, "hello");
        assert!(chat.is_sending());
    }

    #[test]
    fn second_begin_while_in_flight_is_busy() {
        let mut chat = controller();
        chat.begin("one").unwrap();
        assert_eq!(chat.begin("two").unwrap_err(), SendError::Busy);
        assert_eq!(chat.messages().len(), 1);

        chat.complete(Ok("done".into()));
        assert!(!chat.is_sending());
        assert!(chat.begin("two").is_ok());
    }

    #[test]
    fn complete_turns_errors_into_assistant_text() {
        let mut chat = controller();
        chat.begin("hi").unwrap();
        let last = chat.complete(Err(SendError::MalformedResponse)).clone();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, crate::chat::error::NO_ANSWER_TEXT);
    }

    #[tokio::test]
    async fn send_message_runs_the_whole_cycle() {
        let mut chat = controller();
        let reply = chat.send_message("ping", &Echo).await.unwrap().clone();
        assert_eq!(reply.content, "echo ping");
        assert_eq!(chat.messages().len(), 2);
        assert!(!chat.is_sending());
    }

    #[test]
    fn in_memory_history_stays_capped() {
        let mut chat = controller();
        for i in 0..HISTORY_LIMIT {
            chat.begin(&format!("q{i}")).unwrap();
            chat.complete(Ok(format!("a{i}")));
        }
        assert_eq!(chat.messages().len(), HISTORY_LIMIT);
        assert_eq!(chat.messages()[0].content, format!("q{}", HISTORY_LIMIT / 2));
    }
}
