//! Chat service - relays one prompt through the completion provider.

use crate::error::ChatError;
use crate::filter::VocabularyFilter;
use crate::storage::Storage;
use confab_ai::{AiError, CompletionRequest, LlmClient, Message};
use std::sync::Arc;
use tracing::debug;

/// Handles one prompt end to end: validate, complete, redact, persist.
pub struct ChatService {
    llm: Arc<dyn LlmClient>,
    filter: Arc<VocabularyFilter>,
    storage: Arc<Storage>,
    persona: String,
    max_answer_tokens: u32,
}

impl ChatService {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        filter: Arc<VocabularyFilter>,
        storage: Arc<Storage>,
        persona: String,
        max_answer_tokens: u32,
    ) -> Self {
        Self {
            llm,
            filter,
            storage,
            persona,
            max_answer_tokens,
        }
    }

    /// Ask the completion provider under the configured persona.
    ///
    /// Both the prompt and the answer are redacted before the exchange is
    /// recorded, and the caller receives the same redacted answer that was
    /// stored. Nothing is recorded when the provider call fails.
    pub async fn ask(&self, prompt: &str) -> Result<String, ChatError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ChatError::Validation("Prompt must not be empty".to_string()));
        }

        let request = CompletionRequest::new(vec![
            Message::system(self.persona.as_str()),
            Message::user(prompt),
        ])
        .with_max_tokens(self.max_answer_tokens);

        let response = self.llm.complete(request).await?;
        let answer = response
            .content
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                ChatError::Provider(AiError::Llm("Completion contained no text".to_string()))
            })?;

        let question = self.filter.redact(prompt);
        let answer = self.filter.redact(&answer);
        let record = self.storage.conversations.append(&question, &answer)?;
        debug!(id = %record.id, "Recorded conversation");

        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confab_ai::{MockLlmClient, MockStep, Role};
    use tempfile::tempdir;

    fn test_service(mock: MockLlmClient, temp_dir: &tempfile::TempDir) -> (ChatService, Arc<Storage>) {
        let db_path = temp_dir.path().join("test.db");
        let storage = Arc::new(Storage::new(db_path.to_str().unwrap()).unwrap());
        let filter = Arc::new(VocabularyFilter::from_terms(["damn"]).unwrap());
        let service = ChatService::new(
            Arc::new(mock),
            filter,
            storage.clone(),
            "You are a test persona.".to_string(),
            300,
        );
        (service, storage)
    }

    #[tokio::test]
    async fn test_returns_and_persists_the_filtered_answer() {
        let temp_dir = tempdir().unwrap();
        let mock = MockLlmClient::from_steps(
            "mock",
            vec![MockStep::text("Well damn, that is a question")],
        );
        let (service, storage) = test_service(mock, &temp_dir);

        let answer = service.ask("How are you?").await.unwrap();
        assert_eq!(answer, "Well d***, that is a question");

        let records = storage.conversations.list_recent().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].question, "How are you?");
        assert_eq!(records[0].answer, "Well d***, that is a question");
    }

    #[tokio::test]
    async fn test_redacts_the_prompt_before_storing() {
        let temp_dir = tempdir().unwrap();
        let mock = MockLlmClient::from_steps("mock", vec![MockStep::text("A clean answer")]);
        let (service, storage) = test_service(mock, &temp_dir);

        service.ask("What the damn heck").await.unwrap();

        let records = storage.conversations.list_recent().unwrap();
        assert_eq!(records[0].question, "What the d*** heck");
    }

    #[tokio::test]
    async fn test_rejects_blank_prompts_before_calling_the_provider() {
        let temp_dir = tempdir().unwrap();
        let mock = MockLlmClient::new("mock");
        let (service, storage) = test_service(mock.clone(), &temp_dir);

        for prompt in ["", "   ", "\n\t"] {
            let err = service.ask(prompt).await.unwrap_err();
            assert!(matches!(err, ChatError::Validation(_)));
        }

        assert_eq!(mock.call_count().await, 0);
        assert_eq!(storage.conversations.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_records_nothing() {
        let temp_dir = tempdir().unwrap();
        let mock = MockLlmClient::from_steps("mock", vec![MockStep::error("upstream exploded")]);
        let (service, storage) = test_service(mock, &temp_dir);

        let err = service.ask("hello").await.unwrap_err();
        assert!(matches!(err, ChatError::Provider(_)));
        assert_eq!(storage.conversations.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_completion_is_a_provider_error() {
        let temp_dir = tempdir().unwrap();
        let mock = MockLlmClient::from_steps("mock", vec![MockStep::text("   ")]);
        let (service, storage) = test_service(mock, &temp_dir);

        let err = service.ask("hello").await.unwrap_err();
        assert!(matches!(err, ChatError::Provider(_)));
        assert_eq!(storage.conversations.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_composes_persona_prompt_and_token_bound() {
        let temp_dir = tempdir().unwrap();
        let mock = MockLlmClient::from_steps("mock", vec![MockStep::text("ok")]);
        let (service, _storage) = test_service(mock.clone(), &temp_dir);

        service.ask("  trimmed prompt  ").await.unwrap();

        let requests = mock.requests().await;
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.max_tokens, Some(300));
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content, "You are a test persona.");
        assert_eq!(request.messages[1].role, Role::User);
        assert_eq!(request.messages[1].content, "trimmed prompt");
    }
}
