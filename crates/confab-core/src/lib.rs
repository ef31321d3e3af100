pub mod config;
pub mod error;
pub mod filter;
pub mod http;
pub mod paths;
pub mod scheduler;
pub mod services;
pub mod storage;

use anyhow::{Context, Result};
use confab_ai::{LlmClient, OpenAIClient};
use std::path::PathBuf;
use std::sync::Arc;
use storage::Storage;
use tracing::{info, warn};

use config::{ProviderConfig, ServiceConfig};
use filter::VocabularyFilter;
use services::chat::ChatService;

/// Core application state shared by the HTTP layer and the retention job
pub struct AppCore {
    pub storage: Arc<Storage>,
    pub chat: ChatService,
}

impl std::fmt::Debug for AppCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppCore").finish_non_exhaustive()
    }
}

/// Default persona and vocabulary embedded at compile time
const DEFAULT_PERSONA: &str = include_str!("../assets/persona.md");
const DEFAULT_VOCABULARY: &str = include_str!("../assets/vocabulary.json");

impl AppCore {
    pub async fn new(config: &ServiceConfig) -> Result<Self> {
        let llm = build_client(&config.provider);
        Self::with_client(config, llm)
    }

    /// Wire the core against a caller-supplied completion client.
    pub fn with_client(config: &ServiceConfig, llm: Arc<dyn LlmClient>) -> Result<Self> {
        let storage = Arc::new(Storage::new(&config.database_path)?);
        let filter = Arc::new(load_vocabulary(config)?);
        let persona = config
            .persona
            .clone()
            .unwrap_or_else(|| DEFAULT_PERSONA.to_string());

        info!(
            terms = filter.term_count(),
            provider = llm.provider(),
            model = llm.model(),
            "Initializing Confab"
        );

        let chat = ChatService::new(
            llm,
            filter,
            storage.clone(),
            persona,
            config.provider.max_answer_tokens,
        );

        Ok(Self { storage, chat })
    }
}

fn build_client(provider: &ProviderConfig) -> Arc<dyn LlmClient> {
    if provider.api_key.is_empty() {
        warn!("No OPENAI_API_KEY configured; completion requests will fail");
    }

    let mut client =
        OpenAIClient::new(provider.api_key.clone()).with_model(provider.model.clone());
    if let Some(base_url) = &provider.base_url {
        client = client.with_base_url(base_url.clone());
    }
    Arc::new(client)
}

/// Load the vocabulary the whole service filters through.
///
/// An explicitly configured file must exist. Without one, the default file
/// is seeded from the embedded list on first run and loaded from then on.
fn load_vocabulary(config: &ServiceConfig) -> Result<VocabularyFilter> {
    match &config.vocabulary_path {
        Some(path) => VocabularyFilter::load(path),
        None => {
            let path = ensure_default_vocabulary()?;
            VocabularyFilter::load(&path)
        }
    }
}

/// Create the default vocabulary file if it is missing.
fn ensure_default_vocabulary() -> Result<PathBuf> {
    let path = paths::vocabulary_path()?;
    if !path.exists() {
        info!("Creating default vocabulary file...");
        std::fs::write(&path, DEFAULT_VOCABULARY)
            .with_context(|| format!("Failed to write vocabulary file: {}", path.display()))?;
    }
    Ok(path)
}
