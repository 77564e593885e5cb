//! Chat Service
//!
//! Answers questions about a repository using its previously generated
//! documentation as context. Without a configured provider the service
//! degrades to canned keyword responses rather than failing.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::ai::{self, RetryPolicy, SharedProvider};
use crate::config::ChatConfig;
use crate::types::{ChatMessage, ChatSession, DocContext, MessageRole, Result};

use super::store::SessionStore;

pub struct ChatService {
    provider: Option<SharedProvider>,
    store: Arc<dyn SessionStore>,
    retry: RetryPolicy,
    docs_dir: PathBuf,
    history_window: usize,
    context_truncate_chars: usize,
}

impl ChatService {
    pub fn new(
        provider: Option<SharedProvider>,
        store: Arc<dyn SessionStore>,
        retry: RetryPolicy,
        config: &ChatConfig,
    ) -> Self {
        if provider.is_none() {
            warn!("No AI provider configured - chat will use fallback responses");
        }
        Self {
            provider,
            store,
            retry,
            docs_dir: config.docs_dir.clone(),
            history_window: config.history_window,
            context_truncate_chars: config.context_truncate_chars,
        }
    }

    /// Create a session bound to one repository, eagerly loading any
    /// previously generated docs as context. Missing docs are fine.
    pub fn create_session(&self, repository_id: &str) -> ChatSession {
        let context = self.load_doc_context(repository_id);
        info!(
            repository = repository_id,
            docs = context.len(),
            "Creating chat session"
        );

        let session = ChatSession::new(repository_id, context);
        self.store.create(session.clone());
        session
    }

    /// Fetch an existing session
    pub fn get_session(&self, session_id: &str) -> Result<ChatSession> {
        self.store.get(session_id)
    }

    /// Append the user turn, produce the assistant turn, append and
    /// return it. Unknown session ids error before any mutation.
    pub async fn send_message(&self, session_id: &str, text: &str) -> Result<ChatMessage> {
        let session = self.store.get(session_id)?;

        let user_message = ChatMessage::new(MessageRole::User, text);
        self.store.append(session_id, user_message.clone())?;

        let reply = match &self.provider {
            Some(provider) => {
                let mut history = session.messages.clone();
                history.push(user_message);
                let prompt = ai::prompt::chat_prompt(
                    &session.context,
                    &history,
                    self.history_window,
                    self.context_truncate_chars,
                    text,
                );
                let provider = provider.clone();
                ai::retry_generation(self.retry, move || {
                    let provider = provider.clone();
                    let prompt = prompt.clone();
                    async move { provider.generate(&prompt).await }
                })
                .await?
            }
            None => Self::fallback_response(text),
        };

        let assistant_message = ChatMessage::new(MessageRole::Assistant, reply);
        self.store.append(session_id, assistant_message.clone())?;
        Ok(assistant_message)
    }

    /// Best-effort scan of the docs directory for this repository.
    /// `owner/repo` maps to `{docs_dir}/owner_repo/`.
    fn load_doc_context(&self, repository_id: &str) -> Vec<DocContext> {
        let dir = self.docs_dir.join(repository_id.replace('/', "_"));
        let Ok(entries) = std::fs::read_dir(&dir) else {
            debug!(dir = %dir.display(), "No generated docs found for repository");
            return Vec::new();
        };

        let mut context = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let is_doc = path
                .extension()
                .is_some_and(|ext| ext == "md" || ext == "mdx");
            if !is_doc {
                continue;
            }
            match std::fs::read_to_string(&path) {
                Ok(content) => {
                    let truncated: String =
                        content.chars().take(self.context_truncate_chars).collect();
                    context.push(DocContext {
                        file: entry.file_name().to_string_lossy().into_owned(),
                        content: truncated,
                    });
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable doc"),
            }
        }
        context.sort_by(|a, b| a.file.cmp(&b.file));
        context
    }

    /// Keyword-routed canned replies for degraded mode
    fn fallback_response(text: &str) -> String {
        let message = text.to_lowercase();

        if message.contains("setup") || message.contains("install") {
            "To set up this project:\n1. Clone the repository\n2. Install dependencies\n\
             3. Configure environment variables\n4. Start the development server\n\n\
             *Note: Configure a Gemini API key for AI-powered responses*"
                .to_string()
        } else if message.contains("api") || message.contains("endpoint") {
            "This project includes several API endpoints. Check the generated documentation \
             for detailed API reference including endpoints, parameters, and examples.\n\n\
             *Note: Configure a Gemini API key for detailed API assistance*"
                .to_string()
        } else if message.contains("help") || message.contains("how") {
            "I'm here to help with questions about this project! You can ask about:\n\
             - Setup and installation\n- API endpoints and usage\n- Project structure\n\
             - Development workflow\n\n\
             *Note: Configure a Gemini API key for more detailed assistance*"
                .to_string()
        } else {
            "I'd be happy to help! However, I need a Gemini API key to provide detailed \
             responses. For now, please check the generated documentation or ask about \
             setup, API endpoints, or general project questions."
                .to_string()
        }
    }
}
