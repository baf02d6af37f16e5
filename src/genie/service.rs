use async_trait::async_trait;
use reqwest::Client;

use crate::genie::models::{GenerateContentRequest, GenerateContentResponse};
use crate::infrastructure::config::Config;

pub const NOT_CONFIGURED_ANSWER: &str =
    "The librarian assistant is not configured yet (missing API key). Please contact the administrator.";
pub const EMPTY_ANSWER: &str = "Sorry, I can't process that request right now.";
pub const BACKEND_ERROR_ANSWER: &str =
    "Sorry, something went wrong while contacting the librarian assistant.";

const SYSTEM_INSTRUCTION: &str = "You are a professional librarian assistant at a theological \
college library. Answer questions about theology book recommendations, summaries of biblical \
topics, or library administration politely, academically and helpfully.";

/// Free-text question answering for library staff. Never fails: missing
/// configuration and backend errors come back as fixed answers.
#[async_trait]
pub trait LibrarianAssistant: Send + Sync {
    async fn ask(&self, query: &str) -> String;
}

/// Assistant backed by the Gemini `generateContent` API
pub struct GeminiLibrarian {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiLibrarian {
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.gemini_base_url.clone(),
        )
    }

    async fn generate(&self, api_key: &str, query: &str) -> Result<String, reqwest::Error> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response: GenerateContentResponse = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&GenerateContentRequest::new(SYSTEM_INSTRUCTION, query))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.text())
    }
}

#[async_trait]
impl LibrarianAssistant for GeminiLibrarian {
    async fn ask(&self, query: &str) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            return NOT_CONFIGURED_ANSWER.to_string();
        };

        match self.generate(api_key, query).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => EMPTY_ANSWER.to_string(),
            Err(e) => {
                tracing::error!("Librarian assistant request failed: {}", e);
                BACKEND_ERROR_ANSWER.to_string()
            }
        }
    }
}
