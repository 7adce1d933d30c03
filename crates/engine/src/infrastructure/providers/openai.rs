//! OpenAI-compatible chat-completions client.
//!
//! Covers any backend speaking the `/v1/chat/completions` dialect (OpenAI,
//! Groq, local Ollama builds); the instance name distinguishes them in
//! config, logs, and failover diagnostics.

use async_trait::async_trait;
use quizforge_domain::DifficultyLevel;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{parsing, prompt};
use crate::infrastructure::ports::{
    AiError, AiProviderPort, AnswerFeedback, GeneratedQuestion,
};

/// Connect timeout for AI backends.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Total request timeout for AI backends.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct OpenAiCompatClient {
    client: Client,
    name: String,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiCompatClient {
    pub fn new(name: &str, base_url: &str, model: &str, api_key: &str) -> Self {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            name: name.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    async fn chat(&self, system: String, user: String) -> Result<String, AiError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: system,
                },
                ChatMessage {
                    role: "user".into(),
                    content: user,
                },
            ],
            temperature: 0.7,
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::RequestFailed(format!("{}: {e}", self.name)))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::rate_limited(&self.name, body));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| AiError::RequestFailed(e.to_string()))?;
            if parsing::is_rate_limit_message(&body) {
                return Err(AiError::rate_limited(&self.name, body));
            }
            return Err(AiError::RequestFailed(format!(
                "{} returned {status}: {body}",
                self.name
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AiError::MalformedResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AiError::MalformedResponse("No choices in chat response".into()))
    }
}

#[async_trait]
impl AiProviderPort for OpenAiCompatClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        topic: &str,
        difficulty: DifficultyLevel,
    ) -> Result<GeneratedQuestion, AiError> {
        let content = self
            .chat(
                prompt::generation_system_prompt(),
                prompt::generation_user_prompt(topic, difficulty),
            )
            .await?;
        parsing::parse_generated_question(&content)
    }

    async fn validate_answer(
        &self,
        statement: &str,
        answer: &str,
    ) -> Result<AnswerFeedback, AiError> {
        let content = self
            .chat(
                prompt::validation_system_prompt(),
                prompt::validation_user_prompt(statement, answer),
            )
            .await?;
        parsing::parse_answer_feedback(&content)
    }
}

// =============================================================================
// Chat-completions API types
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
