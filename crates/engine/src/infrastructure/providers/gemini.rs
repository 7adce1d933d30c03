//! Google Gemini `generateContent` client.

use async_trait::async_trait;
use quizforge_domain::DifficultyLevel;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::openai::{CONNECT_TIMEOUT, REQUEST_TIMEOUT};
use super::{parsing, prompt};
use crate::infrastructure::ports::{
    AiError, AiProviderPort, AnswerFeedback, GeneratedQuestion,
};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Self {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    async fn complete(&self, system: String, user: String) -> Result<String, AiError> {
        // Gemini has no separate system role on this endpoint; prepend it.
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: format!("{system}\n\n{user}"),
                }],
            }],
            generation_config: GenerationConfig { temperature: 0.7 },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::RequestFailed(format!("gemini: {e}")))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::rate_limited("gemini", body));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| AiError::RequestFailed(e.to_string()))?;
            if parsing::is_rate_limit_message(&body) {
                return Err(AiError::rate_limited("gemini", body));
            }
            return Err(AiError::RequestFailed(format!(
                "gemini returned {status}: {body}"
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AiError::MalformedResponse(e.to_string()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| AiError::MalformedResponse("Empty Gemini response".into()))
    }
}

#[async_trait]
impl AiProviderPort for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(
        &self,
        topic: &str,
        difficulty: DifficultyLevel,
    ) -> Result<GeneratedQuestion, AiError> {
        let content = self
            .complete(
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
            .complete(
                prompt::validation_system_prompt(),
                prompt::validation_user_prompt(statement, answer),
            )
            .await?;
        parsing::parse_answer_feedback(&content)
    }
}

// =============================================================================
// Gemini API types
// =============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}
