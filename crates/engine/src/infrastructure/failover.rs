//! Failover orchestrator for AI providers.
//!
//! Holds an ordered list of adapters and a process-lifetime rotation
//! cursor. Rate-limited attempts advance the cursor to the next adapter;
//! any other failure aborts immediately. The cursor is sticky: a call that
//! rotated to a working adapter leaves the cursor there, so the next call
//! skips providers known to be throttling.

use async_trait::async_trait;
use quizforge_domain::DifficultyLevel;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::infrastructure::ports::{
    AiError, AiProviderPort, AnswerFeedback, GeneratedQuestion,
};

pub struct FailoverAiClient {
    providers: Vec<Arc<dyn AiProviderPort>>,
    cursor: AtomicUsize,
}

impl FailoverAiClient {
    /// Build from adapters in preference order. Order is fixed at
    /// construction; only the starting point rotates.
    pub fn new(providers: Vec<Arc<dyn AiProviderPort>>) -> Self {
        Self {
            providers,
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    async fn with_rotation<T, F, Fut>(
        &self,
        operation_name: &str,
        operation: F,
    ) -> Result<T, AiError>
    where
        F: Fn(Arc<dyn AiProviderPort>) -> Fut,
        Fut: Future<Output = Result<T, AiError>>,
    {
        let total = self.providers.len();
        let mut attempts: Vec<(String, String)> = Vec::new();

        for attempt in 0..total {
            let index = self.cursor.load(Ordering::Relaxed) % total;
            let provider = Arc::clone(&self.providers[index]);

            match operation(Arc::clone(&provider)).await {
                Ok(result) => {
                    if attempt > 0 {
                        tracing::info!(
                            provider = provider.name(),
                            attempt = attempt + 1,
                            operation = operation_name,
                            "AI call succeeded after failover"
                        );
                    }
                    return Ok(result);
                }
                Err(e) if e.is_rate_limited() => {
                    tracing::warn!(
                        provider = provider.name(),
                        attempt = attempt + 1,
                        total,
                        operation = operation_name,
                        error = %e,
                        "Provider rate limited, rotating to next"
                    );
                    attempts.push((provider.name().to_string(), e.to_string()));
                    self.cursor.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    tracing::error!(
                        provider = provider.name(),
                        operation = operation_name,
                        error = %e,
                        "Provider failed with non-rotating error"
                    );
                    return Err(e);
                }
            }
        }

        tracing::error!(
            attempts = attempts.len(),
            operation = operation_name,
            "All AI providers exhausted"
        );
        Err(AiError::AllProvidersExhausted { attempts })
    }
}

#[async_trait]
impl AiProviderPort for FailoverAiClient {
    fn name(&self) -> &str {
        "failover"
    }

    async fn generate(
        &self,
        topic: &str,
        difficulty: DifficultyLevel,
    ) -> Result<GeneratedQuestion, AiError> {
        self.with_rotation("generate", |provider| {
            let topic = topic.to_string();
            async move { provider.generate(&topic, difficulty).await }
        })
        .await
    }

    async fn validate_answer(
        &self,
        statement: &str,
        answer: &str,
    ) -> Result<AnswerFeedback, AiError> {
        self.with_rotation("validate_answer", |provider| {
            let statement = statement.to_string();
            let answer = answer.to_string();
            async move { provider.validate_answer(&statement, &answer).await }
        })
        .await
    }
}
