//! Application state and composition.

use std::sync::Arc;

use quizforge_domain::AdaptivePolicy;
use sqlx::SqlitePool;

use crate::infrastructure::{
    ports::{
        AiProviderPort, AnswerRepo, CategoryRepo, ClockPort, PlayerRepo, QuestionRepo, RoomRepo,
        SessionRepo, SystemClock,
    },
    providers::ProvidersConfig,
    sqlite::{
        SqliteAnswerRepo, SqliteCategoryRepo, SqlitePlayerRepo, SqliteQuestionRepo, SqliteRoomRepo,
        SqliteSessionRepo,
    },
    FailoverAiClient,
};
use crate::use_cases;

/// Main application state.
///
/// Holds the repositories and use cases; passed to HTTP handlers via
/// Axum state.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
    /// Failover client over every usable provider; `None` when no
    /// provider is configured (question generation then degrades).
    pub ai: Option<Arc<dyn AiProviderPort>>,
}

/// Container for the repository ports.
pub struct Repositories {
    pub players: Arc<dyn PlayerRepo>,
    pub categories: Arc<dyn CategoryRepo>,
    pub questions: Arc<dyn QuestionRepo>,
    pub sessions: Arc<dyn SessionRepo>,
    pub answers: Arc<dyn AnswerRepo>,
    pub rooms: Arc<dyn RoomRepo>,
}

/// Container for the use cases.
pub struct UseCases {
    pub ensure_player: use_cases::player::EnsurePlayer,
    pub start_session: use_cases::session::StartSession,
    pub submit_answer: use_cases::session::SubmitAnswer,
    pub next_question: use_cases::question::NextQuestion,
    pub create_room: use_cases::room::CreateRoom,
    pub room_summary: use_cases::room::RoomSummary,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(pool: SqlitePool, providers: &ProvidersConfig, policy: AdaptivePolicy) -> Self {
        let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);

        let players: Arc<dyn PlayerRepo> =
            Arc::new(SqlitePlayerRepo::new(pool.clone(), clock.clone()));
        let categories: Arc<dyn CategoryRepo> = Arc::new(SqliteCategoryRepo::new(pool.clone()));
        let questions: Arc<dyn QuestionRepo> =
            Arc::new(SqliteQuestionRepo::new(pool.clone(), clock.clone()));
        let sessions: Arc<dyn SessionRepo> =
            Arc::new(SqliteSessionRepo::new(pool.clone(), clock.clone()));
        let answers: Arc<dyn AnswerRepo> = Arc::new(SqliteAnswerRepo::new(pool.clone()));
        let rooms: Arc<dyn RoomRepo> = Arc::new(SqliteRoomRepo::new(pool, clock.clone()));

        let adapters = providers.build_providers();
        let ai: Option<Arc<dyn AiProviderPort>> = if adapters.is_empty() {
            tracing::warn!("No AI provider configured; question generation disabled");
            None
        } else {
            tracing::info!(providers = adapters.len(), "AI failover client ready");
            Some(Arc::new(FailoverAiClient::new(adapters)))
        };

        let use_cases = UseCases {
            ensure_player: use_cases::player::EnsurePlayer::new(players.clone()),
            start_session: use_cases::session::StartSession::new(
                players.clone(),
                sessions.clone(),
            ),
            submit_answer: use_cases::session::SubmitAnswer::new(
                sessions.clone(),
                clock.clone(),
                policy,
            ),
            next_question: use_cases::question::NextQuestion::new(
                questions.clone(),
                categories.clone(),
                ai.clone(),
            ),
            create_room: use_cases::room::CreateRoom::new(rooms.clone(), players.clone()),
            room_summary: use_cases::room::RoomSummary::new(
                rooms.clone(),
                sessions.clone(),
                players.clone(),
            ),
        };

        Self {
            repositories: Repositories {
                players,
                categories,
                questions,
                sessions,
                answers,
                rooms,
            },
            use_cases,
            ai,
        }
    }
}
