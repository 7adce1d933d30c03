//! HTTP routes.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;

use quizforge_domain::{OptionId, PlayerId, QuestionId, SessionId};

use crate::app::App;
use crate::use_cases::{
    question::{NextQuestionOutcome, UnavailableReason},
    session::AnswerSubmission,
    GameError,
};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/players", post(ensure_player))
        .route("/games/start", post(start_game))
        .route("/games/next", get(next_question))
        .route("/games/{session_id}/answer", post(submit_answer))
        .route("/rooms", post(create_room))
        .route("/rooms/{code}", get(room_summary))
        .route("/questions/validate", post(validate_answer))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Extractors
// =============================================================================
//
// Axum's stock extractors reject with plain-text bodies; these wrappers
// route every rejection through `ApiError` so malformed input gets the
// same `{ok: false, error}` shape as every other failure.

struct ApiJson<T>(T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
        }
    }
}

struct ApiQuery<T>(T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
        }
    }
}

struct ApiPath<T>(T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
        }
    }
}

// =============================================================================
// Players
// =============================================================================

#[derive(Deserialize)]
struct EnsurePlayerBody {
    name: String,
    age: u32,
}

#[derive(Serialize)]
struct PlayerResponse {
    ok: bool,
    player_id: i64,
    name: String,
    age: u32,
}

async fn ensure_player(
    State(app): State<Arc<App>>,
    ApiJson(body): ApiJson<EnsurePlayerBody>,
) -> Result<Json<PlayerResponse>, ApiError> {
    let player = app.use_cases.ensure_player.execute(&body.name, body.age).await?;
    Ok(Json(PlayerResponse {
        ok: true,
        player_id: player.id.as_i64(),
        name: player.name,
        age: player.age,
    }))
}

// =============================================================================
// Games
// =============================================================================

#[derive(Deserialize)]
struct StartGameBody {
    player_id: i64,
    start_difficulty: Option<f64>,
    room_id: Option<i64>,
}

#[derive(Serialize)]
struct StartGameResponse {
    ok: bool,
    session_id: i64,
    current_difficulty: f64,
    status: &'static str,
}

async fn start_game(
    State(app): State<Arc<App>>,
    ApiJson(body): ApiJson<StartGameBody>,
) -> Result<(StatusCode, Json<StartGameResponse>), ApiError> {
    let session = app
        .use_cases
        .start_session
        .execute(
            PlayerId::new(body.player_id),
            body.start_difficulty.unwrap_or(1.0),
            body.room_id.map(Into::into),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(StartGameResponse {
            ok: true,
            session_id: session.id.as_i64(),
            current_difficulty: session.current_difficulty.value(),
            status: session.status.as_str(),
        }),
    ))
}

#[derive(Deserialize)]
struct NextQuestionParams {
    category_id: Option<i64>,
    difficulty: Option<i64>,
}

#[derive(Serialize)]
struct QuestionOptionDto {
    id: i64,
    text: String,
    position: u32,
}

#[derive(Serialize)]
struct QuestionDto {
    id: i64,
    statement: String,
    difficulty: u8,
    is_ai_generated: bool,
    admin_verified: bool,
    options: Vec<QuestionOptionDto>,
}

#[derive(Serialize)]
struct NextQuestionResponse {
    ok: bool,
    question: QuestionDto,
}

async fn next_question(
    State(app): State<Arc<App>>,
    ApiQuery(params): ApiQuery<NextQuestionParams>,
) -> Result<Json<NextQuestionResponse>, ApiError> {
    let category_id = params
        .category_id
        .ok_or_else(|| ApiError::BadRequest("Missing category_id".into()))?;
    let difficulty = params
        .difficulty
        .ok_or_else(|| ApiError::BadRequest("Missing difficulty".into()))?;

    let outcome = app
        .use_cases
        .next_question
        .execute(category_id.into(), difficulty)
        .await?;

    let question = match outcome {
        NextQuestionOutcome::Found(q) => q,
        NextQuestionOutcome::Unavailable(reason) => {
            let message = match reason {
                UnavailableReason::AiNotConfigured => "No question available",
                UnavailableReason::GenerationFailed => "No question available",
            };
            return Err(ApiError::NotFound(message.into()));
        }
    };

    // Correctness flags stay server-side.
    let options = app
        .repositories
        .questions
        .options(question.id)
        .await
        .map_err(GameError::from)?
        .into_iter()
        .map(|o| QuestionOptionDto {
            id: o.id.as_i64(),
            text: o.text,
            position: o.position,
        })
        .collect();

    Ok(Json(NextQuestionResponse {
        ok: true,
        question: QuestionDto {
            id: question.id.as_i64(),
            statement: question.statement,
            difficulty: question.difficulty.as_u8(),
            is_ai_generated: question.is_ai_generated,
            admin_verified: question.admin_verified,
            options,
        },
    }))
}

#[derive(Deserialize)]
struct SubmitAnswerBody {
    question_id: i64,
    selected_option_id: Option<i64>,
    is_correct: bool,
    time_taken: f64,
}

#[derive(Serialize)]
struct SubmitAnswerResponse {
    ok: bool,
    score: u32,
    lives: u8,
    status: &'static str,
    next_difficulty: f64,
}

async fn submit_answer(
    State(app): State<Arc<App>>,
    ApiPath(session_id): ApiPath<i64>,
    ApiJson(body): ApiJson<SubmitAnswerBody>,
) -> Result<Json<SubmitAnswerResponse>, ApiError> {
    let outcome = app
        .use_cases
        .submit_answer
        .execute(
            SessionId::new(session_id),
            AnswerSubmission {
                question_id: QuestionId::new(body.question_id),
                selected_option_id: body.selected_option_id.map(OptionId::new),
                is_correct: body.is_correct,
                time_taken_secs: body.time_taken,
            },
        )
        .await?;

    Ok(Json(SubmitAnswerResponse {
        ok: true,
        score: outcome.session.score,
        lives: outcome.session.lives,
        status: outcome.session.status.as_str(),
        next_difficulty: outcome.session.current_difficulty.value(),
    }))
}

// =============================================================================
// Rooms
// =============================================================================

#[derive(Deserialize)]
struct CreateRoomBody {
    host_player_id: i64,
}

#[derive(Serialize)]
struct CreateRoomResponse {
    ok: bool,
    room_id: i64,
    code: String,
}

async fn create_room(
    State(app): State<Arc<App>>,
    ApiJson(body): ApiJson<CreateRoomBody>,
) -> Result<(StatusCode, Json<CreateRoomResponse>), ApiError> {
    let room = app
        .use_cases
        .create_room
        .execute(PlayerId::new(body.host_player_id))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateRoomResponse {
            ok: true,
            room_id: room.id.as_i64(),
            code: room.code.as_str().to_string(),
        }),
    ))
}

#[derive(Serialize)]
struct RoomDto {
    room_id: i64,
    code: String,
    host_player_id: i64,
}

#[derive(Serialize)]
struct RoomPlayerDto {
    player_id: i64,
    name: String,
    score: u32,
    lives: u8,
    status: &'static str,
}

#[derive(Serialize)]
struct RoomSummaryResponse {
    ok: bool,
    room: RoomDto,
    players: Vec<RoomPlayerDto>,
}

async fn room_summary(
    State(app): State<Arc<App>>,
    ApiPath(code): ApiPath<String>,
) -> Result<Json<RoomSummaryResponse>, ApiError> {
    let view = app.use_cases.room_summary.execute(&code).await?;

    Ok(Json(RoomSummaryResponse {
        ok: true,
        room: RoomDto {
            room_id: view.room.id.as_i64(),
            code: view.room.code.as_str().to_string(),
            host_player_id: view.room.host_player_id.as_i64(),
        },
        players: view
            .leaderboard
            .into_iter()
            .map(|entry| RoomPlayerDto {
                player_id: entry.player_id.as_i64(),
                name: entry.player_name,
                score: entry.score,
                lives: entry.lives,
                status: entry.status.as_str(),
            })
            .collect(),
    }))
}

// =============================================================================
// Questions
// =============================================================================

#[derive(Deserialize)]
struct ValidateAnswerBody {
    statement: String,
    answer: String,
}

#[derive(Serialize)]
struct ValidateAnswerResponse {
    ok: bool,
    is_correct: bool,
    explanation: String,
}

async fn validate_answer(
    State(app): State<Arc<App>>,
    ApiJson(body): ApiJson<ValidateAnswerBody>,
) -> Result<Json<ValidateAnswerResponse>, ApiError> {
    let ai = app
        .ai
        .as_ref()
        .ok_or_else(|| ApiError::Unavailable("No AI provider configured".into()))?;

    let feedback = ai
        .validate_answer(&body.statement, &body.answer)
        .await
        .map_err(GameError::from)?;

    Ok(Json(ValidateAnswerResponse {
        ok: true,
        is_correct: feedback.is_correct,
        explanation: feedback.explanation,
    }))
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unavailable(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    ok: bool,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            // Internals are logged, never leaked to clients.
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        (
            status,
            Json(ErrorBody {
                ok: false,
                error: message,
            }),
        )
            .into_response()
    }
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::OutOfRange { .. } | GameError::Validation(_) => {
                ApiError::BadRequest(err.to_string())
            }
            GameError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            GameError::SessionClosed(_) => ApiError::Conflict(err.to_string()),
            GameError::Storage(e) if e.is_conflict() => ApiError::Conflict(e.to_string()),
            GameError::Storage(e) => ApiError::Internal(e.to_string()),
            GameError::Ai(e) => ApiError::Internal(e.to_string()),
        }
    }
}
