//! Repository port traits for database access.

use async_trait::async_trait;
use quizforge_domain::{
    AnswerOption, CategoryId, DifficultyLevel, Explanation, GameRoom, GameSession, NewQuestion,
    Player, PlayerAnswer, PlayerId, Question, QuestionId, RoomCode, RoomId, SessionDifficulty,
    SessionId,
};

use super::error::RepoError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayerRepo: Send + Sync {
    async fn get(&self, id: PlayerId) -> Result<Option<Player>, RepoError>;
    /// Lookup by the identifying pair so returning players reuse their row.
    async fn find_by_name_age(&self, name: &str, age: u32) -> Result<Option<Player>, RepoError>;
    async fn create(&self, name: &str, age: u32) -> Result<Player, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepo: Send + Sync {
    async fn name(&self, id: CategoryId) -> Result<Option<String>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepo: Send + Sync {
    /// Latest active, admin-verified question at (category, difficulty).
    ///
    /// "Latest" (newest created wins) rather than random, so serving
    /// behavior stays deterministic.
    async fn find_verified_latest(
        &self,
        category_id: CategoryId,
        difficulty: DifficultyLevel,
    ) -> Result<Option<Question>, RepoError>;

    async fn get(&self, id: QuestionId) -> Result<Option<Question>, RepoError>;

    /// Persist a question with its options and explanation in one transaction.
    async fn create_generated(&self, question: &NewQuestion) -> Result<Question, RepoError>;

    async fn options(&self, id: QuestionId) -> Result<Vec<AnswerOption>, RepoError>;
    async fn explanation(&self, id: QuestionId) -> Result<Option<Explanation>, RepoError>;

    /// Flip the admin-verified flag (curation surface).
    async fn set_verified(&self, id: QuestionId, verified: bool) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepo: Send + Sync {
    async fn start(
        &self,
        player_id: PlayerId,
        difficulty: SessionDifficulty,
        room_id: Option<RoomId>,
    ) -> Result<GameSession, RepoError>;

    async fn get(&self, id: SessionId) -> Result<Option<GameSession>, RepoError>;

    /// Persist the answer fact and the session progress update atomically.
    ///
    /// The fact carries the pre-transition difficulty, `next` the
    /// post-transition state; neither write may be visible without the
    /// other. The update is guarded against the values in `prior`: if a
    /// concurrent writer got there first the whole write fails with
    /// [`RepoError::Conflict`] and nothing is persisted. A finished
    /// session can therefore never be written back to active.
    async fn apply_answer(
        &self,
        prior: &GameSession,
        next: &GameSession,
        fact: &PlayerAnswer,
    ) -> Result<(), RepoError>;

    async fn list_for_room(&self, room_id: RoomId) -> Result<Vec<GameSession>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnswerRepo: Send + Sync {
    /// Read side of the append-only answer log (per-session stats).
    async fn list_for_session(&self, session_id: SessionId)
        -> Result<Vec<PlayerAnswer>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepo: Send + Sync {
    /// Fails with a constraint violation when the code already exists.
    async fn create(&self, code: &RoomCode, host: PlayerId) -> Result<GameRoom, RepoError>;
    async fn find_by_code(&self, code: &RoomCode) -> Result<Option<GameRoom>, RepoError>;
}
