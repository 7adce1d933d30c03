//! Integration tests for the SQLite repositories against an in-memory
//! database.

use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use quizforge_domain::{
    AdaptivePolicy, CategoryId, DifficultyLevel, Explanation, GameSession, NewOption, NewQuestion,
    PlayerAnswer, QuestionId, RoomCode, SessionDifficulty, SessionStatus, STARTING_LIVES,
};
use quizforge_engine::infrastructure::ports::{
    AnswerRepo, CategoryRepo, ClockPort, PlayerRepo, QuestionRepo, RoomRepo, SessionRepo,
    SystemClock,
};
use quizforge_engine::infrastructure::sqlite::{
    ensure_schema, SqliteAnswerRepo, SqliteCategoryRepo, SqlitePlayerRepo, SqliteQuestionRepo,
    SqliteRoomRepo, SqliteSessionRepo,
};

async fn setup_pool() -> SqlitePool {
    // A single connection keeps the in-memory database alive and shared.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    ensure_schema(&pool).await.expect("schema");
    pool
}

fn clock() -> Arc<dyn ClockPort> {
    Arc::new(SystemClock)
}

fn science_question(category_id: CategoryId) -> NewQuestion {
    NewQuestion {
        statement: "Which planet is closest to the sun?".into(),
        difficulty: DifficultyLevel::Easy,
        category_id,
        is_ai_generated: true,
        admin_verified: false,
        options: vec![
            NewOption {
                text: "Mercury".into(),
                is_correct: true,
            },
            NewOption {
                text: "Venus".into(),
                is_correct: false,
            },
            NewOption {
                text: "Mars".into(),
                is_correct: false,
            },
            NewOption {
                text: "Jupiter".into(),
                is_correct: false,
            },
        ],
        explanation: Explanation {
            correct_text: "Mercury orbits closest to the sun.".into(),
            incorrect_text: "The closest planet is Mercury.".into(),
            source_ref: Some("astronomy 101".into()),
        },
    }
}

#[tokio::test]
async fn seeded_categories_are_queryable() {
    let pool = setup_pool().await;
    let categories = SqliteCategoryRepo::new(pool);

    let name = categories.name(CategoryId::new(2)).await.unwrap();
    assert_eq!(name.as_deref(), Some("Science"));
    assert!(categories.name(CategoryId::new(99)).await.unwrap().is_none());
}

#[tokio::test]
async fn players_round_trip_by_identity_pair() {
    let pool = setup_pool().await;
    let players = SqlitePlayerRepo::new(pool, clock());

    let created = players.create("Ada", 30).await.unwrap();
    let found = players.find_by_name_age("Ada", 30).await.unwrap().unwrap();
    assert_eq!(found.id, created.id);

    assert!(players.find_by_name_age("Ada", 31).await.unwrap().is_none());
    let by_id = players.get(created.id).await.unwrap().unwrap();
    assert_eq!(by_id.name, "Ada");
}

#[tokio::test]
async fn generated_question_round_trips_with_options_and_explanation() {
    let pool = setup_pool().await;
    let questions = SqliteQuestionRepo::new(pool, clock());
    let category_id = CategoryId::new(2);

    let created = questions
        .create_generated(&science_question(category_id))
        .await
        .unwrap();
    assert!(created.is_ai_generated);
    assert!(!created.admin_verified);

    // Direct lookup works immediately, unverified.
    let direct = questions.get(created.id).await.unwrap().unwrap();
    assert_eq!(direct.statement, "Which planet is closest to the sun?");

    let options = questions.options(created.id).await.unwrap();
    assert_eq!(options.len(), 4);
    assert_eq!(options.iter().filter(|o| o.is_correct).count(), 1);
    assert_eq!(options[0].position, 0);

    let explanation = questions.explanation(created.id).await.unwrap().unwrap();
    assert_eq!(explanation.source_ref.as_deref(), Some("astronomy 101"));

    // The verified lookup only sees it after curation.
    let before = questions
        .find_verified_latest(category_id, DifficultyLevel::Easy)
        .await
        .unwrap();
    assert!(before.is_none());

    questions.set_verified(created.id, true).await.unwrap();
    let after = questions
        .find_verified_latest(category_id, DifficultyLevel::Easy)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.id, created.id);
    assert!(after.admin_verified);
}

#[tokio::test]
async fn verified_lookup_prefers_the_newest_question() {
    let pool = setup_pool().await;
    let questions = SqliteQuestionRepo::new(pool, clock());
    let category_id = CategoryId::new(3);

    let mut first = science_question(category_id);
    first.statement = "Older question?".into();
    let mut second = science_question(category_id);
    second.statement = "Newer question?".into();

    let older = questions.create_generated(&first).await.unwrap();
    let newer = questions.create_generated(&second).await.unwrap();
    questions.set_verified(older.id, true).await.unwrap();
    questions.set_verified(newer.id, true).await.unwrap();

    let latest = questions
        .find_verified_latest(category_id, DifficultyLevel::Easy)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.id, newer.id);
}

#[tokio::test]
async fn session_answer_fact_and_update_stay_consistent() {
    let pool = setup_pool().await;
    let players = SqlitePlayerRepo::new(pool.clone(), clock());
    let sessions = SqliteSessionRepo::new(pool.clone(), clock());
    let answers = SqliteAnswerRepo::new(pool.clone());
    let questions = SqliteQuestionRepo::new(pool, clock());

    let player = players.create("Grace", 45).await.unwrap();
    let question = questions
        .create_generated(&science_question(CategoryId::new(2)))
        .await
        .unwrap();

    let session = sessions
        .start(player.id, SessionDifficulty::new(2.0).unwrap(), None)
        .await
        .unwrap();
    assert_eq!(session.score, 0);
    assert_eq!(session.lives, STARTING_LIVES);
    assert_eq!(session.status, SessionStatus::Active);

    let now = SystemClock.now();
    let transition = session
        .answer(true, 3.0, &AdaptivePolicy::default(), now)
        .unwrap();
    let fact = PlayerAnswer {
        session_id: session.id,
        question_id: question.id,
        selected_option_id: None,
        is_correct: true,
        time_taken_secs: 3.0,
        difficulty_at_answer: transition.difficulty_at_answer,
        answered_at: now,
    };
    sessions
        .apply_answer(&session, &transition.session, &fact)
        .await
        .unwrap();

    let stored = sessions.get(session.id).await.unwrap().unwrap();
    assert_eq!(stored.score, 15);
    assert_eq!(stored.current_difficulty.value(), 2.25);
    assert_eq!(stored.lives, STARTING_LIVES);
    // The persisted timestamp is the one the transition carries.
    assert_eq!(stored.updated_at, transition.session.updated_at);

    let facts = answers.list_for_session(session.id).await.unwrap();
    assert_eq!(facts.len(), 1);
    // The fact holds the pre-transition difficulty, the session the new one.
    assert_eq!(facts[0].difficulty_at_answer.value(), 2.0);
    assert!(facts[0].is_correct);
}

#[tokio::test]
async fn stale_write_cannot_revive_a_finished_session() {
    let pool = setup_pool().await;
    let players = SqlitePlayerRepo::new(pool.clone(), clock());
    let sessions = SqliteSessionRepo::new(pool.clone(), clock());
    let answers = SqliteAnswerRepo::new(pool);
    let policy = AdaptivePolicy::default();

    let fact = |session: &GameSession,
                is_correct: bool,
                time_taken_secs: f64,
                difficulty_at_answer: SessionDifficulty,
                answered_at| PlayerAnswer {
        session_id: session.id,
        question_id: QuestionId::new(1),
        selected_option_id: None,
        is_correct,
        time_taken_secs,
        difficulty_at_answer,
        answered_at,
    };

    let player = players.create("Grace", 45).await.unwrap();
    let mut session = sessions
        .start(player.id, SessionDifficulty::new(2.0).unwrap(), None)
        .await
        .unwrap();

    // Burn down to the last life.
    while session.lives > 1 {
        let now = SystemClock.now();
        let transition = session.answer(false, 8.0, &policy, now).unwrap();
        sessions
            .apply_answer(
                &session,
                &transition.session,
                &fact(&session, false, 8.0, transition.difficulty_at_answer, now),
            )
            .await
            .unwrap();
        session = sessions.get(session.id).await.unwrap().unwrap();
    }

    // Two submits race from the same read of the session.
    let read_a = sessions.get(session.id).await.unwrap().unwrap();
    let read_b = sessions.get(session.id).await.unwrap().unwrap();

    let now = SystemClock.now();
    let losing = read_a.answer(false, 8.0, &policy, now).unwrap();
    sessions
        .apply_answer(
            &read_a,
            &losing.session,
            &fact(&read_a, false, 8.0, losing.difficulty_at_answer, now),
        )
        .await
        .unwrap();

    // The second submit computed its transition from the stale read; it
    // must fail instead of writing active over game_over.
    let stale = read_b.answer(true, 2.0, &policy, now).unwrap();
    let err = sessions
        .apply_answer(
            &read_b,
            &stale.session,
            &fact(&read_b, true, 2.0, stale.difficulty_at_answer, now),
        )
        .await
        .unwrap_err();
    assert!(err.is_conflict());

    // The finished state stands and the stale fact rolled back with it.
    let stored = sessions.get(session.id).await.unwrap().unwrap();
    assert_eq!(stored.status, SessionStatus::GameOver);
    assert_eq!(stored.lives, 0);
    let facts = answers.list_for_session(session.id).await.unwrap();
    assert_eq!(facts.len(), STARTING_LIVES as usize);
}

#[tokio::test]
async fn room_codes_are_unique_and_resolvable() {
    let pool = setup_pool().await;
    let players = SqlitePlayerRepo::new(pool.clone(), clock());
    let rooms = SqliteRoomRepo::new(pool, clock());

    let host = players.create("Ada", 30).await.unwrap();
    let code = RoomCode::parse("ABC234").unwrap();

    let room = rooms.create(&code, host.id).await.unwrap();
    let found = rooms.find_by_code(&code).await.unwrap().unwrap();
    assert_eq!(found.id, room.id);
    assert_eq!(found.host_player_id, host.id);

    // Same code again must surface as a constraint violation.
    let err = rooms.create(&code, host.id).await.unwrap_err();
    assert!(err.is_constraint_violation());

    let missing = RoomCode::parse("ZZZZZZ").unwrap();
    assert!(rooms.find_by_code(&missing).await.unwrap().is_none());
}

#[tokio::test]
async fn room_sessions_rank_by_score() {
    let pool = setup_pool().await;
    let players = SqlitePlayerRepo::new(pool.clone(), clock());
    let rooms = SqliteRoomRepo::new(pool.clone(), clock());
    let sessions = SqliteSessionRepo::new(pool, clock());

    let host = players.create("Ada", 30).await.unwrap();
    let rival = players.create("Grace", 45).await.unwrap();
    let room = rooms
        .create(&RoomCode::parse("RMX427").unwrap(), host.id)
        .await
        .unwrap();

    let low = sessions
        .start(host.id, SessionDifficulty::default(), Some(room.id))
        .await
        .unwrap();
    let high = sessions
        .start(rival.id, SessionDifficulty::default(), Some(room.id))
        .await
        .unwrap();

    // Push the rival's score up through an answer transition.
    let now = SystemClock.now();
    let transition = high.answer(true, 2.0, &AdaptivePolicy::default(), now).unwrap();
    let fact = PlayerAnswer {
        session_id: high.id,
        question_id: QuestionId::new(1),
        selected_option_id: None,
        is_correct: true,
        time_taken_secs: 2.0,
        difficulty_at_answer: transition.difficulty_at_answer,
        answered_at: now,
    };
    sessions
        .apply_answer(&high, &transition.session, &fact)
        .await
        .unwrap();

    let ranked = sessions.list_for_room(room.id).await.unwrap();
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].id, high.id);
    assert_eq!(ranked[1].id, low.id);
}
