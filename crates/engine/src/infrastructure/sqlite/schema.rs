//! Database schema (tables and seed data), ensured at startup.

use sqlx::SqlitePool;

use crate::infrastructure::ports::RepoError;

const TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS players (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        age INTEGER NOT NULL,
        created_at TEXT NOT NULL,
        UNIQUE (name, age)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS questions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        statement TEXT NOT NULL,
        difficulty INTEGER NOT NULL,
        category_id INTEGER NOT NULL REFERENCES categories(id),
        is_ai_generated INTEGER NOT NULL DEFAULT 0,
        admin_verified INTEGER NOT NULL DEFAULT 0,
        is_active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS question_options (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        question_id INTEGER NOT NULL REFERENCES questions(id),
        text TEXT NOT NULL,
        is_correct INTEGER NOT NULL,
        position INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS explanations (
        question_id INTEGER PRIMARY KEY REFERENCES questions(id),
        correct_text TEXT NOT NULL,
        incorrect_text TEXT NOT NULL,
        source_ref TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS game_rooms (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        code TEXT NOT NULL UNIQUE,
        host_player_id INTEGER NOT NULL REFERENCES players(id),
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS game_sessions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        player_id INTEGER NOT NULL REFERENCES players(id),
        room_id INTEGER REFERENCES game_rooms(id),
        current_difficulty REAL NOT NULL,
        score INTEGER NOT NULL,
        lives INTEGER NOT NULL,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS player_answers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        session_id INTEGER NOT NULL REFERENCES game_sessions(id),
        question_id INTEGER NOT NULL,
        selected_option_id INTEGER,
        is_correct INTEGER NOT NULL,
        time_taken_secs REAL NOT NULL,
        difficulty_at_answer REAL NOT NULL,
        answered_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_questions_lookup
        ON questions (category_id, difficulty, admin_verified, is_active)
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_answers_session
        ON player_answers (session_id)
    "#,
];

const SEED_CATEGORIES: &[&str] = &["General Knowledge", "Science", "History", "Geography"];

/// Create tables and seed built-in categories. Idempotent.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepoError> {
    for ddl in TABLES {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(|e| RepoError::database("ensure_schema", e))?;
    }

    for name in SEED_CATEGORIES {
        sqlx::query("INSERT OR IGNORE INTO categories (name) VALUES (?)")
            .bind(name)
            .execute(pool)
            .await
            .map_err(|e| RepoError::database("seed_categories", e))?;
    }

    Ok(())
}
