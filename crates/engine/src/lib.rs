//! QuizForge Engine library.
//!
//! This crate contains all server-side code for the adaptive quiz engine.
//!
//! ## Structure
//!
//! - `use_cases/` - Game flow orchestration over the port traits
//! - `infrastructure/` - Port traits plus SQLite and AI-provider adapters
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
