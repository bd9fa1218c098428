// src/models/result.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};

use crate::scoring::AnswerDetail;

/// Represents the 'results' table in the database.
///
/// One immutable record per (user, quiz) pair, enforced by a unique index.
/// Results deliberately survive quiz deletion, so `quiz_id` may dangle.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct QuizResult {
    pub id: i64,
    pub user_id: i64,
    pub quiz_id: i64,
    pub score: i32,
    pub total_questions: i32,

    /// Per-question ledger for matched answers, in submission order.
    pub answers: Json<Vec<AnswerDetail>>,

    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// A caller's own result with the quiz summary resolved.
/// `quiz_title` is NULL when the quiz has since been deleted.
#[derive(Debug, Serialize, FromRow)]
pub struct MyResultEntry {
    pub id: i64,
    pub quiz_id: i64,
    pub quiz_title: Option<String>,
    pub quiz_description: Option<String>,
    pub score: i32,
    pub total_questions: i32,
    pub answers: Json<Vec<AnswerDetail>>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// One leaderboard row for a quiz, joined with the submitter's username.
#[derive(Debug, Serialize, FromRow)]
pub struct QuizResultEntry {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub score: i32,
    pub total_questions: i32,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Full result detail row with user and quiz summaries resolved.
/// Quiz columns are NULL when the quiz has since been deleted.
#[derive(Debug, FromRow)]
pub struct ResultDetailRow {
    pub id: i64,
    pub user_id: i64,
    pub quiz_id: i64,
    pub username: String,
    pub quiz_title: Option<String>,
    pub quiz_description: Option<String>,
    pub quiz_created_by: Option<i64>,
    pub score: i32,
    pub total_questions: i32,
    pub answers: Json<Vec<AnswerDetail>>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
}
