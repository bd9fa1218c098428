// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'quizzes' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,

    /// ID of the user who created the quiz. The creator (or an admin) may
    /// mutate the quiz and its questions and view its results.
    pub created_by: i64,

    pub is_public: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Quiz with the creator's username resolved, for public listings.
#[derive(Debug, Serialize, FromRow)]
pub struct QuizListItem {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_by: i64,
    pub creator: String,
    pub is_public: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Quiz detail including how many questions it holds.
#[derive(Debug, Serialize, FromRow)]
pub struct QuizDetail {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub created_by: i64,
    pub creator: String,
    pub is_public: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub questions_count: i64,
}

/// DTO for creating a new quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(
        min = 3,
        max = 100,
        message = "Title length must be between 3 and 100 characters."
    ))]
    pub title: String,
    #[validate(length(max = 500, message = "Description must be at most 500 characters."))]
    pub description: Option<String>,
}

/// DTO for updating a quiz. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateQuizRequest {
    #[validate(length(
        min = 3,
        max = 100,
        message = "Title length must be between 3 and 100 characters."
    ))]
    pub title: Option<String>,
    #[validate(length(max = 500, message = "Description must be at most 500 characters."))]
    pub description: Option<String>,
    pub is_public: Option<bool>,
}
