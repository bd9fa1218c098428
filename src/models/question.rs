// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    /// The quiz this question belongs to.
    pub quiz_id: i64,

    /// The text content of the question.
    pub question_text: String,

    /// Ordered list of options (e.g., ["Option A", "Option B"]).
    /// Stored as a JSON array in the database.
    pub options: Json<Vec<String>>,

    /// Index of the correct option. Invariant: 0 <= correct_answer < options.len().
    pub correct_answer: i32,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for sending a question to non-owners (excludes the correct answer).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub quiz_id: i64,
    pub question_text: String,
    pub options: Json<Vec<String>>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            quiz_id: q.quiz_id,
            question_text: q.question_text,
            options: q.options,
            created_at: q.created_at,
        }
    }
}

/// DTO for creating or replacing a question.
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = validate_correct_answer))]
pub struct QuestionRequest {
    #[validate(length(
        min = 5,
        max = 1000,
        message = "Question must be at least 5 characters."
    ))]
    pub question_text: String,
    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,
    pub correct_answer: i32,
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    if options.len() < 2 || options.len() > 6 {
        return Err(validator::ValidationError::new(
            "must_have_between_2_and_6_options",
        ));
    }
    for opt in options {
        if opt.is_empty() || opt.len() > 500 {
            return Err(validator::ValidationError::new("option_length_invalid"));
        }
    }
    Ok(())
}

fn validate_correct_answer(req: &QuestionRequest) -> Result<(), validator::ValidationError> {
    if req.correct_answer < 0 || req.correct_answer as usize >= req.options.len() {
        return Err(validator::ValidationError::new(
            "correct_answer_must_be_a_valid_option_index",
        ));
    }
    Ok(())
}
