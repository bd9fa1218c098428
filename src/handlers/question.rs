// src/handlers/question.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::{PgPool, types::Json as SqlJson};
use validator::Validate;

use crate::{
    error::AppError,
    handlers::quiz::{find_quiz, require_owner_or_admin},
    models::question::{PublicQuestion, Question, QuestionRequest},
    utils::jwt::Claims,
};

const QUESTION_COLUMNS: &str = "id, quiz_id, question_text, options, correct_answer, created_at";

async fn find_question(pool: &PgPool, question_id: i64) -> Result<Question, AppError> {
    sqlx::query_as::<_, Question>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM questions WHERE id = $1"
    ))
    .bind(question_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Question not found".to_string()))
}

/// Adds a question to a quiz. Quiz creator or admin only.
///
/// Field rules (text length, 2-6 options, correct index within bounds) are
/// checked explicitly before the insert and fail with per-field messages.
pub async fn add_question(
    State(pool): State<PgPool>,
    claims: Claims,
    Path(quiz_id): Path<i64>,
    Json(payload): Json<QuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = find_quiz(&pool, quiz_id).await?;
    require_owner_or_admin(&claims, quiz.created_by, "add questions to this quiz")?;

    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::Validation(validation_errors.to_string()));
    }

    let question = sqlx::query_as::<_, Question>(&format!(
        r#"
        INSERT INTO questions (quiz_id, question_text, options, correct_answer)
        VALUES ($1, $2, $3, $4)
        RETURNING {QUESTION_COLUMNS}
        "#
    ))
    .bind(quiz_id)
    .bind(&payload.question_text)
    .bind(SqlJson(&payload.options))
    .bind(payload.correct_answer)
    .fetch_one(&pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Question added successfully",
            "data": question
        })),
    ))
}

/// Lists all questions of a quiz.
///
/// The correct answer indices are withheld unless the viewer is the quiz
/// creator or an admin.
pub async fn list_questions(
    State(pool): State<PgPool>,
    claims: Claims,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = find_quiz(&pool, quiz_id).await?;

    let questions = sqlx::query_as::<_, Question>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM questions WHERE quiz_id = $1 ORDER BY id"
    ))
    .bind(quiz_id)
    .fetch_all(&pool)
    .await?;

    let is_creator_or_admin = claims.user_id()? == quiz.created_by || claims.is_admin();

    if is_creator_or_admin {
        Ok(Json(json!({
            "success": true,
            "count": questions.len(),
            "data": questions
        })))
    } else {
        let public: Vec<PublicQuestion> = questions.into_iter().map(Into::into).collect();
        Ok(Json(json!({
            "success": true,
            "count": public.len(),
            "data": public
        })))
    }
}

/// Replaces a question's text, options and correct answer.
/// Quiz creator or admin only.
pub async fn update_question(
    State(pool): State<PgPool>,
    claims: Claims,
    Path(question_id): Path<i64>,
    Json(payload): Json<QuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let question = find_question(&pool, question_id).await?;
    let quiz = find_quiz(&pool, question.quiz_id).await?;
    require_owner_or_admin(&claims, quiz.created_by, "update this question")?;

    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::Validation(validation_errors.to_string()));
    }

    let updated = sqlx::query_as::<_, Question>(&format!(
        r#"
        UPDATE questions
        SET question_text = $2, options = $3, correct_answer = $4
        WHERE id = $1
        RETURNING {QUESTION_COLUMNS}
        "#
    ))
    .bind(question_id)
    .bind(&payload.question_text)
    .bind(SqlJson(&payload.options))
    .bind(payload.correct_answer)
    .fetch_one(&pool)
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Question updated successfully",
        "data": updated
    })))
}

/// Deletes a question. Quiz creator or admin only.
pub async fn delete_question(
    State(pool): State<PgPool>,
    claims: Claims,
    Path(question_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let question = find_question(&pool, question_id).await?;
    let quiz = find_quiz(&pool, question.quiz_id).await?;
    require_owner_or_admin(&claims, quiz.created_by, "delete this question")?;

    sqlx::query("DELETE FROM questions WHERE id = $1")
        .bind(question_id)
        .execute(&pool)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Question deleted successfully",
        "data": {}
    })))
}
