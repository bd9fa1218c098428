// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    models::quiz::{CreateQuizRequest, Quiz, QuizDetail, QuizListItem, UpdateQuizRequest},
    utils::jwt::Claims,
};

/// Loads a quiz or fails with 404.
pub async fn find_quiz(pool: &PgPool, quiz_id: i64) -> Result<Quiz, AppError> {
    sqlx::query_as::<_, Quiz>(
        "SELECT id, title, description, created_by, is_public, created_at
         FROM quizzes WHERE id = $1",
    )
    .bind(quiz_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Quiz not found".to_string()))
}

/// Fails with 403 unless the caller is `owner_id` or an admin.
pub fn require_owner_or_admin(claims: &Claims, owner_id: i64, what: &str) -> Result<(), AppError> {
    if claims.user_id()? != owner_id && !claims.is_admin() {
        return Err(AppError::Forbidden(format!("Not authorized to {}", what)));
    }
    Ok(())
}

/// Creates a new quiz owned by the caller.
pub async fn create_quiz(
    State(pool): State<PgPool>,
    claims: Claims,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::Validation(validation_errors.to_string()));
    }

    let quiz = sqlx::query_as::<_, Quiz>(
        r#"
        INSERT INTO quizzes (title, description, created_by)
        VALUES ($1, $2, $3)
        RETURNING id, title, description, created_by, is_public, created_at
        "#,
    )
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(claims.user_id()?)
    .fetch_one(&pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Quiz created successfully",
            "data": quiz
        })),
    ))
}

/// Lists all public quizzes, newest first, with creator usernames resolved.
pub async fn list_quizzes(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let quizzes = sqlx::query_as::<_, QuizListItem>(
        r#"
        SELECT q.id, q.title, q.description, q.created_by,
               u.username AS creator, q.is_public, q.created_at
        FROM quizzes q
        JOIN users u ON u.id = q.created_by
        WHERE q.is_public = TRUE
        ORDER BY q.created_at DESC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(json!({
        "success": true,
        "count": quizzes.len(),
        "data": quizzes
    })))
}

/// Fetches a single quiz with its question count.
/// The questions themselves (and their answers) are served separately.
pub async fn get_quiz(
    State(pool): State<PgPool>,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = sqlx::query_as::<_, QuizDetail>(
        r#"
        SELECT q.id, q.title, q.description, q.created_by,
               u.username AS creator, q.is_public, q.created_at,
               (SELECT COUNT(*) FROM questions WHERE quiz_id = q.id) AS questions_count
        FROM quizzes q
        JOIN users u ON u.id = q.created_by
        WHERE q.id = $1
        "#,
    )
    .bind(quiz_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "data": quiz
    })))
}

/// Updates a quiz. Creator or admin only; absent fields are left unchanged.
pub async fn update_quiz(
    State(pool): State<PgPool>,
    claims: Claims,
    Path(quiz_id): Path<i64>,
    Json(payload): Json<UpdateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::Validation(validation_errors.to_string()));
    }

    let quiz = find_quiz(&pool, quiz_id).await?;
    require_owner_or_admin(&claims, quiz.created_by, "update this quiz")?;

    let updated = sqlx::query_as::<_, Quiz>(
        r#"
        UPDATE quizzes
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            is_public = COALESCE($4, is_public)
        WHERE id = $1
        RETURNING id, title, description, created_by, is_public, created_at
        "#,
    )
    .bind(quiz_id)
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(payload.is_public)
    .fetch_one(&pool)
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Quiz updated successfully",
        "data": updated
    })))
}

/// Deletes a quiz and, via cascade, all of its questions. Creator or admin
/// only. Existing results keep their dangling quiz reference.
pub async fn delete_quiz(
    State(pool): State<PgPool>,
    claims: Claims,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = find_quiz(&pool, quiz_id).await?;
    require_owner_or_admin(&claims, quiz.created_by, "delete this quiz")?;

    sqlx::query("DELETE FROM quizzes WHERE id = $1")
        .bind(quiz_id)
        .execute(&pool)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Quiz and associated questions deleted successfully",
        "data": {}
    })))
}
