// src/handlers/result.rs

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::{PgPool, types::Json as SqlJson};

use crate::{
    error::{AppError, on_unique_violation},
    handlers::quiz::{find_quiz, require_owner_or_admin},
    models::result::{MyResultEntry, QuizResult, QuizResultEntry, ResultDetailRow},
    scoring::{self, AnswerKey, SubmittedAnswer},
    utils::jwt::Claims,
};

/// Helper struct for resolving ledger entries into question detail.
#[derive(sqlx::FromRow)]
struct ResolvedQuestion {
    id: i64,
    question_text: String,
    options: SqlJson<Vec<String>>,
    correct_answer: i32,
}

/// Fast-path duplicate check. The binding guarantee against concurrent
/// submissions is the unique index on results (user_id, quiz_id); the insert
/// in `submit_quiz` translates its violation to the same Conflict error.
async fn check_not_submitted(pool: &PgPool, user_id: i64, quiz_id: i64) -> Result<(), AppError> {
    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM results WHERE user_id = $1 AND quiz_id = $2",
    )
    .bind(user_id)
    .bind(quiz_id)
    .fetch_optional(pool)
    .await?;

    if existing.is_some() {
        return Err(AppError::Conflict(
            "You have already submitted this quiz".to_string(),
        ));
    }
    Ok(())
}

/// Pulls the answer array out of a submission body.
///
/// The body is taken as a raw JSON value so a missing or non-array
/// `answers` field yields a 400 with the enveloped message rather than a
/// body-deserialization rejection.
fn parse_answers(body: &serde_json::Value) -> Result<Vec<SubmittedAnswer>, AppError> {
    match body.get("answers") {
        Some(answers @ serde_json::Value::Array(_)) => Ok(serde_json::from_value(answers.clone())?),
        _ => Err(AppError::BadRequest(
            "Please provide answers in correct format".to_string(),
        )),
    }
}

/// Submits answers for a quiz, scores them and persists the result.
///
/// * One submission per user per quiz; a repeat attempt gets 409.
/// * Answers referencing unknown questions are silently dropped.
/// * The stored result is immutable; the percentage is computed here and
///   never persisted.
pub async fn submit_quiz(
    State(pool): State<PgPool>,
    claims: Claims,
    Path(quiz_id): Path<i64>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = find_quiz(&pool, quiz_id).await?;

    let submitted = parse_answers(&body)?;

    let user_id = claims.user_id()?;
    check_not_submitted(&pool, user_id, quiz_id).await?;

    // One-shot snapshot of the quiz's answer keys; all matching happens
    // in memory against this set.
    let keys = sqlx::query_as::<_, AnswerKey>(
        "SELECT id, correct_answer FROM questions WHERE quiz_id = $1",
    )
    .bind(quiz_id)
    .fetch_all(&pool)
    .await?;

    let outcome = scoring::score_submission(&keys, &submitted)?;

    let result = sqlx::query_as::<_, QuizResult>(
        r#"
        INSERT INTO results (user_id, quiz_id, score, total_questions, answers)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, quiz_id, score, total_questions, answers, submitted_at
        "#,
    )
    .bind(user_id)
    .bind(quiz_id)
    .bind(outcome.score)
    .bind(outcome.total_questions)
    .bind(SqlJson(&outcome.answers))
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        on_unique_violation(
            e,
            AppError::Conflict("You have already submitted this quiz".to_string()),
        )
    })?;

    let username = sqlx::query_scalar::<_, String>("SELECT username FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(&pool)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Quiz submitted successfully",
            "data": {
                "score": result.score,
                "total_questions": result.total_questions,
                "percentage": scoring::percentage(result.score, result.total_questions),
                "result": {
                    "id": result.id,
                    "user": { "id": user_id, "username": username },
                    "quiz": { "id": quiz.id, "title": quiz.title, "description": quiz.description },
                    "score": result.score,
                    "total_questions": result.total_questions,
                    "answers": result.answers,
                    "submitted_at": result.submitted_at
                }
            }
        })),
    ))
}

/// Lists the caller's own results, newest submission first.
/// A user always sees their own full detail.
pub async fn my_results(
    State(pool): State<PgPool>,
    claims: Claims,
) -> Result<impl IntoResponse, AppError> {
    let results = sqlx::query_as::<_, MyResultEntry>(
        r#"
        SELECT r.id, r.quiz_id, q.title AS quiz_title, q.description AS quiz_description,
               r.score, r.total_questions, r.answers, r.submitted_at
        FROM results r
        LEFT JOIN quizzes q ON q.id = r.quiz_id
        WHERE r.user_id = $1
        ORDER BY r.submitted_at DESC
        "#,
    )
    .bind(claims.user_id()?)
    .fetch_all(&pool)
    .await?;

    Ok(Json(json!({
        "success": true,
        "count": results.len(),
        "data": results
    })))
}

/// Fetches one result in full detail, with the ledger's questions resolved.
/// Only the result's owner or an admin may view it; correct answer indices
/// are additionally withheld unless the viewer is the quiz creator or admin.
pub async fn get_result(
    State(pool): State<PgPool>,
    claims: Claims,
    Path(result_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let row = sqlx::query_as::<_, ResultDetailRow>(
        r#"
        SELECT r.id, r.user_id, r.quiz_id, u.username,
               q.title AS quiz_title, q.description AS quiz_description,
               q.created_by AS quiz_created_by,
               r.score, r.total_questions, r.answers, r.submitted_at
        FROM results r
        JOIN users u ON u.id = r.user_id
        LEFT JOIN quizzes q ON q.id = r.quiz_id
        WHERE r.id = $1
        "#,
    )
    .bind(result_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Result not found".to_string()))?;

    require_owner_or_admin(&claims, row.user_id, "view this result")?;

    let question_ids: Vec<i64> = row.answers.0.iter().map(|a| a.question_id).collect();
    let questions = sqlx::query_as::<_, ResolvedQuestion>(
        "SELECT id, question_text, options, correct_answer FROM questions WHERE id = ANY($1)",
    )
    .bind(&question_ids)
    .fetch_all(&pool)
    .await?;
    let by_id: HashMap<i64, &ResolvedQuestion> = questions.iter().map(|q| (q.id, q)).collect();

    // Correct answers are only revealed to the quiz creator or an admin,
    // matching the question-listing visibility rule.
    let reveal_correct =
        claims.is_admin() || row.quiz_created_by == Some(claims.user_id()?);

    let answers: Vec<serde_json::Value> = row
        .answers
        .0
        .iter()
        .map(|a| {
            // Question may have been deleted since submission.
            let question = by_id.get(&a.question_id).map(|q| {
                let mut body = json!({
                    "id": q.id,
                    "question_text": q.question_text,
                    "options": q.options,
                });
                if reveal_correct {
                    body["correct_answer"] = json!(q.correct_answer);
                }
                body
            });
            json!({
                "question_id": a.question_id,
                "question": question,
                "selected_answer": a.selected_answer,
                "is_correct": a.is_correct
            })
        })
        .collect();

    Ok(Json(json!({
        "success": true,
        "data": {
            "id": row.id,
            "user": { "id": row.user_id, "username": row.username },
            "quiz": {
                "id": row.quiz_id,
                "title": row.quiz_title,
                "description": row.quiz_description
            },
            "score": row.score,
            "total_questions": row.total_questions,
            "percentage": scoring::percentage(row.score, row.total_questions),
            "answers": answers,
            "submitted_at": row.submitted_at
        }
    })))
}

/// Lists all results for a quiz, best score first. Quiz creator or admin
/// only (a leaderboard / grading view).
pub async fn quiz_results(
    State(pool): State<PgPool>,
    claims: Claims,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = find_quiz(&pool, quiz_id).await?;
    require_owner_or_admin(&claims, quiz.created_by, "view these results")?;

    let results = sqlx::query_as::<_, QuizResultEntry>(
        r#"
        SELECT r.id, r.user_id, u.username, r.score, r.total_questions, r.submitted_at
        FROM results r
        JOIN users u ON u.id = r.user_id
        WHERE r.quiz_id = $1
        ORDER BY r.score DESC, r.submitted_at ASC
        "#,
    )
    .bind(quiz_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(json!({
        "success": true,
        "count": results.len(),
        "data": results
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_answers_accepts_an_array() {
        let body = json!({
            "answers": [
                { "question_id": 1, "selected_answer": 0 },
                { "question_id": 2, "selected_answer": 3 }
            ]
        });

        let answers = parse_answers(&body).unwrap();

        assert_eq!(answers.len(), 2);
        assert_eq!(answers[0].question_id, 1);
        assert_eq!(answers[1].selected_answer, 3);
    }

    #[test]
    fn parse_answers_rejects_a_missing_field() {
        let err = parse_answers(&json!({})).unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn parse_answers_rejects_a_non_array_field() {
        for body in [
            json!({ "answers": "not-an-array" }),
            json!({ "answers": 42 }),
            json!({ "answers": { "question_id": 1 } }),
            json!({ "answers": null }),
        ] {
            let err = parse_answers(&body).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)));
        }
    }

    #[test]
    fn parse_answers_rejects_malformed_entries() {
        let body = json!({ "answers": [{ "question_id": "one" }] });

        assert!(matches!(
            parse_answers(&body).unwrap_err(),
            AppError::BadRequest(_)
        ));
    }
}
