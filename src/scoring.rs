// src/scoring.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Answer key for one question, as loaded from the database.
/// The full question set for a quiz is loaded once per scoring pass and
/// matched in memory by ID.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnswerKey {
    pub id: i64,
    pub correct_answer: i32,
}

/// One caller-supplied answer. Not persisted as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmittedAnswer {
    pub question_id: i64,
    pub selected_answer: i32,
}

/// One ledger entry of a scored submission: the selected option and whether
/// it matched the correct answer. Stored inside the result record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerDetail {
    pub question_id: i64,
    pub selected_answer: i32,
    pub is_correct: bool,
}

/// Aggregate outcome of scoring one submission.
#[derive(Debug, Clone)]
pub struct ScoreOutcome {
    /// Number of correctly answered questions.
    pub score: i32,
    /// Number of questions in the quiz, independent of how many were answered.
    pub total_questions: i32,
    /// Ledger of matched answers, in submission order. Answers referencing
    /// unknown questions are dropped and never appear here.
    pub answers: Vec<AnswerDetail>,
}

/// A quiz with zero questions cannot be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyQuestionSet;

impl From<EmptyQuestionSet> for crate::error::AppError {
    fn from(_: EmptyQuestionSet) -> Self {
        crate::error::AppError::BadRequest("This quiz has no questions".to_string())
    }
}

/// Resolves one submitted answer against the question set.
///
/// Returns `None` when the question does not exist in the set (the answer is
/// dropped without failing the submission). An out-of-range selected index is
/// simply never equal to the correct answer, so it scores as incorrect.
pub fn match_answer(key: Option<&AnswerKey>, selected_answer: i32) -> Option<bool> {
    key.map(|k| k.correct_answer == selected_answer)
}

/// Folds a batch of submitted answers against a quiz's question set.
///
/// The score counts correct matches only; the total is always the size of the
/// question set, so the percentage is relative to the full quiz even when the
/// caller answered a subset.
pub fn score_submission(
    keys: &[AnswerKey],
    submitted: &[SubmittedAnswer],
) -> Result<ScoreOutcome, EmptyQuestionSet> {
    if keys.is_empty() {
        return Err(EmptyQuestionSet);
    }

    let by_id: HashMap<i64, &AnswerKey> = keys.iter().map(|k| (k.id, k)).collect();

    let mut score = 0;
    let mut answers = Vec::with_capacity(submitted.len());

    for answer in submitted {
        if let Some(is_correct) =
            match_answer(by_id.get(&answer.question_id).copied(), answer.selected_answer)
        {
            if is_correct {
                score += 1;
            }
            answers.push(AnswerDetail {
                question_id: answer.question_id,
                selected_answer: answer.selected_answer,
                is_correct,
            });
        }
    }

    Ok(ScoreOutcome {
        score,
        total_questions: keys.len() as i32,
        answers,
    })
}

/// Score as a percentage of the full question set, formatted with two
/// decimal places. Computed at response time, never persisted.
pub fn percentage(score: i32, total_questions: i32) -> String {
    if total_questions <= 0 {
        return "0.00".to_string();
    }
    format!(
        "{:.2}",
        f64::from(score) / f64::from(total_questions) * 100.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(correct: &[i32]) -> Vec<AnswerKey> {
        correct
            .iter()
            .enumerate()
            .map(|(i, &correct_answer)| AnswerKey {
                id: i as i64 + 1,
                correct_answer,
            })
            .collect()
    }

    fn answer(question_id: i64, selected_answer: i32) -> SubmittedAnswer {
        SubmittedAnswer {
            question_id,
            selected_answer,
        }
    }

    #[test]
    fn scores_the_worked_example() {
        // Quiz with 3 questions, correct indices [1, 0, 2]. The answer for
        // question 4 references a question that does not exist.
        let keys = keys(&[1, 0, 2]);
        let submitted = vec![answer(1, 1), answer(2, 0), answer(3, 1), answer(4, 0)];

        let outcome = score_submission(&keys, &submitted).unwrap();

        assert_eq!(outcome.score, 2);
        assert_eq!(outcome.total_questions, 3);
        assert_eq!(outcome.answers.len(), 3);
        assert_eq!(percentage(outcome.score, outcome.total_questions), "66.67");
    }

    #[test]
    fn unknown_question_is_dropped_from_ledger_and_score() {
        let keys = keys(&[0]);
        let submitted = vec![answer(99, 0)];

        let outcome = score_submission(&keys, &submitted).unwrap();

        assert_eq!(outcome.score, 0);
        assert!(outcome.answers.is_empty());
    }

    #[test]
    fn ledger_preserves_submission_order() {
        let keys = keys(&[0, 0, 0]);
        let submitted = vec![answer(3, 0), answer(1, 2), answer(2, 0)];

        let outcome = score_submission(&keys, &submitted).unwrap();

        let order: Vec<i64> = outcome.answers.iter().map(|a| a.question_id).collect();
        assert_eq!(order, vec![3, 1, 2]);
        assert_eq!(outcome.score, 2);
    }

    #[test]
    fn out_of_range_selection_is_incorrect_not_an_error() {
        let keys = keys(&[1]);
        let submitted = vec![answer(1, 42), answer(1, -3)];

        let outcome = score_submission(&keys, &submitted).unwrap();

        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.answers.len(), 2);
        assert!(outcome.answers.iter().all(|a| !a.is_correct));
    }

    #[test]
    fn total_is_question_count_not_answer_count() {
        let keys = keys(&[0, 1, 2, 0]);

        let empty = score_submission(&keys, &[]).unwrap();
        assert_eq!(empty.total_questions, 4);
        assert_eq!(empty.score, 0);
        assert!(empty.answers.is_empty());

        let partial = score_submission(&keys, &[answer(2, 1)]).unwrap();
        assert_eq!(partial.total_questions, 4);
        assert_eq!(partial.score, 1);
    }

    #[test]
    fn duplicate_answers_for_one_question_each_get_a_ledger_entry() {
        let keys = keys(&[1]);
        let submitted = vec![answer(1, 1), answer(1, 0)];

        let outcome = score_submission(&keys, &submitted).unwrap();

        assert_eq!(outcome.answers.len(), 2);
        assert_eq!(outcome.score, 1);
    }

    #[test]
    fn empty_question_set_is_rejected() {
        assert!(score_submission(&[], &[answer(1, 0)]).is_err());
        assert!(score_submission(&[], &[]).is_err());
    }

    #[test]
    fn match_answer_resolves_equality_only() {
        let key = AnswerKey {
            id: 1,
            correct_answer: 2,
        };

        assert_eq!(match_answer(Some(&key), 2), Some(true));
        assert_eq!(match_answer(Some(&key), 0), Some(false));
        assert_eq!(match_answer(None, 2), None);
    }

    #[test]
    fn percentage_is_rounded_to_two_decimals() {
        assert_eq!(percentage(1, 3), "33.33");
        assert_eq!(percentage(2, 3), "66.67");
        assert_eq!(percentage(3, 3), "100.00");
        assert_eq!(percentage(0, 7), "0.00");
        assert_eq!(percentage(0, 0), "0.00");
    }
}
