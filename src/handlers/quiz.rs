// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::{Value, json};

use crate::{
    error::AppError,
    models::quiz::{DeleteTestRequest, SubmitTestRequest, UpsertTestRequest},
    quiz::{QuizCatalog, QuizError, QuizGrader, grader::Submission, redact::to_public_view},
    utils::{
        body::JsonBody,
        gate::{Admin, NoPayload},
    },
};

/// Lists every test without its answers.
pub async fn list_public_tests(
    State(catalog): State<Arc<QuizCatalog>>,
) -> Result<impl IntoResponse, AppError> {
    let tests = catalog.list_all().await;
    Ok(Json(to_public_view(&tests)))
}

/// Scores a test attempt and records the result.
///
/// Answers are matched to questions by position; see [`crate::quiz::grader::score`].
pub async fn submit_test(
    State(grader): State<Arc<QuizGrader>>,
    JsonBody(req): JsonBody<SubmitTestRequest>,
) -> Result<impl IntoResponse, AppError> {
    let test_id = req
        .test_id
        .as_ref()
        .and_then(Value::as_i64)
        .ok_or(QuizError::TestNotFound)?;
    let result = grader
        .submit(Submission::new(test_id, &req.answers, req.user))
        .await?;

    Ok(Json(result))
}

/// Lists every test as stored, answers and unreadable entries included.
/// Admin only.
pub async fn list_tests(
    State(catalog): State<Arc<QuizCatalog>>,
    Admin(_): Admin<NoPayload>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(catalog.snapshot().await))
}

/// Adds a test, or replaces the test with the same id.
/// Admin only.
pub async fn upsert_test(
    State(catalog): State<Arc<QuizCatalog>>,
    Admin(payload): Admin<UpsertTestRequest>,
) -> Result<impl IntoResponse, AppError> {
    let draft = payload.test.ok_or(QuizError::InvalidTestShape)?;
    let id = catalog.add_or_update(draft).await?;

    Ok(Json(json!({ "ok": true, "id": id })))
}

/// Deletes a test by id.
/// Admin only.
pub async fn delete_test(
    State(catalog): State<Arc<QuizCatalog>>,
    Admin(payload): Admin<DeleteTestRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = payload.id.ok_or(QuizError::NotFound)?;
    catalog.delete(id).await?;

    Ok(Json(json!({ "ok": true })))
}

/// Lists every recorded result in submission order.
/// Admin only.
pub async fn list_results(
    State(grader): State<Arc<QuizGrader>>,
    Admin(_): Admin<NoPayload>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(grader.list_results().await))
}
