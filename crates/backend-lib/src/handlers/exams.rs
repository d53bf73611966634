use std::sync::Arc;
use axum::{extract::State, Json};
use campus_common::{ExamScore, ExamSubmission, QuestionView};
use metrics::counter;
use tracing::{info, instrument};
use crate::error::AppError;
use crate::extract::{CurrentUser, Payload};
use crate::metrics::EXAM_SUBMITTED;
use crate::models::ExamResult;
use crate::quiz::{grade, public_questions, QUESTIONS};
use crate::storage::Storage;
use crate::AppState;

/// `GET /api/exams/questions`
pub async fn questions() -> Json<Vec<QuestionView>> {
    Json(public_questions(&QUESTIONS))
}

/// `POST /api/exams/submit`: grade, record, and report the score
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn submit<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
    Payload(req): Payload<ExamSubmission>,
) -> Result<Json<ExamScore>, AppError> {
    let score = grade(&QUESTIONS, &req.answers)?;

    let result = ExamResult::new(user.id, score);
    state.storage.insert(&result).await?;

    counter!(EXAM_SUBMITTED).increment(1);
    info!(score, "exam submitted");

    Ok(Json(ExamScore {
        message: "Exam submitted successfully".to_string(),
        score,
        total: QUESTIONS.len() as u32,
    }))
}
