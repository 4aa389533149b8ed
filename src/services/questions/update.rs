use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{QuestionService, load_quiz_question};
use crate::errors::QuizHubError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    questions::{requests::QuestionRequest, responses::QuestionResponse},
};
use crate::services::access::{ensure_no_submissions, load_managed_quiz};
use crate::utils::Validate;

pub async fn update_question(
    service: &QuestionService,
    quiz_id: i64,
    question_id: i64,
    question: QuestionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    question.validate()?;

    let storage = service.get_storage(request)?;
    let (quiz, _) = load_managed_quiz(&storage, &user, quiz_id).await?;
    let existing = load_quiz_question(&storage, quiz.id, question_id).await?;
    ensure_no_submissions(&storage, quiz.id).await?;

    let question = storage
        .update_question(existing.id, question)
        .await?
        .ok_or_else(|| QuizHubError::not_found(format!("Question {question_id} not found")))?;
    info!("Question {} in quiz {} updated", question.id, quiz.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        QuestionResponse { question },
        "Question updated successfully",
    )))
}
