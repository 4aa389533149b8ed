use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::QuestionService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    questions::{requests::QuestionRequest, responses::QuestionResponse},
};
use crate::services::access::{ensure_no_submissions, load_managed_quiz};
use crate::utils::Validate;

pub async fn add_question(
    service: &QuestionService,
    quiz_id: i64,
    question: QuestionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    question.validate()?;

    let storage = service.get_storage(request)?;
    let (quiz, _) = load_managed_quiz(&storage, &user, quiz_id).await?;
    ensure_no_submissions(&storage, quiz.id).await?;

    let question = storage.add_question(quiz.id, question).await?;
    info!(
        "Question {} added to quiz {} at position {}",
        question.id, quiz.id, question.position
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        QuestionResponse { question },
        "Question added successfully",
    )))
}
