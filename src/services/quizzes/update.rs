use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::QuizService;
use crate::errors::QuizHubError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    quizzes::{
        requests::{UpdateQuizRequest, validate_window},
        responses::QuizResponse,
    },
};
use crate::services::access::load_managed_quiz;
use crate::utils::Validate;

pub async fn update_quiz(
    service: &QuizService,
    quiz_id: i64,
    update_data: UpdateQuizRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    update_data.validate()?;

    let storage = service.get_storage(request)?;
    let (quiz, _) = load_managed_quiz(&storage, &user, quiz_id).await?;

    // 只改一端时要与已有的另一端一起校验
    validate_window(
        update_data.available_from.unwrap_or(quiz.available_from),
        update_data.available_to.unwrap_or(quiz.available_to),
    )?;

    let quiz = storage
        .update_quiz(quiz.id, update_data)
        .await?
        .ok_or_else(|| QuizHubError::not_found(format!("Quiz {quiz_id} not found")))?;
    info!("Quiz {} updated by {}", quiz.id, user.username);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        QuizResponse { quiz },
        "Quiz updated successfully",
    )))
}
