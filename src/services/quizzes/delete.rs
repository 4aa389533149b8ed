use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::QuizService;
use crate::errors::QuizHubError;
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::services::access::{ensure_no_submissions, load_managed_quiz};

pub async fn delete_quiz(
    service: &QuizService,
    quiz_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    let storage = service.get_storage(request)?;
    let (quiz, _) = load_managed_quiz(&storage, &user, quiz_id).await?;

    ensure_no_submissions(&storage, quiz.id).await?;

    if !storage.delete_quiz(quiz.id).await? {
        return Err(QuizHubError::not_found(format!("Quiz {quiz_id} not found")).into());
    }
    info!("Quiz {} deleted by {}", quiz.id, user.username);

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Quiz deleted successfully")))
}
