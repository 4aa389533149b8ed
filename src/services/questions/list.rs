use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::QuestionService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, questions::responses::QuestionListResponse};
use crate::services::access::load_managed_quiz;

pub async fn list_questions(
    service: &QuestionService,
    quiz_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    let storage = service.get_storage(request)?;
    let (quiz, _) = load_managed_quiz(&storage, &user, quiz_id).await?;

    let items = storage.list_questions(quiz.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(QuestionListResponse { items }, "查询成功")))
}
