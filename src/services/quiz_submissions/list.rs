use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::QuizSubmissionService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, quiz_submissions::responses::SubmissionListResponse};
use crate::services::access::{ensure_student, load_managed_quiz};

pub async fn list_my_submissions(
    service: &QuizSubmissionService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    ensure_student(&user)?;

    let storage = service.get_storage(request)?;
    let items = storage.list_submissions_by_student(user.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(SubmissionListResponse { items }, "查询成功")))
}

pub async fn list_quiz_submissions(
    service: &QuizSubmissionService,
    quiz_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    let storage = service.get_storage(request)?;
    let (quiz, _) = load_managed_quiz(&storage, &user, quiz_id).await?;

    let items = storage.list_submissions_by_quiz(quiz.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(SubmissionListResponse { items }, "查询成功")))
}
