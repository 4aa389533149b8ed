use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::QuizService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    quizzes::{requests::CreateQuizRequest, responses::QuizResponse},
};
use crate::services::access::{ensure_course_staff, load_course};
use crate::utils::Validate;

pub async fn create_quiz(
    service: &QuizService,
    quiz_data: CreateQuizRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    quiz_data.validate()?;

    let storage = service.get_storage(request)?;
    let course = load_course(&storage, quiz_data.course_id).await?;
    ensure_course_staff(&user, &course)?;

    let quiz = storage.create_quiz(quiz_data, user.id).await?;
    info!(
        "Quiz {} ({}) created in course {} by {}",
        quiz.id, quiz.title, course.code, user.username
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        QuizResponse { quiz },
        "Quiz created successfully",
    )))
}
