use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::QuizService;
use crate::errors::QuizHubError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    quizzes::{entities::QuizStatus, responses::QuizResponse},
};
use crate::services::access::load_managed_quiz;

/// 草稿 -> 已发布，至少需要一道题和一个分组
pub async fn publish_quiz(
    service: &QuizService,
    quiz_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    let storage = service.get_storage(request)?;
    let (quiz, _) = load_managed_quiz(&storage, &user, quiz_id).await?;

    if quiz.status != QuizStatus::Draft {
        return Err(QuizHubError::conflict(format!(
            "Only draft quizzes can be published (current status: {})",
            quiz.status
        ))
        .into());
    }

    if storage.count_questions(quiz.id).await? == 0 {
        return Err(
            QuizHubError::validation("Quiz must have at least one question to publish").into(),
        );
    }
    if storage.list_quiz_group_ids(quiz.id).await?.is_empty() {
        return Err(QuizHubError::validation(
            "Quiz must be assigned to at least one group to publish",
        )
        .into());
    }

    let quiz = storage
        .set_quiz_status(quiz.id, QuizStatus::Published)
        .await?
        .ok_or_else(|| QuizHubError::not_found(format!("Quiz {quiz_id} not found")))?;
    info!("Quiz {} published by {}", quiz.id, user.username);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        QuizResponse { quiz },
        "Quiz published successfully",
    )))
}

/// 归档即关闭测验
pub async fn archive_quiz(
    service: &QuizService,
    quiz_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    let storage = service.get_storage(request)?;
    let (quiz, _) = load_managed_quiz(&storage, &user, quiz_id).await?;

    if quiz.status == QuizStatus::Archived {
        return Err(QuizHubError::conflict("Quiz is already archived").into());
    }

    let quiz = storage
        .set_quiz_status(quiz.id, QuizStatus::Archived)
        .await?
        .ok_or_else(|| QuizHubError::not_found(format!("Quiz {quiz_id} not found")))?;
    info!("Quiz {} archived by {}", quiz.id, user.username);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        QuizResponse { quiz },
        "Quiz archived successfully",
    )))
}
