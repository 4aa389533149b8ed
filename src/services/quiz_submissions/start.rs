use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::QuizSubmissionService;
use crate::errors::QuizHubError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    quiz_submissions::{requests::StartSubmissionRequest, responses::StartSubmissionResponse},
    quizzes::entities::QuizStatus,
};
use crate::services::access::{ensure_student, load_quiz};

pub async fn start_submission(
    service: &QuizSubmissionService,
    start_data: StartSubmissionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    ensure_student(&user)?;

    let storage = service.get_storage(request)?;
    let quiz = load_quiz(&storage, start_data.quiz_id).await?;

    if !storage.is_student_assigned_to_quiz(quiz.id, user.id).await? {
        return Err(
            QuizHubError::authorization("Quiz is not assigned to any of your groups").into(),
        );
    }

    if quiz.status != QuizStatus::Published {
        return Err(QuizHubError::conflict("Quiz is not published").into());
    }
    if !quiz.is_open_at(chrono::Utc::now()) {
        return Err(QuizHubError::conflict("Quiz is outside its availability window").into());
    }

    // 同一学生同一测验只能有一份进行中的作答
    if storage
        .find_in_progress_submission(quiz.id, user.id)
        .await?
        .is_some()
    {
        return Err(
            QuizHubError::conflict("An attempt for this quiz is already in progress").into(),
        );
    }

    let submission = storage.create_submission(quiz.id, user.id).await?;
    info!(
        "Submission {} started by {} on quiz {}",
        submission.id, user.username, quiz.id
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        StartSubmissionResponse {
            submission_id: submission.id,
            submission,
        },
        "Submission started",
    )))
}
