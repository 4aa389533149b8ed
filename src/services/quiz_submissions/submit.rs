use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{QuizSubmissionService, grading, load_owned_submission};
use crate::errors::QuizHubError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    notifications::{entities::NotificationType, requests::CreateNotificationRequest},
    quiz_submissions::{
        entities::SubmissionStatus, requests::SubmitQuizRequest, responses::SubmissionResponse,
    },
};
use crate::services::access::load_quiz;

pub async fn submit_quiz(
    service: &QuizSubmissionService,
    submit_data: SubmitQuizRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    let storage = service.get_storage(request)?;
    let submission = load_owned_submission(&storage, &user, submit_data.submission_id).await?;

    if submission.status != SubmissionStatus::InProgress {
        return Err(QuizHubError::bad_request("Submission has already been submitted").into());
    }

    let quiz = load_quiz(&storage, submission.quiz_id).await?;
    let questions = storage.list_questions(quiz.id).await?;
    let answers = storage.list_answers(submission.id).await?;
    let outcome = grading::grade_submission(&questions, &answers);

    let notification = CreateNotificationRequest {
        user_id: user.id,
        notification_type: NotificationType::SubmissionReceived,
        title: format!("Submission received: {}", quiz.title),
        content: Some(format!(
            "Your answers to \"{}\" have been submitted.",
            quiz.title
        )),
        reference_type: Some("quiz_submission".to_string()),
        reference_id: Some(submission.id),
    };

    // 条件更新，并发提交只有一个成功
    let submission = storage
        .finalize_submission(submission.id, outcome, Some(notification))
        .await?
        .ok_or_else(|| QuizHubError::bad_request("Submission has already been submitted"))?;
    info!(
        "Submission {} submitted by {} and graded: {:?}/{:?}",
        submission.id, user.username, submission.score, submission.max_score
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SubmissionResponse { submission },
        "Submission submitted successfully",
    )))
}
