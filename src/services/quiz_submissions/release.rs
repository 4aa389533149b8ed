use std::collections::BTreeSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::QuizSubmissionService;
use crate::errors::QuizHubError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    notifications::{entities::NotificationType, requests::CreateNotificationRequest},
    quiz_submissions::{entities::SubmissionStatus, responses::ReleaseResultsResponse},
};
use crate::services::access::load_managed_quiz;

pub async fn release_results(
    service: &QuizSubmissionService,
    quiz_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    let storage = service.get_storage(request)?;
    let (quiz, _) = load_managed_quiz(&storage, &user, quiz_id).await?;

    let now = chrono::Utc::now();
    if !quiz.is_closed_at(now) {
        return Err(QuizHubError::conflict(
            "Results can only be released after the quiz has closed",
        )
        .into());
    }
    if quiz.results_released {
        return Err(QuizHubError::conflict("Results have already been released").into());
    }

    // 每个有已评分作答的学生通知一次
    let students: BTreeSet<i64> = storage
        .list_submissions_by_quiz(quiz.id)
        .await?
        .into_iter()
        .filter(|s| s.status == SubmissionStatus::Graded)
        .map(|s| s.student_id)
        .collect();

    let notifications = students
        .iter()
        .map(|student_id| CreateNotificationRequest {
            user_id: *student_id,
            notification_type: NotificationType::ResultsReleased,
            title: format!("Results released: {}", quiz.title),
            content: Some(format!("Results for \"{}\" are now available.", quiz.title)),
            reference_type: Some("quiz".to_string()),
            reference_id: Some(quiz.id),
        })
        .collect();

    let quiz = storage
        .release_quiz_results(quiz.id, now, notifications)
        .await?
        .ok_or_else(|| {
            QuizHubError::conflict(format!("Results of quiz {quiz_id} are already released"))
        })?;
    info!(
        "Results of quiz {} released by {}, {} students notified",
        quiz.id,
        user.username,
        students.len()
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ReleaseResultsResponse {
            quiz_id: quiz.id,
            released_at: quiz.results_released_at.unwrap_or(now),
            notified_students: students.len() as i64,
        },
        "Results released successfully",
    )))
}
