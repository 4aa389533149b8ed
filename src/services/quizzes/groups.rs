use std::collections::BTreeSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::QuizService;
use crate::errors::QuizHubError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    quizzes::{
        entities::QuizStatus,
        requests::AssignGroupsRequest,
        responses::QuizDetail,
    },
};
use crate::services::access::{ensure_no_submissions, load_managed_quiz};

pub async fn assign_groups(
    service: &QuizService,
    quiz_id: i64,
    assign_data: AssignGroupsRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    let storage = service.get_storage(request)?;
    let (quiz, course) = load_managed_quiz(&storage, &user, quiz_id).await?;

    ensure_no_submissions(&storage, quiz.id).await?;

    let group_ids: Vec<i64> = assign_data
        .group_ids
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    // 已发布的测验至少分配给一个分组
    if quiz.status != QuizStatus::Draft && group_ids.is_empty() {
        return Err(QuizHubError::validation(
            "A published quiz must stay assigned to at least one group",
        )
        .into());
    }

    // 分组必须属于测验所在课程
    for group_id in &group_ids {
        let group = storage.get_group_by_id(*group_id).await?;
        if group.is_none_or(|g| g.course_id != course.id) {
            return Err(QuizHubError::validation(format!(
                "Group {group_id} does not belong to course {}",
                course.code
            ))
            .into());
        }
    }

    storage.assign_quiz_groups(quiz.id, &group_ids).await?;
    info!(
        "Quiz {} assigned to groups {:?} by {}",
        quiz.id, group_ids, user.username
    );

    let detail = QuizDetail {
        question_count: storage.count_questions(quiz.id).await?,
        group_ids,
        questions: None,
        quiz,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "Groups assigned successfully")))
}
