use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::QuizSubmissionService;
use crate::errors::QuizHubError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    quiz_submissions::responses::{CurrentQuestion, CurrentSubmissionResponse, RecordedAnswer},
};
use crate::services::access::{ensure_student, load_quiz};
use crate::utils::random_code::seeded_shuffle;

pub async fn get_current_submission(
    service: &QuizSubmissionService,
    quiz_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    ensure_student(&user)?;

    let storage = service.get_storage(request)?;
    let submission = storage
        .find_in_progress_submission(quiz_id, user.id)
        .await?
        .ok_or_else(|| QuizHubError::not_found("No submission in progress for this quiz"))?;
    let quiz = load_quiz(&storage, quiz_id).await?;

    let mut questions = storage.list_questions(quiz.id).await?;
    // 以作答 ID 为种子，继续作答时顺序不变
    if quiz.shuffle_questions {
        seeded_shuffle(&mut questions, submission.id as u64);
    }

    let answers: HashMap<i64, RecordedAnswer> = storage
        .list_answers(submission.id)
        .await?
        .iter()
        .map(|a| (a.question_id, RecordedAnswer::from(a)))
        .collect();

    let questions = questions
        .iter()
        .map(|q| CurrentQuestion {
            question: q.to_public(),
            answer: answers.get(&q.id).cloned(),
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CurrentSubmissionResponse {
            submission,
            quiz_title: quiz.title,
            available_to: quiz.available_to,
            questions,
        },
        "查询成功",
    )))
}
