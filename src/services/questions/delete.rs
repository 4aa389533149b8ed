use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{QuestionService, load_quiz_question};
use crate::errors::QuizHubError;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, quizzes::entities::QuizStatus};
use crate::services::access::{ensure_no_submissions, load_managed_quiz};

pub async fn delete_question(
    service: &QuestionService,
    quiz_id: i64,
    question_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    let storage = service.get_storage(request)?;
    let (quiz, _) = load_managed_quiz(&storage, &user, quiz_id).await?;
    let question = load_quiz_question(&storage, quiz.id, question_id).await?;
    ensure_no_submissions(&storage, quiz.id).await?;

    // 已发布的测验至少保留一道题
    if quiz.status != QuizStatus::Draft && storage.count_questions(quiz.id).await? <= 1 {
        return Err(QuizHubError::validation(
            "A published quiz must keep at least one question",
        )
        .into());
    }

    if !storage.delete_question(question.id).await? {
        return Err(QuizHubError::not_found(format!("Question {question_id} not found")).into());
    }
    info!("Question {} removed from quiz {}", question.id, quiz.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Question deleted successfully")))
}
