use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::QuizService;
use crate::errors::QuizHubError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    quizzes::{entities::QuizStatus, responses::QuizDetail},
    users::entities::UserRole,
};
use crate::services::access::{ensure_course_staff, load_course, load_quiz};

pub async fn get_quiz(
    service: &QuizService,
    quiz_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    let storage = service.get_storage(request)?;
    let quiz = load_quiz(&storage, quiz_id).await?;

    // 学生只能看到已发布且分配给自己分组的测验，不含题目
    if user.role == UserRole::Student {
        if quiz.status != QuizStatus::Published {
            return Err(QuizHubError::not_found(format!("Quiz {quiz_id} not found")).into());
        }
        if !storage.is_student_assigned_to_quiz(quiz.id, user.id).await? {
            return Err(
                QuizHubError::authorization("Quiz is not assigned to any of your groups").into(),
            );
        }

        let detail = QuizDetail {
            question_count: storage.count_questions(quiz.id).await?,
            group_ids: Vec::new(),
            questions: None,
            quiz,
        };
        return Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "查询成功")));
    }

    let course = load_course(&storage, quiz.course_id).await?;
    ensure_course_staff(&user, &course)?;

    let questions = storage.list_questions(quiz.id).await?;
    let detail = QuizDetail {
        group_ids: storage.list_quiz_group_ids(quiz.id).await?,
        question_count: questions.len() as i64,
        questions: Some(questions),
        quiz,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "查询成功")))
}
