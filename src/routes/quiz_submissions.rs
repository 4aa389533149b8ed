use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::quiz_submissions::requests::{
    MultipleChoiceAnswerRequest, ShortAnswerRequest, StartSubmissionRequest, SubmitQuizRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::QuizSubmissionService;

// 懒加载的全局 QuizSubmissionService 实例
static SUBMISSION_SERVICE: Lazy<QuizSubmissionService> =
    Lazy::new(QuizSubmissionService::new_lazy);

pub async fn start(
    req: HttpRequest,
    start_data: web::Json<StartSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.start(start_data.into_inner(), &req).await
}

pub async fn current(req: HttpRequest, quiz_id: web::Path<i64>) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.current(quiz_id.into_inner(), &req).await
}

pub async fn list_my(req: HttpRequest) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.list_my(&req).await
}

pub async fn answer_multiple_choice(
    req: HttpRequest,
    answer_data: web::Json<MultipleChoiceAnswerRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .answer_multiple_choice(answer_data.into_inner(), &req)
        .await
}

pub async fn answer_short_answer(
    req: HttpRequest,
    answer_data: web::Json<ShortAnswerRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .answer_short_answer(answer_data.into_inner(), &req)
        .await
}

pub async fn submit(
    req: HttpRequest,
    submit_data: web::Json<SubmitQuizRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.submit(submit_data.into_inner(), &req).await
}

pub async fn results(
    req: HttpRequest,
    submission_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .results(submission_id.into_inner(), &req)
        .await
}

pub async fn list_for_quiz(
    req: HttpRequest,
    quiz_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_for_quiz(quiz_id.into_inner(), &req)
        .await
}

pub async fn release_results(
    req: HttpRequest,
    quiz_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .release_results(quiz_id.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_quiz_submission_routes(cfg: &mut web::ServiceConfig) {
    let student_only = || middlewares::RequireRole::new_any(UserRole::student_roles());
    let staff_only = || middlewares::RequireRole::new_any(UserRole::staff_roles());

    cfg.service(
        web::scope("/api/quizsubmissions")
            .wrap(middlewares::RequireJWT)
            .route("/start", web::post().to(start).wrap(student_only()))
            .route(
                "/current/{quiz_id}",
                web::get().to(current).wrap(student_only()),
            )
            .route("/my", web::get().to(list_my).wrap(student_only()))
            .route(
                "/answer/multiple-choice",
                web::post().to(answer_multiple_choice).wrap(student_only()),
            )
            .route(
                "/answer/short-answer",
                web::post().to(answer_short_answer).wrap(student_only()),
            )
            .route("/submit", web::post().to(submit).wrap(student_only()))
            // 学生本人或课程教师，在服务层判断
            .route("/{submission_id}/results", web::get().to(results))
            .route(
                "/quiz/{quiz_id}",
                web::get().to(list_for_quiz).wrap(staff_only()),
            )
            .route(
                "/quiz/{quiz_id}/release-results",
                web::post().to(release_results).wrap(staff_only()),
            ),
    );
}
