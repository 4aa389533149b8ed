use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::questions::requests::QuestionRequest;
use crate::models::quizzes::requests::{
    AssignGroupsRequest, CreateQuizRequest, QuizListParams, UpdateQuizRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::{QuestionService, QuizService};

// 懒加载的全局服务实例
static QUIZ_SERVICE: Lazy<QuizService> = Lazy::new(QuizService::new_lazy);
static QUESTION_SERVICE: Lazy<QuestionService> = Lazy::new(QuestionService::new_lazy);

pub async fn list_quizzes(
    req: HttpRequest,
    query: web::Query<QuizListParams>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.list_quizzes(query.into_inner(), &req).await
}

pub async fn create_quiz(
    req: HttpRequest,
    quiz_data: web::Json<CreateQuizRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.create_quiz(quiz_data.into_inner(), &req).await
}

pub async fn get_quiz(req: HttpRequest, quiz_id: web::Path<i64>) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.get_quiz(quiz_id.into_inner(), &req).await
}

pub async fn update_quiz(
    req: HttpRequest,
    quiz_id: web::Path<i64>,
    update_data: web::Json<UpdateQuizRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE
        .update_quiz(quiz_id.into_inner(), update_data.into_inner(), &req)
        .await
}

pub async fn delete_quiz(req: HttpRequest, quiz_id: web::Path<i64>) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.delete_quiz(quiz_id.into_inner(), &req).await
}

pub async fn publish_quiz(req: HttpRequest, quiz_id: web::Path<i64>) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.publish_quiz(quiz_id.into_inner(), &req).await
}

pub async fn archive_quiz(req: HttpRequest, quiz_id: web::Path<i64>) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.archive_quiz(quiz_id.into_inner(), &req).await
}

pub async fn assign_groups(
    req: HttpRequest,
    quiz_id: web::Path<i64>,
    assign_data: web::Json<AssignGroupsRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE
        .assign_groups(quiz_id.into_inner(), assign_data.into_inner(), &req)
        .await
}

pub async fn get_analytics(req: HttpRequest, quiz_id: web::Path<i64>) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.get_analytics(quiz_id.into_inner(), &req).await
}

pub async fn list_questions(
    req: HttpRequest,
    quiz_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE
        .list_questions(quiz_id.into_inner(), &req)
        .await
}

pub async fn add_question(
    req: HttpRequest,
    quiz_id: web::Path<i64>,
    question: web::Json<QuestionRequest>,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE
        .add_question(quiz_id.into_inner(), question.into_inner(), &req)
        .await
}

pub async fn update_question(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
    question: web::Json<QuestionRequest>,
) -> ActixResult<HttpResponse> {
    let (quiz_id, question_id) = path.into_inner();
    QUESTION_SERVICE
        .update_question(quiz_id, question_id, question.into_inner(), &req)
        .await
}

pub async fn delete_question(
    req: HttpRequest,
    path: web::Path<(i64, i64)>,
) -> ActixResult<HttpResponse> {
    let (quiz_id, question_id) = path.into_inner();
    QUESTION_SERVICE
        .delete_question(quiz_id, question_id, &req)
        .await
}

// 配置路由
pub fn configure_quiz_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/quizzes")
            .wrap(middlewares::RequireJWT)
            .service(
                // 学生只能看到分配给自己分组的已发布测验
                web::resource("").route(web::get().to(list_quizzes)).route(
                    web::post()
                        .to(create_quiz)
                        .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                ),
            )
            .service(
                web::resource("/{quiz_id}")
                    .route(web::get().to(get_quiz))
                    .route(
                        web::put()
                            .to(update_quiz)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_quiz)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .service(
                web::scope("/{quiz_id}")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route("/publish", web::post().to(publish_quiz))
                    .route("/archive", web::post().to(archive_quiz))
                    .route("/groups", web::put().to(assign_groups))
                    .route("/analytics", web::get().to(get_analytics))
                    .service(
                        web::resource("/questions")
                            .route(web::get().to(list_questions))
                            .route(web::post().to(add_question)),
                    )
                    .service(
                        web::resource("/questions/{question_id}")
                            .route(web::put().to(update_question))
                            .route(web::delete().to(delete_question)),
                    ),
            ),
    );
}
