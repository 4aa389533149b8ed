use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::QuizService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    quizzes::{
        entities::QuizStatus,
        requests::{QuizListParams, QuizListQuery},
        responses::QuizListResponse,
    },
    users::entities::UserRole,
};

pub async fn list_quizzes(
    service: &QuizService,
    params: QuizListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    let storage = service.get_storage(request)?;

    let mut query = QuizListQuery {
        course_id: params.course_id,
        ..Default::default()
    };

    match user.role {
        UserRole::Student => {
            query.group_ids = Some(storage.list_user_group_ids(user.id).await?);
            query.status = Some(QuizStatus::Published);
        }
        UserRole::Instructor => {
            query.instructor_id = Some(user.id);
        }
        UserRole::Admin | UserRole::SuperAdmin => {}
    }

    let items = storage.list_quizzes(query).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(QuizListResponse { items }, "查询成功")))
}
