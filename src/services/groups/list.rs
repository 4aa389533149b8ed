use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GroupService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, groups::responses::GroupListResponse};
use crate::services::access::{ensure_course_staff, load_course};

pub async fn list_groups(
    service: &GroupService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    let storage = service.get_storage(request)?;

    let course = load_course(&storage, course_id).await?;
    ensure_course_staff(&user, &course)?;

    let items = storage.list_groups_by_course(course.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(GroupListResponse { items }, "查询成功")))
}
