use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::GroupService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    groups::{requests::CreateGroupRequest, responses::GroupResponse},
};
use crate::services::access::{ensure_course_staff, load_course};
use crate::utils::Validate;

pub async fn create_group(
    service: &GroupService,
    course_id: i64,
    group_data: CreateGroupRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    group_data.validate()?;

    let storage = service.get_storage(request)?;
    let course = load_course(&storage, course_id).await?;
    ensure_course_staff(&user, &course)?;

    let group = storage.create_group(&course, &group_data.name).await?;
    info!("Group {} created in course {}", group.name, course.code);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        GroupResponse { group },
        "Group created successfully",
    )))
}
