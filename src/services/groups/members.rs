use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{GroupService, load_managed_group};
use crate::errors::QuizHubError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    groups::{requests::AddGroupMemberRequest, responses::GroupMemberResponse},
    users::entities::UserRole,
};

pub async fn add_member(
    service: &GroupService,
    group_id: i64,
    member: AddGroupMemberRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    let storage = service.get_storage(request)?;
    let (group, _) = load_managed_group(&storage, &user, group_id).await?;

    let student = storage
        .get_user_by_id(member.user_id)
        .await?
        .ok_or_else(|| QuizHubError::not_found(format!("User {} not found", member.user_id)))?;

    // 分组成员只能是学生
    if student.role != UserRole::Student {
        return Err(QuizHubError::validation("Only students can join a group").into());
    }

    let member = storage.add_group_member(group.id, student.id).await?;
    info!("User {} joined group {}", student.username, group.name);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        GroupMemberResponse { member },
        "Member added successfully",
    )))
}

pub async fn remove_member(
    service: &GroupService,
    group_id: i64,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    let storage = service.get_storage(request)?;
    let (group, _) = load_managed_group(&storage, &user, group_id).await?;

    if !storage.remove_group_member(group.id, user_id).await? {
        return Err(QuizHubError::not_found(format!(
            "User {user_id} is not a member of group {group_id}"
        ))
        .into());
    }
    info!("User {} removed from group {}", user_id, group.name);

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Member removed successfully")))
}
