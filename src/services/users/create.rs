use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::errors::QuizHubError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    users::{entities::UserRole, requests::CreateUserRequest, responses::UserResponse},
};
use crate::utils::Validate;
use crate::utils::password::hash_password;

pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let operator = RequireJWT::current_user(request)?;

    user_data.username = user_data.username.trim().to_string();
    user_data.email = user_data.email.trim().to_lowercase();
    user_data.validate()?;

    // 只有超级管理员可以创建管理员账号
    if user_data.role.is_admin() && operator.role != UserRole::SuperAdmin {
        return Err(QuizHubError::authorization(
            "Only a super administrator may create administrator accounts",
        )
        .into());
    }

    let storage = service.get_storage(request)?;

    if storage
        .get_user_by_username(&user_data.username)
        .await?
        .is_some()
    {
        return Err(QuizHubError::conflict("Username already exists").into());
    }
    if storage.get_user_by_email(&user_data.email).await?.is_some() {
        return Err(QuizHubError::conflict("Email already exists").into());
    }

    user_data.password = hash_password(&user_data.password)?;

    let user = storage.create_user(user_data).await?;
    info!(
        "User {} ({}) created by {}",
        user.username, user.role, operator.username
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(UserResponse { user }, "用户创建成功")))
}
