use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use crate::errors::QuizHubError;
use crate::models::users::entities::UserStatus;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse},
};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

use super::AuthService;

const INVALID_CREDENTIALS: &str = "Username or password is incorrect";

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 1. 根据用户名或邮箱获取用户信息
    let user = storage
        .get_user_by_username_or_email(login_request.username.trim())
        .await?
        .ok_or_else(|| QuizHubError::authentication(INVALID_CREDENTIALS))?;

    // 2. 验证密码
    if !verify_password(&login_request.password, &user.password_hash) {
        info!("Failed login attempt for {}", login_request.username);
        return Err(QuizHubError::authentication(INVALID_CREDENTIALS).into());
    }

    if user.status != UserStatus::Active {
        return Err(QuizHubError::authentication("User is not active").into());
    }

    // 3. 更新最后登录时间
    if let Err(e) = storage.update_last_login(user.id).await {
        warn!("Failed to update last login for user {}: {}", user.id, e);
    }

    // 4. 生成访问令牌
    match user.generate_access_token() {
        Ok(access_token) => {
            info!("User {} logged in successfully", user.username);

            let response = LoginResponse {
                access_token,
                expires_in: JwtUtils::access_token_ttl_secs(),
                user,
                created_at: chrono::Utc::now(),
            };

            Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Login successful")))
        }
        Err(e) => {
            tracing::error!("Failed to generate JWT token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to generate token",
                )),
            )
        }
    }
}
