use super::entities::UserRole;
use crate::errors::{QuizHubError, Result};
use crate::utils::validate::{Validate, validate_email, validate_password_simple, validate_username};
use serde::Deserialize;
use ts_rs::TS;

// 用户创建请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    /// 创建时为明文密码，写入存储前替换为哈希
    pub password: String,
    pub role: UserRole,
    pub display_name: Option<String>,
}

impl Validate for CreateUserRequest {
    fn validate(&self) -> Result<()> {
        validate_username(&self.username).map_err(QuizHubError::validation)?;
        validate_email(&self.email).map_err(QuizHubError::validation)?;
        validate_password_simple(&self.password).map_err(QuizHubError::validation)?;
        Ok(())
    }
}
