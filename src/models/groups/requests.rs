use serde::Deserialize;
use ts_rs::TS;

use crate::errors::{QuizHubError, Result};
use crate::utils::validate::Validate;

// 创建分组请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/group.ts")]
pub struct CreateGroupRequest {
    pub name: String,
}

impl Validate for CreateGroupRequest {
    fn validate(&self) -> Result<()> {
        let name = self.name.trim();
        if name.is_empty() || name.chars().count() > 64 {
            return Err(QuizHubError::validation(
                "Group name must be between 1 and 64 characters",
            ));
        }
        Ok(())
    }
}

// 添加分组成员请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/group.ts")]
pub struct AddGroupMemberRequest {
    pub user_id: i64,
}
