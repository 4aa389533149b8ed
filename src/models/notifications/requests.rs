use serde::Deserialize;
use ts_rs::TS;

use super::entities::NotificationType;
use crate::models::common::{PaginationQuery, pagination::deserialize_optional_bool};

/// 创建通知（服务内部使用）
#[derive(Debug, Clone)]
pub struct CreateNotificationRequest {
    pub user_id: i64,
    pub notification_type: NotificationType,
    pub title: String,
    pub content: Option<String>,
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
}

// 通知列表查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct NotificationListQuery {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub unread_only: Option<bool>,
}
