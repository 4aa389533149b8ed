use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 通知类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub enum NotificationType {
    SubmissionReceived, // 作答已提交
    ResultsReleased,    // 成绩已发布
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::SubmissionReceived => write!(f, "submission_received"),
            NotificationType::ResultsReleased => write!(f, "results_released"),
        }
    }
}

impl std::str::FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submission_received" => Ok(NotificationType::SubmissionReceived),
            "results_released" => Ok(NotificationType::ResultsReleased),
            _ => Err(format!("Invalid notification type: {s}")),
        }
    }
}

// 通知实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub notification_type: NotificationType,
    pub title: String,
    pub content: Option<String>,
    /// 关联对象类型，如 `quiz_submission` / `quiz`
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
