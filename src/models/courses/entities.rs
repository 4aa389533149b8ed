use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct Course {
    pub id: i64,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    /// 学年，如 `2025-2026`
    pub academic_year: String,
    pub instructor_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
