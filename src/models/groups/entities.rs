use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程分组
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/group.ts")]
pub struct Group {
    pub id: i64,
    pub course_id: i64,
    pub name: String,
    /// 与所属课程一致
    pub academic_year: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 分组成员
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/group.ts")]
pub struct GroupMember {
    pub id: i64,
    pub group_id: i64,
    pub user_id: i64,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}
