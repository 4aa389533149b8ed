use serde::Serialize;
use ts_rs::TS;

use super::entities::{Group, GroupMember};

// 分组详情（含成员数）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/group.ts")]
pub struct GroupSummary {
    #[serde(flatten)]
    #[ts(flatten)]
    pub group: Group,
    pub member_count: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/group.ts")]
pub struct GroupListResponse {
    pub items: Vec<GroupSummary>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/group.ts")]
pub struct GroupResponse {
    pub group: Group,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/group.ts")]
pub struct GroupMemberResponse {
    pub member: GroupMember,
}
