use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::Course;
use crate::models::common::PaginationInfo;

// 课程响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseResponse {
    pub course: Course,
}

// 课程列表响应（会写入查询缓存，因此需要可反序列化）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseListResponse {
    pub items: Vec<Course>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct AcademicYearListResponse {
    pub items: Vec<String>,
}
