use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cache::CachedQuery;
use crate::errors::{QuizHubError, Result};
use crate::models::common::PaginationQuery;
use crate::utils::validate::Validate;

static ACADEMIC_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{4})$").expect("Invalid academic year regex"));

/// 学年格式校验：`YYYY-YYYY` 且后一年紧跟前一年
pub fn validate_academic_year(year: &str) -> std::result::Result<(), &'static str> {
    let caps = ACADEMIC_YEAR_RE
        .captures(year)
        .ok_or("Academic year must look like 2025-2026")?;
    let start: i32 = caps[1].parse().map_err(|_| "Invalid academic year")?;
    let end: i32 = caps[2].parse().map_err(|_| "Invalid academic year")?;
    if end != start + 1 {
        return Err("Academic year must span two consecutive years");
    }
    Ok(())
}

// 创建课程请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CreateCourseRequest {
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub academic_year: String,
    /// 仅管理员可指定，教师创建时固定为自己
    pub instructor_id: Option<i64>,
}

impl Validate for CreateCourseRequest {
    fn validate(&self) -> Result<()> {
        let code = self.code.trim();
        if code.is_empty() || code.len() > 32 {
            return Err(QuizHubError::validation(
                "Course code must be between 1 and 32 characters",
            ));
        }
        if self.title.trim().is_empty() {
            return Err(QuizHubError::validation("Course title must not be empty"));
        }
        validate_academic_year(&self.academic_year).map_err(QuizHubError::validation)?;
        Ok(())
    }
}

// 课程列表查询参数
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub academic_year: Option<String>,
}

impl CachedQuery for CourseListParams {
    const CACHE_KEY: &'static str = "courses";
}

/// 学年列表查询，没有参数
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AcademicYearsQuery {}

impl CachedQuery for AcademicYearsQuery {
    const CACHE_KEY: &'static str = "academic_years";
}
