use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

use crate::errors::{QuizHubError, Result};
use crate::utils::validate::Validate;

/// 开放时间窗口校验：两端都给出时必须 from < to
pub fn validate_window(
    available_from: Option<DateTime<Utc>>,
    available_to: Option<DateTime<Utc>>,
) -> Result<()> {
    if let (Some(from), Some(to)) = (available_from, available_to)
        && from >= to
    {
        return Err(QuizHubError::validation(
            "available_from must be earlier than available_to",
        ));
    }
    Ok(())
}

fn validate_title(title: &str) -> Result<()> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > 200 {
        return Err(QuizHubError::validation(
            "Quiz title must be between 1 and 200 characters",
        ));
    }
    Ok(())
}

// 创建测验请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct CreateQuizRequest {
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub available_from: Option<DateTime<Utc>>,
    pub available_to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub shuffle_questions: bool,
    #[serde(default)]
    pub show_results_immediately: bool,
    #[serde(default)]
    pub allow_edit_after_submission: bool,
}

impl Validate for CreateQuizRequest {
    fn validate(&self) -> Result<()> {
        validate_title(&self.title)?;
        validate_window(self.available_from, self.available_to)
    }
}

// 更新测验请求，未给出的字段保持不变
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct UpdateQuizRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    /// 外层 None 表示不修改，Some(None) 表示清除
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[ts(type = "string | null")]
    #[allow(clippy::option_option)]
    pub available_from: Option<Option<DateTime<Utc>>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[ts(type = "string | null")]
    #[allow(clippy::option_option)]
    pub available_to: Option<Option<DateTime<Utc>>>,
    pub shuffle_questions: Option<bool>,
    pub show_results_immediately: Option<bool>,
    pub allow_edit_after_submission: Option<bool>,
}

impl Validate for UpdateQuizRequest {
    fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        validate_window(self.available_from.flatten(), self.available_to.flatten())
    }
}

// 测验列表查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct QuizListParams {
    pub course_id: Option<i64>,
}

/// 测验列表查询条件（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct QuizListQuery {
    pub course_id: Option<i64>,
    /// 仅限该教师任课的课程
    pub instructor_id: Option<i64>,
    /// 仅限分配给这些分组的测验
    pub group_ids: Option<Vec<i64>>,
    pub status: Option<super::entities::QuizStatus>,
}

// 分配分组请求（整体替换）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct AssignGroupsRequest {
    pub group_ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn create_request(title: &str) -> CreateQuizRequest {
        CreateQuizRequest {
            course_id: 1,
            title: title.to_string(),
            description: None,
            available_from: None,
            available_to: None,
            shuffle_questions: false,
            show_results_immediately: false,
            allow_edit_after_submission: false,
        }
    }

    #[test]
    fn test_title_is_required() {
        assert!(create_request("Midterm").validate().is_ok());
        assert!(create_request("   ").validate().is_err());
    }

    #[test]
    fn test_window_must_be_ordered() {
        let now = Utc::now();
        let mut req = create_request("Midterm");
        req.available_from = Some(now);
        req.available_to = Some(now);
        assert!(req.validate().is_err());

        req.available_to = Some(now + Duration::days(1));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_flags_default_to_false() {
        let req: CreateQuizRequest =
            serde_json::from_str(r#"{"course_id": 3, "title": "Quiz"}"#).unwrap();
        assert!(!req.shuffle_questions);
        assert!(!req.show_results_immediately);
        assert!(!req.allow_edit_after_submission);
    }

    #[test]
    fn test_update_window_distinguishes_missing_and_null() {
        let req: UpdateQuizRequest = serde_json::from_str(r#"{"title": "Quiz"}"#).unwrap();
        assert_eq!(req.available_from, None);
        assert_eq!(req.available_to, None);

        let req: UpdateQuizRequest = serde_json::from_str(
            r#"{"available_from": null, "available_to": "2026-03-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(req.available_from, Some(None));
        assert_eq!(
            req.available_to,
            Some(Some("2026-03-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap()))
        );
        assert!(req.validate().is_ok());
    }
}
