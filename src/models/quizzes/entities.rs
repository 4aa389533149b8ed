use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 测验状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub enum QuizStatus {
    Draft,     // 草稿
    Published, // 已发布
    Archived,  // 已归档（关闭）
}

impl std::fmt::Display for QuizStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuizStatus::Draft => write!(f, "draft"),
            QuizStatus::Published => write!(f, "published"),
            QuizStatus::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for QuizStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(QuizStatus::Draft),
            "published" => Ok(QuizStatus::Published),
            "archived" => Ok(QuizStatus::Archived),
            _ => Err(format!("Invalid quiz status: {s}")),
        }
    }
}

// 测验实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct Quiz {
    pub id: i64,
    pub course_id: i64,
    pub created_by: i64,
    pub title: String,
    pub description: Option<String>,
    pub available_from: Option<DateTime<Utc>>,
    pub available_to: Option<DateTime<Utc>>,
    pub shuffle_questions: bool,
    pub show_results_immediately: bool,
    pub allow_edit_after_submission: bool,
    pub status: QuizStatus,
    pub results_released: bool,
    pub results_released_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quiz {
    /// 已发布且处于开放时间窗口内（窗口两端均为闭区间）
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.status == QuizStatus::Published
            && self.available_from.is_none_or(|from| from <= now)
            && self.available_to.is_none_or(|to| now <= to)
    }

    /// 已归档，或已过截止时间
    pub fn is_closed_at(&self, now: DateTime<Utc>) -> bool {
        self.status == QuizStatus::Archived || self.available_to.is_some_and(|to| now > to)
    }

    /// 提交者本人能否查看成绩
    pub fn results_visible_to_student(&self) -> bool {
        self.show_results_immediately || self.results_released
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Duration;

    pub(crate) fn sample_quiz(status: QuizStatus) -> Quiz {
        let now = Utc::now();
        Quiz {
            id: 1,
            course_id: 1,
            created_by: 1,
            title: "Week 1".to_string(),
            description: None,
            available_from: None,
            available_to: None,
            shuffle_questions: false,
            show_results_immediately: false,
            allow_edit_after_submission: false,
            status,
            results_released: false,
            results_released_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_only_published_quizzes_are_open() {
        let now = Utc::now();
        assert!(sample_quiz(QuizStatus::Published).is_open_at(now));
        assert!(!sample_quiz(QuizStatus::Draft).is_open_at(now));
        assert!(!sample_quiz(QuizStatus::Archived).is_open_at(now));
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let now = Utc::now();
        let mut quiz = sample_quiz(QuizStatus::Published);
        quiz.available_from = Some(now);
        quiz.available_to = Some(now + Duration::hours(1));

        assert!(quiz.is_open_at(now));
        assert!(quiz.is_open_at(now + Duration::hours(1)));
        assert!(!quiz.is_open_at(now - Duration::seconds(1)));
        assert!(!quiz.is_open_at(now + Duration::hours(1) + Duration::seconds(1)));
    }

    #[test]
    fn test_closed_after_deadline_or_when_archived() {
        let now = Utc::now();
        let mut quiz = sample_quiz(QuizStatus::Published);
        assert!(!quiz.is_closed_at(now));

        quiz.available_to = Some(now - Duration::minutes(1));
        assert!(quiz.is_closed_at(now));

        let archived = sample_quiz(QuizStatus::Archived);
        assert!(archived.is_closed_at(now));
    }

    #[test]
    fn test_results_visibility() {
        let mut quiz = sample_quiz(QuizStatus::Published);
        assert!(!quiz.results_visible_to_student());
        quiz.results_released = true;
        assert!(quiz.results_visible_to_student());

        let mut immediate = sample_quiz(QuizStatus::Published);
        immediate.show_results_immediately = true;
        assert!(immediate.results_visible_to_student());
    }
}
