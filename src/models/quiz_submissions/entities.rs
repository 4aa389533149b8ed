use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 作答状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/quiz_submission.ts")]
pub enum SubmissionStatus {
    InProgress, // 作答中
    Submitted,  // 已提交
    Graded,     // 已评分
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::InProgress => write!(f, "in_progress"),
            SubmissionStatus::Submitted => write!(f, "submitted"),
            SubmissionStatus::Graded => write!(f, "graded"),
        }
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(SubmissionStatus::InProgress),
            "submitted" => Ok(SubmissionStatus::Submitted),
            "graded" => Ok(SubmissionStatus::Graded),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

// 作答记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz_submission.ts")]
pub struct QuizSubmission {
    pub id: i64,
    pub quiz_id: i64,
    pub student_id: i64,
    pub status: SubmissionStatus,
    pub started_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub graded_at: Option<DateTime<Utc>>,
    pub score: Option<f64>,
    pub max_score: Option<f64>,
    pub percentage: Option<f64>,
    /// 存在无标准答案的简答题
    pub needs_review: bool,
}

// 单题答案
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz_submission.ts")]
pub struct QuizAnswer {
    pub id: i64,
    pub submission_id: i64,
    pub question_id: i64,
    pub selected_option_ids: Vec<i64>,
    pub text_answer: Option<String>,
    /// None 表示未评分
    pub is_correct: Option<bool>,
    pub points_awarded: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

// 单题评分结果
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerGrade {
    pub question_id: i64,
    pub is_correct: Option<bool>,
    pub points_awarded: f64,
}

// 整份作答的评分结果
#[derive(Debug, Clone, PartialEq)]
pub struct GradingOutcome {
    pub answers: Vec<AnswerGrade>,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub needs_review: bool,
}
