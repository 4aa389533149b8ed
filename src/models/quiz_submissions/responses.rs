use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use super::entities::{QuizAnswer, QuizSubmission};
use crate::models::questions::entities::{PublicQuestion, QuestionType};

// 开始作答响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz_submission.ts")]
pub struct StartSubmissionResponse {
    pub submission_id: i64,
    pub submission: QuizSubmission,
}

// 已记录的答案
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz_submission.ts")]
pub struct RecordedAnswer {
    pub selected_option_ids: Vec<i64>,
    pub text_answer: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<&QuizAnswer> for RecordedAnswer {
    fn from(answer: &QuizAnswer) -> Self {
        Self {
            selected_option_ids: answer.selected_option_ids.clone(),
            text_answer: answer.text_answer.clone(),
            updated_at: answer.updated_at,
        }
    }
}

// 作答中的题目（学生视图 + 已作答内容）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz_submission.ts")]
pub struct CurrentQuestion {
    pub question: PublicQuestion,
    pub answer: Option<RecordedAnswer>,
}

// 当前作答响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz_submission.ts")]
pub struct CurrentSubmissionResponse {
    pub submission: QuizSubmission,
    pub quiz_title: String,
    pub available_to: Option<DateTime<Utc>>,
    pub questions: Vec<CurrentQuestion>,
}

// 保存答案响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz_submission.ts")]
pub struct AnswerResponse {
    pub answer: QuizAnswer,
    /// 提交后修改答案触发了重新评分
    pub regraded: bool,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz_submission.ts")]
pub struct SubmissionResponse {
    pub submission: QuizSubmission,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz_submission.ts")]
pub struct SubmissionListResponse {
    pub items: Vec<QuizSubmission>,
}

// 单题成绩明细
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz_submission.ts")]
pub struct QuestionResult {
    pub question_id: i64,
    pub position: i32,
    pub text: String,
    pub question_type: QuestionType,
    pub points: f64,
    pub points_awarded: f64,
    pub is_correct: Option<bool>,
    pub selected_option_ids: Vec<i64>,
    pub correct_option_ids: Vec<i64>,
    pub text_answer: Option<String>,
    pub expected_answer: Option<String>,
}

// 成绩响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz_submission.ts")]
pub struct SubmissionResultsResponse {
    pub submission_id: i64,
    pub quiz_id: i64,
    pub student_id: i64,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub passed: bool,
    pub needs_review: bool,
    pub graded_at: Option<DateTime<Utc>>,
    pub questions: Vec<QuestionResult>,
}

// 发布成绩响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz_submission.ts")]
pub struct ReleaseResultsResponse {
    pub quiz_id: i64,
    pub released_at: DateTime<Utc>,
    pub notified_students: i64,
}
