use serde::Serialize;
use ts_rs::TS;

use super::entities::Quiz;
use crate::models::questions::entities::Question;

// 测验详情
//
// 教师可以看到完整题目（含正确答案），学生只看到测验元数据。
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct QuizDetail {
    pub quiz: Quiz,
    pub group_ids: Vec<i64>,
    pub question_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<Question>>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct QuizListResponse {
    pub items: Vec<Quiz>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct QuizResponse {
    pub quiz: Quiz,
}
