use serde::Serialize;
use ts_rs::TS;

use super::entities::Question;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct QuestionResponse {
    pub question: Question,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct QuestionListResponse {
    pub items: Vec<Question>,
}
