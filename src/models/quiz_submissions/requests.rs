use serde::Deserialize;
use ts_rs::TS;

use crate::errors::{QuizHubError, Result};
use crate::utils::validate::Validate;

// 开始作答请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz_submission.ts")]
pub struct StartSubmissionRequest {
    pub quiz_id: i64,
}

// 选择题作答请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz_submission.ts")]
pub struct MultipleChoiceAnswerRequest {
    pub submission_id: i64,
    pub question_id: i64,
    #[serde(default)]
    pub selected_option_ids: Vec<i64>,
}

impl MultipleChoiceAnswerRequest {
    /// 去重并排序后的选择集合
    pub fn normalized_selection(&self) -> Vec<i64> {
        let mut ids = self.selected_option_ids.clone();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

// 简答题作答请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz_submission.ts")]
pub struct ShortAnswerRequest {
    pub submission_id: i64,
    pub question_id: i64,
    pub text_answer: String,
}

impl Validate for ShortAnswerRequest {
    fn validate(&self) -> Result<()> {
        if self.text_answer.chars().count() > 10_000 {
            return Err(QuizHubError::validation(
                "Answer must not exceed 10000 characters",
            ));
        }
        Ok(())
    }
}

// 提交请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz_submission.ts")]
pub struct SubmitQuizRequest {
    pub submission_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_collapses_to_set() {
        let req = MultipleChoiceAnswerRequest {
            submission_id: 1,
            question_id: 1,
            selected_option_ids: vec![7, 3, 7, 5, 3],
        };
        assert_eq!(req.normalized_selection(), vec![3, 5, 7]);
    }
}
