use serde::Deserialize;
use ts_rs::TS;

use super::entities::QuestionType;
use crate::errors::{QuizHubError, Result};
use crate::utils::validate::Validate;

// 选项请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct OptionRequest {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

// 新增或更新题目请求
//
// 更新时整体替换题目内容与选项，位置保持不变。
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct QuestionRequest {
    pub text: String,
    pub points: f64,
    pub question_type: QuestionType,
    pub expected_answer: Option<String>,
    #[serde(default)]
    pub options: Vec<OptionRequest>,
}

impl Validate for QuestionRequest {
    fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(QuizHubError::validation("Question text must not be empty"));
        }
        if !self.points.is_finite() || self.points <= 0.0 {
            return Err(QuizHubError::validation("Points must be greater than 0"));
        }

        match self.question_type {
            QuestionType::MultipleChoice => {
                if self.options.is_empty() {
                    return Err(QuizHubError::validation(
                        "Multiple choice questions need at least one option",
                    ));
                }
                if self.options.iter().any(|o| o.text.trim().is_empty()) {
                    return Err(QuizHubError::validation("Option text must not be empty"));
                }
                if self.expected_answer.is_some() {
                    return Err(QuizHubError::validation(
                        "Multiple choice questions cannot have an expected answer",
                    ));
                }
            }
            QuestionType::ShortAnswer => {
                if !self.options.is_empty() {
                    return Err(QuizHubError::validation(
                        "Short answer questions cannot have options",
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mc(options: Vec<(&str, bool)>) -> QuestionRequest {
        QuestionRequest {
            text: "Pick one".to_string(),
            points: 2.0,
            question_type: QuestionType::MultipleChoice,
            expected_answer: None,
            options: options
                .into_iter()
                .map(|(text, is_correct)| OptionRequest {
                    text: text.to_string(),
                    is_correct,
                })
                .collect(),
        }
    }

    #[test]
    fn test_multiple_choice_needs_options() {
        assert!(mc(vec![("A", true), ("B", false)]).validate().is_ok());
        assert!(mc(vec![]).validate().is_err());
        assert!(mc(vec![("A", true), ("  ", false)]).validate().is_err());
    }

    #[test]
    fn test_zero_correct_options_are_allowed() {
        assert!(mc(vec![("A", false), ("B", false)]).validate().is_ok());
    }

    #[test]
    fn test_points_must_be_positive() {
        let mut req = mc(vec![("A", true)]);
        req.points = 0.0;
        assert!(req.validate().is_err());
        req.points = -1.0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_short_answer_rejects_options() {
        let req = QuestionRequest {
            text: "Capital of France?".to_string(),
            points: 1.0,
            question_type: QuestionType::ShortAnswer,
            expected_answer: Some("Paris".to_string()),
            options: vec![OptionRequest {
                text: "Paris".to_string(),
                is_correct: true,
            }],
        };
        assert!(req.validate().is_err());
    }
}
