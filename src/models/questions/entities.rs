use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 题目类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub enum QuestionType {
    MultipleChoice, // 选择题（可多选）
    ShortAnswer,    // 简答题
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestionType::MultipleChoice => write!(f, "multiple_choice"),
            QuestionType::ShortAnswer => write!(f, "short_answer"),
        }
    }
}

impl std::str::FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multiple_choice" => Ok(QuestionType::MultipleChoice),
            "short_answer" => Ok(QuestionType::ShortAnswer),
            _ => Err(format!("Invalid question type: {s}")),
        }
    }
}

// 选项
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct QuestionOption {
    pub id: i64,
    pub question_id: i64,
    pub position: i32,
    pub text: String,
    pub is_correct: bool,
}

// 题目（含正确答案，仅对教师可见）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct Question {
    pub id: i64,
    pub quiz_id: i64,
    /// 从 1 开始连续编号
    pub position: i32,
    pub text: String,
    pub points: f64,
    pub question_type: QuestionType,
    pub expected_answer: Option<String>,
    pub options: Vec<QuestionOption>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Question {
    /// 正确选项 ID 集合
    pub fn correct_option_ids(&self) -> Vec<i64> {
        self.options
            .iter()
            .filter(|o| o.is_correct)
            .map(|o| o.id)
            .collect()
    }

    /// 去掉正确答案后的学生视图
    pub fn to_public(&self) -> PublicQuestion {
        PublicQuestion {
            id: self.id,
            position: self.position,
            text: self.text.clone(),
            points: self.points,
            question_type: self.question_type,
            options: self
                .options
                .iter()
                .map(|o| PublicOption {
                    id: o.id,
                    position: o.position,
                    text: o.text.clone(),
                })
                .collect(),
        }
    }
}

// 学生可见的选项
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct PublicOption {
    pub id: i64,
    pub position: i32,
    pub text: String,
}

// 学生可见的题目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct PublicQuestion {
    pub id: i64,
    pub position: i32,
    pub text: String,
    pub points: f64,
    pub question_type: QuestionType,
    pub options: Vec<PublicOption>,
}
