//! 答案实体
//!
//! 选择题的选项集合以 JSON 数组形式存放在 `selected_option_ids` 中。

use sea_orm::entity::prelude::*;

use super::ts_to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quiz_answers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub submission_id: i64,
    pub question_id: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub selected_option_ids: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub text_answer: Option<String>,
    pub is_correct: Option<bool>,
    #[sea_orm(column_type = "Double", nullable)]
    pub points_awarded: Option<f64>,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::quiz_submissions::Entity",
        from = "Column::SubmissionId",
        to = "super::quiz_submissions::Column::Id"
    )]
    Submission,
    #[sea_orm(
        belongs_to = "super::questions::Entity",
        from = "Column::QuestionId",
        to = "super::questions::Column::Id"
    )]
    Question,
}

impl Related<super::quiz_submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl Related<super::questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_answer(self) -> crate::models::quiz_submissions::entities::QuizAnswer {
        crate::models::quiz_submissions::entities::QuizAnswer {
            id: self.id,
            submission_id: self.submission_id,
            question_id: self.question_id,
            selected_option_ids: self
                .selected_option_ids
                .as_deref()
                .and_then(|json| serde_json::from_str(json).ok())
                .unwrap_or_default(),
            text_answer: self.text_answer,
            is_correct: self.is_correct,
            points_awarded: self.points_awarded,
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
