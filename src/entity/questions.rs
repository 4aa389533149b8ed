//! 题目实体

use sea_orm::entity::prelude::*;

use super::ts_to_datetime;
use crate::models::questions::entities::QuestionOption;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub quiz_id: i64,
    pub position: i32,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    #[sea_orm(column_type = "Double")]
    pub points: f64,
    pub question_type: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub expected_answer: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::quizzes::Entity",
        from = "Column::QuizId",
        to = "super::quizzes::Column::Id"
    )]
    Quiz,
    #[sea_orm(has_many = "super::question_options::Entity")]
    Options,
    #[sea_orm(has_many = "super::quiz_answers::Entity")]
    Answers,
}

impl Related<super::quizzes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quiz.def()
    }
}

impl Related<super::question_options::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Options.def()
    }
}

impl Related<super::quiz_answers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Answers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 选项需按 position 排好序传入
    pub fn into_question(
        self,
        options: Vec<QuestionOption>,
    ) -> crate::models::questions::entities::Question {
        use crate::models::questions::entities::{Question, QuestionType};

        Question {
            id: self.id,
            quiz_id: self.quiz_id,
            position: self.position,
            text: self.text,
            points: self.points,
            question_type: self
                .question_type
                .parse::<QuestionType>()
                .unwrap_or(QuestionType::ShortAnswer),
            expected_answer: self.expected_answer,
            options,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
