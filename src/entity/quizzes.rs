//! 测验实体

use sea_orm::entity::prelude::*;

use super::ts_to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quizzes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub created_by: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub available_from: Option<i64>,
    pub available_to: Option<i64>,
    pub shuffle_questions: bool,
    pub show_results_immediately: bool,
    pub allow_edit_after_submission: bool,
    pub status: String,
    pub results_released: bool,
    pub results_released_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(has_many = "super::questions::Entity")]
    Questions,
    #[sea_orm(has_many = "super::quiz_groups::Entity")]
    QuizGroups,
    #[sea_orm(has_many = "super::quiz_submissions::Entity")]
    Submissions,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Questions.def()
    }
}

impl Related<super::quiz_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuizGroups.def()
    }
}

impl Related<super::quiz_submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_quiz(self) -> crate::models::quizzes::entities::Quiz {
        use crate::models::quizzes::entities::{Quiz, QuizStatus};

        Quiz {
            id: self.id,
            course_id: self.course_id,
            created_by: self.created_by,
            title: self.title,
            description: self.description,
            available_from: self.available_from.map(ts_to_datetime),
            available_to: self.available_to.map(ts_to_datetime),
            shuffle_questions: self.shuffle_questions,
            show_results_immediately: self.show_results_immediately,
            allow_edit_after_submission: self.allow_edit_after_submission,
            status: self.status.parse::<QuizStatus>().unwrap_or(QuizStatus::Draft),
            results_released: self.results_released,
            results_released_at: self.results_released_at.map(ts_to_datetime),
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
