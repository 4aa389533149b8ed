//! 作答记录实体

use sea_orm::entity::prelude::*;

use super::ts_to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quiz_submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub quiz_id: i64,
    pub student_id: i64,
    pub status: String,
    pub started_at: i64,
    pub submitted_at: Option<i64>,
    pub graded_at: Option<i64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub score: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub max_score: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub percentage: Option<f64>,
    pub needs_review: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::quizzes::Entity",
        from = "Column::QuizId",
        to = "super::quizzes::Column::Id"
    )]
    Quiz,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id"
    )]
    Student,
    #[sea_orm(has_many = "super::quiz_answers::Entity")]
    Answers,
}

impl Related<super::quizzes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quiz.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::quiz_answers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Answers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_submission(self) -> crate::models::quiz_submissions::entities::QuizSubmission {
        use crate::models::quiz_submissions::entities::{QuizSubmission, SubmissionStatus};

        QuizSubmission {
            id: self.id,
            quiz_id: self.quiz_id,
            student_id: self.student_id,
            status: self
                .status
                .parse::<SubmissionStatus>()
                .unwrap_or(SubmissionStatus::InProgress),
            started_at: ts_to_datetime(self.started_at),
            submitted_at: self.submitted_at.map(ts_to_datetime),
            graded_at: self.graded_at.map(ts_to_datetime),
            score: self.score,
            max_score: self.max_score,
            percentage: self.percentage,
            needs_review: self.needs_review,
        }
    }
}
