//! 课程分组实体

use sea_orm::entity::prelude::*;

use super::ts_to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "course_groups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub name: String,
    pub academic_year: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(has_many = "super::group_members::Entity")]
    Members,
    #[sea_orm(has_many = "super::quiz_groups::Entity")]
    QuizGroups,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::group_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl Related<super::quiz_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuizGroups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_group(self) -> crate::models::groups::entities::Group {
        crate::models::groups::entities::Group {
            id: self.id,
            course_id: self.course_id,
            name: self.name,
            academic_year: self.academic_year,
            created_at: ts_to_datetime(self.created_at),
        }
    }
}
