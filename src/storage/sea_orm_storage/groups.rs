//! 分组与成员存储操作

use super::SeaOrmStorage;
use crate::entity::course_groups::{
    ActiveModel as GroupActiveModel, Column as GroupColumn, Entity as CourseGroups,
};
use crate::entity::group_members::{
    ActiveModel as MemberActiveModel, Column as MemberColumn, Entity as GroupMembers,
};
use crate::errors::{QuizHubError, Result};
use crate::models::{
    courses::entities::Course,
    groups::{
        entities::{Group, GroupMember},
        responses::GroupSummary,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 在课程下创建分组，学年继承课程
    pub async fn create_group_impl(&self, course: &Course, name: &str) -> Result<Group> {
        let model = GroupActiveModel {
            course_id: Set(course.id),
            name: Set(name.trim().to_string()),
            academic_year: Set(course.academic_year.clone()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("创建分组失败: {e}")))?;

        Ok(result.into_group())
    }

    pub async fn get_group_by_id_impl(&self, group_id: i64) -> Result<Option<Group>> {
        let result = CourseGroups::find_by_id(group_id)
            .one(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询分组失败: {e}")))?;

        Ok(result.map(|m| m.into_group()))
    }

    /// 列出课程的分组及成员数
    pub async fn list_groups_by_course_impl(&self, course_id: i64) -> Result<Vec<GroupSummary>> {
        let groups = CourseGroups::find()
            .filter(GroupColumn::CourseId.eq(course_id))
            .order_by_asc(GroupColumn::Name)
            .all(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询分组列表失败: {e}")))?;

        let mut items = Vec::with_capacity(groups.len());
        for group in groups {
            let member_count = GroupMembers::find()
                .filter(MemberColumn::GroupId.eq(group.id))
                .count(&self.db)
                .await
                .map_err(|e| {
                    QuizHubError::database_operation(format!("统计分组成员失败: {e}"))
                })?;

            items.push(GroupSummary {
                group: group.into_group(),
                member_count: member_count as i64,
            });
        }

        Ok(items)
    }

    /// 添加成员，重复添加返回 Conflict
    pub async fn add_group_member_impl(&self, group_id: i64, user_id: i64) -> Result<GroupMember> {
        if self.get_group_member_impl(group_id, user_id).await?.is_some() {
            return Err(QuizHubError::conflict(format!(
                "User {user_id} is already a member of group {group_id}"
            )));
        }

        let model = MemberActiveModel {
            group_id: Set(group_id),
            user_id: Set(user_id),
            joined_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("添加分组成员失败: {e}")))?;

        Ok(result.into_group_member())
    }

    pub async fn get_group_member_impl(
        &self,
        group_id: i64,
        user_id: i64,
    ) -> Result<Option<GroupMember>> {
        let result = GroupMembers::find()
            .filter(MemberColumn::GroupId.eq(group_id))
            .filter(MemberColumn::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询分组成员失败: {e}")))?;

        Ok(result.map(|m| m.into_group_member()))
    }

    pub async fn remove_group_member_impl(&self, group_id: i64, user_id: i64) -> Result<bool> {
        let result = GroupMembers::delete_many()
            .filter(MemberColumn::GroupId.eq(group_id))
            .filter(MemberColumn::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("移除分组成员失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 用户加入的所有分组 ID
    pub async fn list_user_group_ids_impl(&self, user_id: i64) -> Result<Vec<i64>> {
        let ids: Vec<i64> = GroupMembers::find()
            .select_only()
            .column(MemberColumn::GroupId)
            .filter(MemberColumn::UserId.eq(user_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询用户分组失败: {e}")))?;

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support;
    use crate::errors::QuizHubError;
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_group_membership_lifecycle() {
        let storage = test_support::storage().await;
        let teacher = test_support::user(&storage, "teacher01", UserRole::Instructor).await;
        let student = test_support::user(&storage, "student01", UserRole::Student).await;
        let course = test_support::course(&storage, "CS101", teacher.id).await;

        let group = storage.create_group_impl(&course, " Lab A ").await.unwrap();
        assert_eq!(group.name, "Lab A");
        assert_eq!(group.academic_year, course.academic_year);

        storage.add_group_member_impl(group.id, student.id).await.unwrap();
        let dup = storage.add_group_member_impl(group.id, student.id).await;
        assert!(matches!(dup, Err(QuizHubError::Conflict(_))));

        let summaries = storage.list_groups_by_course_impl(course.id).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].member_count, 1);

        assert_eq!(
            storage.list_user_group_ids_impl(student.id).await.unwrap(),
            vec![group.id]
        );

        assert!(storage.remove_group_member_impl(group.id, student.id).await.unwrap());
        assert!(!storage.remove_group_member_impl(group.id, student.id).await.unwrap());
        assert!(storage.list_user_group_ids_impl(student.id).await.unwrap().is_empty());
    }
}
