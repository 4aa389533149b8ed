//! 测验存储操作

use super::SeaOrmStorage;
use super::notifications::notification_active_model;
use crate::entity::courses::Column as CourseColumn;
use crate::entity::group_members::{Column as MemberColumn, Entity as GroupMembers};
use crate::entity::question_options::{Column as OptionColumn, Entity as QuestionOptions};
use crate::entity::questions::{Column as QuestionColumn, Entity as Questions};
use crate::entity::quiz_groups::{
    ActiveModel as QuizGroupActiveModel, Column as QuizGroupColumn, Entity as QuizGroups,
};
use crate::entity::quizzes::{self, ActiveModel, Column, Entity as Quizzes};
use crate::errors::{QuizHubError, Result};
use crate::models::notifications::requests::CreateNotificationRequest;
use crate::models::quizzes::{
    entities::{Quiz, QuizStatus},
    requests::{CreateQuizRequest, QuizListQuery, UpdateQuizRequest},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建测验（草稿状态）
    pub async fn create_quiz_impl(&self, req: CreateQuizRequest, created_by: i64) -> Result<Quiz> {
        let now = Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(req.course_id),
            created_by: Set(created_by),
            title: Set(req.title.trim().to_string()),
            description: Set(req.description),
            available_from: Set(req.available_from.map(|t| t.timestamp())),
            available_to: Set(req.available_to.map(|t| t.timestamp())),
            shuffle_questions: Set(req.shuffle_questions),
            show_results_immediately: Set(req.show_results_immediately),
            allow_edit_after_submission: Set(req.allow_edit_after_submission),
            status: Set(QuizStatus::Draft.to_string()),
            results_released: Set(false),
            results_released_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("创建测验失败: {e}")))?;

        Ok(result.into_quiz())
    }

    pub async fn get_quiz_by_id_impl(&self, quiz_id: i64) -> Result<Option<Quiz>> {
        let result = Quizzes::find_by_id(quiz_id)
            .one(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询测验失败: {e}")))?;

        Ok(result.map(|m| m.into_quiz()))
    }

    /// 更新测验元数据，未给出的字段保持不变
    pub async fn update_quiz_impl(
        &self,
        quiz_id: i64,
        update: UpdateQuizRequest,
    ) -> Result<Option<Quiz>> {
        let existing = Quizzes::find_by_id(quiz_id)
            .one(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询测验失败: {e}")))?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();

        if let Some(title) = update.title {
            model.title = Set(title.trim().to_string());
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(from) = update.available_from {
            model.available_from = Set(from.map(|t| t.timestamp()));
        }
        if let Some(to) = update.available_to {
            model.available_to = Set(to.map(|t| t.timestamp()));
        }
        if let Some(shuffle) = update.shuffle_questions {
            model.shuffle_questions = Set(shuffle);
        }
        if let Some(show) = update.show_results_immediately {
            model.show_results_immediately = Set(show);
        }
        if let Some(allow) = update.allow_edit_after_submission {
            model.allow_edit_after_submission = Set(allow);
        }
        model.updated_at = Set(Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("更新测验失败: {e}")))?;

        Ok(Some(result.into_quiz()))
    }

    /// 删除测验及其题目、选项、分组关联
    pub async fn delete_quiz_impl(&self, quiz_id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| QuizHubError::database_operation(format!("开启事务失败: {e}")))?;

        let question_ids: Vec<i64> = Questions::find()
            .select_only()
            .column(QuestionColumn::Id)
            .filter(QuestionColumn::QuizId.eq(quiz_id))
            .into_tuple()
            .all(&txn)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询题目失败: {e}")))?;

        if !question_ids.is_empty() {
            QuestionOptions::delete_many()
                .filter(OptionColumn::QuestionId.is_in(question_ids))
                .exec(&txn)
                .await
                .map_err(|e| QuizHubError::database_operation(format!("删除选项失败: {e}")))?;
        }

        Questions::delete_many()
            .filter(QuestionColumn::QuizId.eq(quiz_id))
            .exec(&txn)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("删除题目失败: {e}")))?;

        QuizGroups::delete_many()
            .filter(QuizGroupColumn::QuizId.eq(quiz_id))
            .exec(&txn)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("删除分组关联失败: {e}")))?;

        let result = Quizzes::delete_by_id(quiz_id)
            .exec(&txn)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("删除测验失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| QuizHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 按课程、任课教师、分组、状态筛选测验
    pub async fn list_quizzes_impl(&self, query: QuizListQuery) -> Result<Vec<Quiz>> {
        let mut select = Quizzes::find();

        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }

        if let Some(instructor_id) = query.instructor_id {
            select = select
                .join(JoinType::InnerJoin, quizzes::Relation::Course.def())
                .filter(CourseColumn::InstructorId.eq(instructor_id));
        }

        if let Some(group_ids) = query.group_ids {
            if group_ids.is_empty() {
                return Ok(Vec::new());
            }

            let quiz_ids: Vec<i64> = QuizGroups::find()
                .select_only()
                .column(QuizGroupColumn::QuizId)
                .filter(QuizGroupColumn::GroupId.is_in(group_ids))
                .distinct()
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(|e| QuizHubError::database_operation(format!("查询分组测验失败: {e}")))?;

            if quiz_ids.is_empty() {
                return Ok(Vec::new());
            }
            select = select.filter(Column::Id.is_in(quiz_ids));
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let quizzes = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询测验列表失败: {e}")))?;

        Ok(quizzes.into_iter().map(|m| m.into_quiz()).collect())
    }

    pub async fn set_quiz_status_impl(
        &self,
        quiz_id: i64,
        status: QuizStatus,
    ) -> Result<Option<Quiz>> {
        let existing = Quizzes::find_by_id(quiz_id)
            .one(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询测验失败: {e}")))?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.status = Set(status.to_string());
        model.updated_at = Set(Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("更新测验状态失败: {e}")))?;

        Ok(Some(result.into_quiz()))
    }

    /// 整体替换测验分配的分组
    pub async fn assign_quiz_groups_impl(&self, quiz_id: i64, group_ids: &[i64]) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| QuizHubError::database_operation(format!("开启事务失败: {e}")))?;

        QuizGroups::delete_many()
            .filter(QuizGroupColumn::QuizId.eq(quiz_id))
            .exec(&txn)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("清除分组关联失败: {e}")))?;

        let mut unique = group_ids.to_vec();
        unique.sort_unstable();
        unique.dedup();

        for group_id in unique {
            QuizGroupActiveModel {
                quiz_id: Set(quiz_id),
                group_id: Set(group_id),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("写入分组关联失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| QuizHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(())
    }

    pub async fn list_quiz_group_ids_impl(&self, quiz_id: i64) -> Result<Vec<i64>> {
        let ids: Vec<i64> = QuizGroups::find()
            .select_only()
            .column(QuizGroupColumn::GroupId)
            .filter(QuizGroupColumn::QuizId.eq(quiz_id))
            .order_by_asc(QuizGroupColumn::GroupId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询测验分组失败: {e}")))?;

        Ok(ids)
    }

    /// 学生是否属于测验分配的任一分组
    pub async fn is_student_assigned_to_quiz_impl(&self, quiz_id: i64, user_id: i64) -> Result<bool> {
        let group_ids = self.list_quiz_group_ids_impl(quiz_id).await?;
        if group_ids.is_empty() {
            return Ok(false);
        }

        let count = GroupMembers::find()
            .filter(MemberColumn::UserId.eq(user_id))
            .filter(MemberColumn::GroupId.is_in(group_ids))
            .count(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询分组成员失败: {e}")))?;

        Ok(count > 0)
    }

    /// 标记成绩已发布并写入通知（同一事务）
    ///
    /// 条件更新，测验不存在或成绩已发布时返回 None，并发发布只有一个会写通知。
    pub async fn release_quiz_results_impl(
        &self,
        quiz_id: i64,
        released_at: DateTime<Utc>,
        notifications: Vec<CreateNotificationRequest>,
    ) -> Result<Option<Quiz>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| QuizHubError::database_operation(format!("开启事务失败: {e}")))?;

        let result = Quizzes::update_many()
            .col_expr(Column::ResultsReleased, Expr::value(true))
            .col_expr(Column::ResultsReleasedAt, Expr::value(released_at.timestamp()))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now().timestamp()))
            .filter(Column::Id.eq(quiz_id))
            .filter(Column::ResultsReleased.eq(false))
            .exec(&txn)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("发布成绩失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        for req in notifications {
            notification_active_model(req)
                .insert(&txn)
                .await
                .map_err(|e| QuizHubError::database_operation(format!("创建通知失败: {e}")))?;
        }

        let quiz = Quizzes::find_by_id(quiz_id)
            .one(&txn)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询测验失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| QuizHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(quiz.map(|m| m.into_quiz()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support;
    use crate::models::notifications::entities::NotificationType;
    use crate::models::notifications::requests::CreateNotificationRequest;
    use crate::models::quizzes::entities::QuizStatus;
    use crate::models::quizzes::requests::{CreateQuizRequest, QuizListQuery, UpdateQuizRequest};
    use crate::models::users::entities::UserRole;
    use chrono::Utc;

    fn quiz_request(course_id: i64, title: &str) -> CreateQuizRequest {
        CreateQuizRequest {
            course_id,
            title: title.to_string(),
            description: None,
            available_from: None,
            available_to: None,
            shuffle_questions: false,
            show_results_immediately: false,
            allow_edit_after_submission: false,
        }
    }

    #[tokio::test]
    async fn test_create_update_and_status() {
        let storage = test_support::storage().await;
        let teacher = test_support::user(&storage, "teacher01", UserRole::Instructor).await;
        let course = test_support::course(&storage, "CS101", teacher.id).await;

        let quiz = storage
            .create_quiz_impl(quiz_request(course.id, "Week 1"), teacher.id)
            .await
            .unwrap();
        assert_eq!(quiz.status, QuizStatus::Draft);
        assert!(!quiz.results_released);

        let updated = storage
            .update_quiz_impl(
                quiz.id,
                UpdateQuizRequest {
                    title: Some("Week 1 (revised)".to_string()),
                    shuffle_questions: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Week 1 (revised)");
        assert!(updated.shuffle_questions);
        assert!(!updated.show_results_immediately);

        let published = storage
            .set_quiz_status_impl(quiz.id, QuizStatus::Published)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(published.status, QuizStatus::Published);

        assert!(storage.update_quiz_impl(9999, UpdateQuizRequest::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_can_clear_window() {
        let storage = test_support::storage().await;
        let teacher = test_support::user(&storage, "teacher01", UserRole::Instructor).await;
        let course = test_support::course(&storage, "CS101", teacher.id).await;

        let now = Utc::now();
        let mut request = quiz_request(course.id, "Timed");
        request.available_from = Some(now);
        request.available_to = Some(now + chrono::Duration::days(1));
        let quiz = storage.create_quiz_impl(request, teacher.id).await.unwrap();
        assert!(quiz.available_from.is_some());

        // 未给出的字段不变
        let kept = storage
            .update_quiz_impl(quiz.id, UpdateQuizRequest::default())
            .await
            .unwrap()
            .unwrap();
        assert!(kept.available_from.is_some());
        assert!(kept.available_to.is_some());

        let cleared = storage
            .update_quiz_impl(
                quiz.id,
                UpdateQuizRequest {
                    available_from: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(cleared.available_from.is_none());
        assert!(cleared.available_to.is_some());
    }

    #[tokio::test]
    async fn test_group_assignment_and_filters() {
        let storage = test_support::storage().await;
        let teacher = test_support::user(&storage, "teacher01", UserRole::Instructor).await;
        let other = test_support::user(&storage, "teacher02", UserRole::Instructor).await;
        let student = test_support::user(&storage, "student01", UserRole::Student).await;
        let course = test_support::course(&storage, "CS101", teacher.id).await;
        let other_course = test_support::course(&storage, "CS999", other.id).await;

        let group_a = storage.create_group_impl(&course, "A").await.unwrap();
        let group_b = storage.create_group_impl(&course, "B").await.unwrap();
        storage.add_group_member_impl(group_b.id, student.id).await.unwrap();

        let quiz = storage
            .create_quiz_impl(quiz_request(course.id, "Week 1"), teacher.id)
            .await
            .unwrap();
        storage
            .create_quiz_impl(quiz_request(other_course.id, "Other"), other.id)
            .await
            .unwrap();

        storage
            .assign_quiz_groups_impl(quiz.id, &[group_a.id, group_a.id])
            .await
            .unwrap();
        assert_eq!(storage.list_quiz_group_ids_impl(quiz.id).await.unwrap(), vec![group_a.id]);
        assert!(!storage.is_student_assigned_to_quiz_impl(quiz.id, student.id).await.unwrap());

        storage
            .assign_quiz_groups_impl(quiz.id, &[group_a.id, group_b.id])
            .await
            .unwrap();
        assert!(storage.is_student_assigned_to_quiz_impl(quiz.id, student.id).await.unwrap());

        let mine = storage
            .list_quizzes_impl(QuizListQuery {
                instructor_id: Some(teacher.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, quiz.id);

        let for_student = storage
            .list_quizzes_impl(QuizListQuery {
                group_ids: Some(vec![group_b.id]),
                status: Some(QuizStatus::Published),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(for_student.is_empty());

        storage.set_quiz_status_impl(quiz.id, QuizStatus::Published).await.unwrap();
        let for_student = storage
            .list_quizzes_impl(QuizListQuery {
                group_ids: Some(vec![group_b.id]),
                status: Some(QuizStatus::Published),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(for_student.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_quiz_removes_questions() {
        let storage = test_support::storage().await;
        let teacher = test_support::user(&storage, "teacher01", UserRole::Instructor).await;
        let course = test_support::course(&storage, "CS101", teacher.id).await;
        let group = storage.create_group_impl(&course, "A").await.unwrap();

        let quiz = storage
            .create_quiz_impl(quiz_request(course.id, "Week 1"), teacher.id)
            .await
            .unwrap();
        storage
            .add_question_impl(quiz.id, test_support::mc_question("2+2?", &[("4", true), ("5", false)]))
            .await
            .unwrap();
        storage.assign_quiz_groups_impl(quiz.id, &[group.id]).await.unwrap();

        assert!(storage.delete_quiz_impl(quiz.id).await.unwrap());
        assert!(storage.get_quiz_by_id_impl(quiz.id).await.unwrap().is_none());
        assert_eq!(storage.count_questions_impl(quiz.id).await.unwrap(), 0);
        assert!(!storage.delete_quiz_impl(quiz.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_release_results_writes_notifications() {
        let storage = test_support::storage().await;
        let teacher = test_support::user(&storage, "teacher01", UserRole::Instructor).await;
        let student = test_support::user(&storage, "student01", UserRole::Student).await;
        let course = test_support::course(&storage, "CS101", teacher.id).await;
        let quiz = storage
            .create_quiz_impl(quiz_request(course.id, "Week 1"), teacher.id)
            .await
            .unwrap();

        let now = Utc::now();
        let released = storage
            .release_quiz_results_impl(
                quiz.id,
                now,
                vec![CreateNotificationRequest {
                    user_id: student.id,
                    notification_type: NotificationType::ResultsReleased,
                    title: "Results released".to_string(),
                    content: None,
                    reference_type: Some("quiz".to_string()),
                    reference_id: Some(quiz.id),
                }],
            )
            .await
            .unwrap()
            .unwrap();

        assert!(released.results_released);
        assert_eq!(
            released.results_released_at.map(|t| t.timestamp()),
            Some(now.timestamp())
        );
        assert_eq!(
            storage.get_unread_notification_count_impl(student.id).await.unwrap(),
            1
        );

        // 重复发布不生效，也不会再次通知
        let again = storage
            .release_quiz_results_impl(
                quiz.id,
                Utc::now(),
                vec![CreateNotificationRequest {
                    user_id: student.id,
                    notification_type: NotificationType::ResultsReleased,
                    title: "Results released".to_string(),
                    content: None,
                    reference_type: Some("quiz".to_string()),
                    reference_id: Some(quiz.id),
                }],
            )
            .await
            .unwrap();
        assert!(again.is_none());
        assert_eq!(
            storage.get_unread_notification_count_impl(student.id).await.unwrap(),
            1
        );
        assert!(
            storage
                .release_quiz_results_impl(quiz.id + 100, Utc::now(), Vec::new())
                .await
                .unwrap()
                .is_none()
        );
    }
}
