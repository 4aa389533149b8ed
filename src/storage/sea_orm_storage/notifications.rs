//! 通知存储操作

use super::SeaOrmStorage;
use crate::entity::notifications::{ActiveModel, Column, Entity as Notifications};
use crate::errors::{QuizHubError, Result};
use crate::models::{
    PaginationInfo,
    notifications::{
        entities::Notification,
        requests::{CreateNotificationRequest, NotificationListQuery},
        responses::NotificationListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

/// 构造未读通知，供事务内批量写入
pub(super) fn notification_active_model(req: CreateNotificationRequest) -> ActiveModel {
    ActiveModel {
        user_id: Set(req.user_id),
        notification_type: Set(req.notification_type.to_string()),
        title: Set(req.title),
        content: Set(req.content),
        reference_type: Set(req.reference_type),
        reference_id: Set(req.reference_id),
        is_read: Set(false),
        created_at: Set(chrono::Utc::now().timestamp()),
        ..Default::default()
    }
}

impl SeaOrmStorage {
    /// 创建通知
    pub async fn create_notification_impl(
        &self,
        req: CreateNotificationRequest,
    ) -> Result<Notification> {
        let result = notification_active_model(req)
            .insert(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("创建通知失败: {e}")))?;

        Ok(result.into_notification())
    }

    /// 列出用户通知（分页）
    pub async fn list_notifications_with_pagination_impl(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse> {
        let page = query.pagination.normalized_page();
        let size = query.pagination.normalized_size();

        let mut select = Notifications::find().filter(Column::UserId.eq(user_id));

        // 未读筛选
        if let Some(true) = query.unread_only {
            select = select.filter(Column::IsRead.eq(false));
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询通知总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询通知页数失败: {e}")))?;

        let notifications = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询通知列表失败: {e}")))?;

        Ok(NotificationListResponse {
            items: notifications
                .into_iter()
                .map(|m| m.into_notification())
                .collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 获取用户未读通知数量
    pub async fn get_unread_notification_count_impl(&self, user_id: i64) -> Result<i64> {
        let count = Notifications::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询未读通知数量失败: {e}")))?;

        Ok(count as i64)
    }

    /// 标记通知为已读，只能标记自己的通知
    pub async fn mark_notification_as_read_impl(
        &self,
        notification_id: i64,
        user_id: i64,
    ) -> Result<bool> {
        let existing = Notifications::find_by_id(notification_id)
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询通知失败: {e}")))?;

        if existing.is_none() {
            return Ok(false);
        }

        Notifications::update_many()
            .col_expr(Column::IsRead, sea_orm::sea_query::Expr::value(true))
            .filter(Column::Id.eq(notification_id))
            .exec(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("标记通知已读失败: {e}")))?;

        Ok(true)
    }

    /// 标记用户所有通知为已读
    pub async fn mark_all_notifications_as_read_impl(&self, user_id: i64) -> Result<i64> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, sea_orm::sea_query::Expr::value(true))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("标记全部通知已读失败: {e}")))?;

        Ok(result.rows_affected as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support;
    use crate::models::PaginationQuery;
    use crate::models::notifications::entities::NotificationType;
    use crate::models::notifications::requests::{
        CreateNotificationRequest, NotificationListQuery,
    };
    use crate::models::users::entities::UserRole;

    fn notice(user_id: i64, title: &str) -> CreateNotificationRequest {
        CreateNotificationRequest {
            user_id,
            notification_type: NotificationType::SubmissionReceived,
            title: title.to_string(),
            content: None,
            reference_type: Some("quiz_submission".to_string()),
            reference_id: Some(1),
        }
    }

    #[tokio::test]
    async fn test_read_state_is_per_user() {
        let storage = test_support::storage().await;
        let alice = test_support::user(&storage, "alice01", UserRole::Student).await;
        let bob = test_support::user(&storage, "bob0001", UserRole::Student).await;

        let first = storage.create_notification_impl(notice(alice.id, "one")).await.unwrap();
        storage.create_notification_impl(notice(alice.id, "two")).await.unwrap();
        storage.create_notification_impl(notice(bob.id, "three")).await.unwrap();

        assert_eq!(storage.get_unread_notification_count_impl(alice.id).await.unwrap(), 2);

        // 不能标记他人的通知
        assert!(!storage.mark_notification_as_read_impl(first.id, bob.id).await.unwrap());
        assert!(storage.mark_notification_as_read_impl(first.id, alice.id).await.unwrap());
        assert_eq!(storage.get_unread_notification_count_impl(alice.id).await.unwrap(), 1);

        let unread = storage
            .list_notifications_with_pagination_impl(
                alice.id,
                NotificationListQuery {
                    pagination: PaginationQuery::default(),
                    unread_only: Some(true),
                },
            )
            .await
            .unwrap();
        assert_eq!(unread.items.len(), 1);
        assert_eq!(unread.items[0].title, "two");

        assert_eq!(storage.mark_all_notifications_as_read_impl(alice.id).await.unwrap(), 1);
        assert_eq!(storage.get_unread_notification_count_impl(alice.id).await.unwrap(), 0);
        assert_eq!(storage.get_unread_notification_count_impl(bob.id).await.unwrap(), 1);
    }
}
