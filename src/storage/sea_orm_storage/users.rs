use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{QuizHubError, Result};
use crate::models::users::{
    entities::{User, UserStatus},
    requests::CreateUserRequest,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, Set,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            display_name: Set(req.display_name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("创建用户失败: {e}")))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名或邮箱获取用户
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("更新最后登录时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 用户总数
    pub async fn count_users_impl(&self) -> Result<i64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support;
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_create_and_lookup_user() {
        let storage = test_support::storage().await;
        assert_eq!(storage.count_users_impl().await.unwrap(), 0);

        let user = test_support::user(&storage, "student01", UserRole::Student).await;
        assert_eq!(user.role, UserRole::Student);

        let by_email = storage
            .get_user_by_username_or_email_impl("student01@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);
        assert_eq!(by_email.password_hash, "hashed");

        assert!(storage.update_last_login_impl(user.id).await.unwrap());
        let reloaded = storage.get_user_by_id_impl(user.id).await.unwrap().unwrap();
        assert!(reloaded.last_login.is_some());
        assert_eq!(storage.count_users_impl().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected_by_database() {
        let storage = test_support::storage().await;
        test_support::user(&storage, "student01", UserRole::Student).await;

        let dup = storage
            .create_user_impl(crate::models::users::requests::CreateUserRequest {
                username: "student01".to_string(),
                email: "other@example.com".to_string(),
                password: "hashed".to_string(),
                role: UserRole::Student,
                display_name: None,
            })
            .await;
        assert!(dup.is_err());
    }
}
