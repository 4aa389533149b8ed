//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod courses;
mod groups;
mod notifications;
mod questions;
mod quiz_submissions;
mod quizzes;
mod users;

use crate::config::AppConfig;
use crate::errors::{QuizHubError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Self::migrate(&db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 单连接的内存 SQLite，用于测试
    ///
    /// 内存数据库随连接销毁，因此连接池固定为一个且永不回收。
    pub async fn new_in_memory() -> Result<Self> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| QuizHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await
            .map_err(|e| QuizHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);
        Self::migrate(&db).await?;
        Ok(Self { db })
    }

    async fn migrate(db: &DatabaseConnection) -> Result<()> {
        Migrator::up(db, None)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("数据库迁移失败: {e}")))
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| QuizHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| QuizHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| QuizHubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(QuizHubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use super::{AnswerPayload, Storage};
use crate::models::{
    courses::{
        entities::Course,
        requests::{CourseListParams, CreateCourseRequest},
        responses::CourseListResponse,
    },
    groups::{
        entities::{Group, GroupMember},
        responses::GroupSummary,
    },
    notifications::{
        entities::Notification,
        requests::{CreateNotificationRequest, NotificationListQuery},
        responses::NotificationListResponse,
    },
    questions::{entities::Question, requests::QuestionRequest},
    quiz_submissions::entities::{GradingOutcome, QuizAnswer, QuizSubmission},
    quizzes::{
        entities::{Quiz, QuizStatus},
        requests::{CreateQuizRequest, QuizListQuery, UpdateQuizRequest},
    },
    users::{entities::User, requests::CreateUserRequest},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<i64> {
        self.count_users_impl().await
    }

    // 课程模块
    async fn create_course(
        &self,
        course: CreateCourseRequest,
        instructor_id: i64,
    ) -> Result<Course> {
        self.create_course_impl(course, instructor_id).await
    }

    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(course_id).await
    }

    async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>> {
        self.get_course_by_code_impl(code).await
    }

    async fn list_courses_with_pagination(
        &self,
        query: CourseListParams,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(query).await
    }

    async fn list_academic_years(&self) -> Result<Vec<String>> {
        self.list_academic_years_impl().await
    }

    // 分组模块
    async fn create_group(&self, course: &Course, name: &str) -> Result<Group> {
        self.create_group_impl(course, name).await
    }

    async fn get_group_by_id(&self, group_id: i64) -> Result<Option<Group>> {
        self.get_group_by_id_impl(group_id).await
    }

    async fn list_groups_by_course(&self, course_id: i64) -> Result<Vec<GroupSummary>> {
        self.list_groups_by_course_impl(course_id).await
    }

    async fn add_group_member(&self, group_id: i64, user_id: i64) -> Result<GroupMember> {
        self.add_group_member_impl(group_id, user_id).await
    }

    async fn remove_group_member(&self, group_id: i64, user_id: i64) -> Result<bool> {
        self.remove_group_member_impl(group_id, user_id).await
    }

    async fn list_user_group_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        self.list_user_group_ids_impl(user_id).await
    }

    // 测验模块
    async fn create_quiz(&self, quiz: CreateQuizRequest, created_by: i64) -> Result<Quiz> {
        self.create_quiz_impl(quiz, created_by).await
    }

    async fn get_quiz_by_id(&self, quiz_id: i64) -> Result<Option<Quiz>> {
        self.get_quiz_by_id_impl(quiz_id).await
    }

    async fn update_quiz(&self, quiz_id: i64, update: UpdateQuizRequest) -> Result<Option<Quiz>> {
        self.update_quiz_impl(quiz_id, update).await
    }

    async fn delete_quiz(&self, quiz_id: i64) -> Result<bool> {
        self.delete_quiz_impl(quiz_id).await
    }

    async fn list_quizzes(&self, query: QuizListQuery) -> Result<Vec<Quiz>> {
        self.list_quizzes_impl(query).await
    }

    async fn set_quiz_status(&self, quiz_id: i64, status: QuizStatus) -> Result<Option<Quiz>> {
        self.set_quiz_status_impl(quiz_id, status).await
    }

    async fn assign_quiz_groups(&self, quiz_id: i64, group_ids: &[i64]) -> Result<()> {
        self.assign_quiz_groups_impl(quiz_id, group_ids).await
    }

    async fn list_quiz_group_ids(&self, quiz_id: i64) -> Result<Vec<i64>> {
        self.list_quiz_group_ids_impl(quiz_id).await
    }

    async fn is_student_assigned_to_quiz(&self, quiz_id: i64, user_id: i64) -> Result<bool> {
        self.is_student_assigned_to_quiz_impl(quiz_id, user_id)
            .await
    }

    async fn release_quiz_results(
        &self,
        quiz_id: i64,
        released_at: DateTime<Utc>,
        notifications: Vec<CreateNotificationRequest>,
    ) -> Result<Option<Quiz>> {
        self.release_quiz_results_impl(quiz_id, released_at, notifications)
            .await
    }

    // 题目模块
    async fn add_question(&self, quiz_id: i64, question: QuestionRequest) -> Result<Question> {
        self.add_question_impl(quiz_id, question).await
    }

    async fn update_question(
        &self,
        question_id: i64,
        question: QuestionRequest,
    ) -> Result<Option<Question>> {
        self.update_question_impl(question_id, question).await
    }

    async fn delete_question(&self, question_id: i64) -> Result<bool> {
        self.delete_question_impl(question_id).await
    }

    async fn get_question_by_id(&self, question_id: i64) -> Result<Option<Question>> {
        self.get_question_by_id_impl(question_id).await
    }

    async fn list_questions(&self, quiz_id: i64) -> Result<Vec<Question>> {
        self.list_questions_impl(quiz_id).await
    }

    async fn count_questions(&self, quiz_id: i64) -> Result<i64> {
        self.count_questions_impl(quiz_id).await
    }

    // 作答模块
    async fn create_submission(&self, quiz_id: i64, student_id: i64) -> Result<QuizSubmission> {
        self.create_submission_impl(quiz_id, student_id).await
    }

    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<QuizSubmission>> {
        self.get_submission_by_id_impl(submission_id).await
    }

    async fn find_in_progress_submission(
        &self,
        quiz_id: i64,
        student_id: i64,
    ) -> Result<Option<QuizSubmission>> {
        self.find_in_progress_submission_impl(quiz_id, student_id)
            .await
    }

    async fn list_submissions_by_student(&self, student_id: i64) -> Result<Vec<QuizSubmission>> {
        self.list_submissions_by_student_impl(student_id).await
    }

    async fn list_submissions_by_quiz(&self, quiz_id: i64) -> Result<Vec<QuizSubmission>> {
        self.list_submissions_by_quiz_impl(quiz_id).await
    }

    async fn count_submissions_for_quiz(&self, quiz_id: i64) -> Result<i64> {
        self.count_submissions_for_quiz_impl(quiz_id).await
    }

    async fn upsert_answer(
        &self,
        submission_id: i64,
        question_id: i64,
        payload: AnswerPayload,
    ) -> Result<QuizAnswer> {
        self.upsert_answer_impl(submission_id, question_id, payload)
            .await
    }

    async fn list_answers(&self, submission_id: i64) -> Result<Vec<QuizAnswer>> {
        self.list_answers_impl(submission_id).await
    }

    async fn list_answers_for_quiz(&self, quiz_id: i64) -> Result<Vec<QuizAnswer>> {
        self.list_answers_for_quiz_impl(quiz_id).await
    }

    async fn finalize_submission(
        &self,
        submission_id: i64,
        outcome: GradingOutcome,
        notification: Option<CreateNotificationRequest>,
    ) -> Result<Option<QuizSubmission>> {
        self.finalize_submission_impl(submission_id, outcome, notification)
            .await
    }

    async fn save_answer_and_regrade(
        &self,
        submission_id: i64,
        question_id: i64,
        payload: AnswerPayload,
        regrade: &(dyn for<'a> Fn(&'a [QuizAnswer]) -> GradingOutcome + Sync),
    ) -> Result<Option<(QuizAnswer, QuizSubmission)>> {
        self.save_answer_and_regrade_impl(submission_id, question_id, payload, regrade)
            .await
    }

    // 通知模块
    async fn create_notification(&self, req: CreateNotificationRequest) -> Result<Notification> {
        self.create_notification_impl(req).await
    }

    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse> {
        self.list_notifications_with_pagination_impl(user_id, query)
            .await
    }

    async fn get_unread_notification_count(&self, user_id: i64) -> Result<i64> {
        self.get_unread_notification_count_impl(user_id).await
    }

    async fn mark_notification_as_read(
        &self,
        notification_id: i64,
        user_id: i64,
    ) -> Result<bool> {
        self.mark_notification_as_read_impl(notification_id, user_id)
            .await
    }

    async fn mark_all_notifications_as_read(&self, user_id: i64) -> Result<i64> {
        self.mark_all_notifications_as_read_impl(user_id).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! 存储层测试用的数据构造

    use super::SeaOrmStorage;
    use crate::models::courses::{entities::Course, requests::CreateCourseRequest};
    use crate::models::questions::entities::QuestionType;
    use crate::models::questions::requests::{OptionRequest, QuestionRequest};
    use crate::models::users::{
        entities::{User, UserRole},
        requests::CreateUserRequest,
    };

    pub async fn storage() -> SeaOrmStorage {
        SeaOrmStorage::new_in_memory().await.unwrap()
    }

    pub async fn user(storage: &SeaOrmStorage, username: &str, role: UserRole) -> User {
        storage
            .create_user_impl(CreateUserRequest {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: "hashed".to_string(),
                role,
                display_name: None,
            })
            .await
            .unwrap()
    }

    pub async fn course(storage: &SeaOrmStorage, code: &str, instructor_id: i64) -> Course {
        storage
            .create_course_impl(
                CreateCourseRequest {
                    code: code.to_string(),
                    title: format!("Course {code}"),
                    description: None,
                    academic_year: "2025-2026".to_string(),
                    instructor_id: None,
                },
                instructor_id,
            )
            .await
            .unwrap()
    }

    pub fn mc_question(text: &str, options: &[(&str, bool)]) -> QuestionRequest {
        QuestionRequest {
            text: text.to_string(),
            points: 1.0,
            question_type: QuestionType::MultipleChoice,
            expected_answer: None,
            options: options
                .iter()
                .map(|(text, is_correct)| OptionRequest {
                    text: text.to_string(),
                    is_correct: *is_correct,
                })
                .collect(),
        }
    }
}
