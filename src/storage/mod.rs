use std::sync::Arc;

use chrono::{DateTime, Utc};

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

use crate::errors::Result;

pub mod sea_orm_storage;

/// 写入一道题的答案
#[derive(Debug, Clone)]
pub enum AnswerPayload {
    /// 选择题选项集合（已去重）
    Choice(Vec<i64>),
    /// 简答题原始文本
    Text(String),
}

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 字段需为哈希值）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 用户总数
    async fn count_users(&self) -> Result<i64>;

    /// 课程管理方法
    async fn create_course(&self, course: CreateCourseRequest, instructor_id: i64)
    -> Result<Course>;
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;
    async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>>;
    async fn list_courses_with_pagination(
        &self,
        query: CourseListParams,
    ) -> Result<CourseListResponse>;
    // 去重后的学年列表（倒序）
    async fn list_academic_years(&self) -> Result<Vec<String>>;

    /// 分组管理方法
    async fn create_group(&self, course: &Course, name: &str) -> Result<Group>;
    async fn get_group_by_id(&self, group_id: i64) -> Result<Option<Group>>;
    async fn list_groups_by_course(&self, course_id: i64) -> Result<Vec<GroupSummary>>;
    async fn add_group_member(&self, group_id: i64, user_id: i64) -> Result<GroupMember>;
    async fn remove_group_member(&self, group_id: i64, user_id: i64) -> Result<bool>;
    // 用户所在的全部分组
    async fn list_user_group_ids(&self, user_id: i64) -> Result<Vec<i64>>;

    /// 测验管理方法
    async fn create_quiz(&self, quiz: CreateQuizRequest, created_by: i64) -> Result<Quiz>;
    async fn get_quiz_by_id(&self, quiz_id: i64) -> Result<Option<Quiz>>;
    async fn update_quiz(&self, quiz_id: i64, update: UpdateQuizRequest) -> Result<Option<Quiz>>;
    // 删除测验及其题目、选项、分组关联
    async fn delete_quiz(&self, quiz_id: i64) -> Result<bool>;
    async fn list_quizzes(&self, query: QuizListQuery) -> Result<Vec<Quiz>>;
    async fn set_quiz_status(&self, quiz_id: i64, status: QuizStatus) -> Result<Option<Quiz>>;
    // 整体替换分配的分组
    async fn assign_quiz_groups(&self, quiz_id: i64, group_ids: &[i64]) -> Result<()>;
    async fn list_quiz_group_ids(&self, quiz_id: i64) -> Result<Vec<i64>>;
    // 学生是否属于测验分配的任一分组
    async fn is_student_assigned_to_quiz(&self, quiz_id: i64, user_id: i64) -> Result<bool>;
    // 标记成绩已发布并批量写入通知（同一事务）
    //
    // 测验不存在或成绩已发布时返回 None。
    async fn release_quiz_results(
        &self,
        quiz_id: i64,
        released_at: DateTime<Utc>,
        notifications: Vec<CreateNotificationRequest>,
    ) -> Result<Option<Quiz>>;

    /// 题目管理方法
    // 追加题目，位置为当前题目数 + 1
    async fn add_question(&self, quiz_id: i64, question: QuestionRequest) -> Result<Question>;
    // 整体替换题目内容与选项
    async fn update_question(
        &self,
        question_id: i64,
        question: QuestionRequest,
    ) -> Result<Option<Question>>;
    // 删除题目并重新整理位置
    async fn delete_question(&self, question_id: i64) -> Result<bool>;
    async fn get_question_by_id(&self, question_id: i64) -> Result<Option<Question>>;
    // 按位置排序
    async fn list_questions(&self, quiz_id: i64) -> Result<Vec<Question>>;
    async fn count_questions(&self, quiz_id: i64) -> Result<i64>;

    /// 作答管理方法
    async fn create_submission(&self, quiz_id: i64, student_id: i64) -> Result<QuizSubmission>;
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<QuizSubmission>>;
    async fn find_in_progress_submission(
        &self,
        quiz_id: i64,
        student_id: i64,
    ) -> Result<Option<QuizSubmission>>;
    async fn list_submissions_by_student(&self, student_id: i64) -> Result<Vec<QuizSubmission>>;
    async fn list_submissions_by_quiz(&self, quiz_id: i64) -> Result<Vec<QuizSubmission>>;
    async fn count_submissions_for_quiz(&self, quiz_id: i64) -> Result<i64>;
    // 每道题只保留一条答案，写入时清空评分字段
    async fn upsert_answer(
        &self,
        submission_id: i64,
        question_id: i64,
        payload: AnswerPayload,
    ) -> Result<QuizAnswer>;
    async fn list_answers(&self, submission_id: i64) -> Result<Vec<QuizAnswer>>;
    async fn list_answers_for_quiz(&self, quiz_id: i64) -> Result<Vec<QuizAnswer>>;
    // 提交：写入评分结果并置为 Graded（同一事务）
    //
    // 仅当作答仍为 InProgress 才会生效，否则返回 None。
    async fn finalize_submission(
        &self,
        submission_id: i64,
        outcome: GradingOutcome,
        notification: Option<CreateNotificationRequest>,
    ) -> Result<Option<QuizSubmission>>;
    // 已提交作答改答案：写入答案、按 `regrade` 重新评分并保存，全部在同一事务
    //
    // 作答不存在或仍为 InProgress 时返回 None。
    async fn save_answer_and_regrade(
        &self,
        submission_id: i64,
        question_id: i64,
        payload: AnswerPayload,
        regrade: &(dyn for<'a> Fn(&'a [QuizAnswer]) -> GradingOutcome + Sync),
    ) -> Result<Option<(QuizAnswer, QuizSubmission)>>;

    /// 通知管理方法
    async fn create_notification(&self, req: CreateNotificationRequest) -> Result<Notification>;
    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse>;
    async fn get_unread_notification_count(&self, user_id: i64) -> Result<i64>;
    // 仅能标记自己的通知
    async fn mark_notification_as_read(&self, notification_id: i64, user_id: i64)
    -> Result<bool>;
    async fn mark_all_notifications_as_read(&self, user_id: i64) -> Result<i64>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
