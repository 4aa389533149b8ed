pub mod access;
pub mod auth;
pub mod courses;
pub mod groups;
pub mod notifications;
pub mod questions;
pub mod quiz_submissions;
pub mod quizzes;
pub mod users;

pub use auth::AuthService;
pub use courses::CourseService;
pub use groups::GroupService;
pub use notifications::NotificationService;
pub use questions::QuestionService;
pub use quiz_submissions::QuizSubmissionService;
pub use quizzes::QuizService;
pub use users::UserService;

use actix_web::{HttpRequest, web};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::errors::{QuizHubError, Result};
use crate::storage::Storage;

/// 从 app data 中取出存储实例
pub(crate) fn storage_from_request(request: &HttpRequest) -> Result<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| QuizHubError::database_config("Storage not found in app data"))
}

/// 从 app data 中取出缓存实例
pub(crate) fn cache_from_request(request: &HttpRequest) -> Result<Arc<dyn ObjectCache>> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| QuizHubError::cache_connection("Cache not found in app data"))
}
