pub mod auth;

pub mod users;

pub mod courses;

pub mod groups;

pub mod quizzes;

pub mod quiz_submissions;

pub mod notifications;

pub use auth::configure_auth_routes;
pub use courses::configure_course_routes;
pub use groups::configure_group_routes;
pub use notifications::configure_notification_routes;
pub use quiz_submissions::configure_quiz_submission_routes;
pub use quizzes::configure_quiz_routes;
pub use users::configure_user_routes;

use actix_web::web;

/// 注册全部 API 路由
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_user_routes)
        .configure(configure_course_routes)
        .configure(configure_group_routes)
        .configure(configure_quiz_routes)
        .configure(configure_quiz_submission_routes)
        .configure(configure_notification_routes);
}
