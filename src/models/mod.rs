//! 数据模型定义
//!
//! 每个业务领域按 `entities` / `requests` / `responses` 拆分，
//! 响应类型通过 ts-rs 导出给前端。

pub mod analytics;
pub mod auth;
pub mod common;
pub mod courses;
pub mod groups;
pub mod notifications;
pub mod questions;
pub mod quiz_submissions;
pub mod quizzes;
pub mod users;

pub use common::pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

/// 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用请求错误
    BadRequest = 1000,
    ValidationFailed = 1001,
    NotFound = 1002,
    Conflict = 1003,

    // 认证授权
    Unauthorized = 2000,
    AuthFailed = 2001,
    Forbidden = 2002,
    RateLimitExceeded = 2003,

    InternalServerError = 5000,
}

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
