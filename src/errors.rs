//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称，并映射为 HTTP 响应。

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use crate::models::{ApiResponse, ErrorCode};

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_quizhub_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum QuizHubError {
            $($variant(String),)*
        }

        impl QuizHubError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(QuizHubError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(QuizHubError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(QuizHubError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl QuizHubError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        QuizHubError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_quizhub_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    Validation("E006", "Validation Error"),
    BadRequest("E007", "Bad Request"),
    NotFound("E008", "Resource Not Found"),
    Conflict("E009", "Conflict"),
    Serialization("E010", "Serialization Error"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
}

impl QuizHubError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 对外暴露的业务错误码
    pub fn api_code(&self) -> ErrorCode {
        match self {
            QuizHubError::Validation(_) => ErrorCode::ValidationFailed,
            QuizHubError::BadRequest(_) => ErrorCode::BadRequest,
            QuizHubError::NotFound(_) => ErrorCode::NotFound,
            QuizHubError::Conflict(_) => ErrorCode::Conflict,
            QuizHubError::Authentication(_) => ErrorCode::Unauthorized,
            QuizHubError::Authorization(_) => ErrorCode::Forbidden,
            _ => ErrorCode::InternalServerError,
        }
    }

    /// 是否为客户端可见的错误（非内部错误）
    pub fn is_client_error(&self) -> bool {
        self.api_code() != ErrorCode::InternalServerError
    }
}

impl fmt::Display for QuizHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for QuizHubError {}

impl ResponseError for QuizHubError {
    fn status_code(&self) -> StatusCode {
        match self {
            QuizHubError::Validation(_) | QuizHubError::BadRequest(_) => StatusCode::BAD_REQUEST,
            QuizHubError::Authentication(_) => StatusCode::UNAUTHORIZED,
            QuizHubError::Authorization(_) => StatusCode::FORBIDDEN,
            QuizHubError::NotFound(_) => StatusCode::NOT_FOUND,
            QuizHubError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.is_client_error() {
            self.message().to_string()
        } else {
            tracing::error!("{}", self.format_simple());
            "Internal server error".to_string()
        };

        HttpResponse::build(self.status_code())
            .json(ApiResponse::error_empty(self.api_code(), message))
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for QuizHubError {
    fn from(err: sea_orm::DbErr) -> Self {
        QuizHubError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for QuizHubError {
    fn from(err: serde_json::Error) -> Self {
        QuizHubError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for QuizHubError {
    fn from(err: chrono::ParseError) -> Self {
        QuizHubError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, QuizHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(QuizHubError::cache_connection("test").code(), "E001");
        assert_eq!(QuizHubError::database_config("test").code(), "E003");
        assert_eq!(QuizHubError::validation("test").code(), "E006");
        assert_eq!(QuizHubError::conflict("test").code(), "E009");
        assert_eq!(QuizHubError::authentication("test").code(), "E012");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            QuizHubError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(QuizHubError::bad_request("test").error_type(), "Bad Request");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            QuizHubError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            QuizHubError::bad_request("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            QuizHubError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(QuizHubError::conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            QuizHubError::authorization("x").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            QuizHubError::database_operation("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_errors_are_not_client_errors() {
        assert!(!QuizHubError::database_operation("boom").is_client_error());
        assert!(QuizHubError::not_found("quiz").is_client_error());
    }

    #[test]
    fn test_format_simple() {
        let err = QuizHubError::validation("Points must be positive");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Points must be positive"));
    }
}
