//! 提取器错误处理
//!
//! 把 actix 默认的纯文本 400 替换为统一的 `ApiResponse` 信封。

use actix_web::error::{InternalError, JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{Error, HttpRequest, HttpResponse};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

fn bad_request<E>(err: E, message: String) -> Error
where
    E: std::fmt::Debug + std::fmt::Display + 'static,
{
    let response = HttpResponse::BadRequest()
        .json(ApiResponse::error_empty(ErrorCode::BadRequest, message));
    InternalError::from_response(err, response).into()
}

/// JSON 请求体错误处理器
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    debug!("Invalid JSON body for {}: {}", req.path(), err);
    let message = match &err {
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        JsonPayloadError::Deserialize(e) => format!("Invalid request body: {e}"),
        _ => format!("Invalid request body: {err}"),
    };
    bad_request(err, message)
}

/// 查询参数错误处理器
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> Error {
    debug!("Invalid query string for {}: {}", req.path(), err);
    let message = format!("Invalid query parameters: {err}");
    bad_request(err, message)
}

/// 路径参数错误处理器
pub fn path_error_handler(err: PathError, req: &HttpRequest) -> Error {
    debug!("Invalid path parameter for {}: {}", req.path(), err);
    let message = format!("Invalid path parameter: {err}");
    bad_request(err, message)
}
