use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NotificationService;
use crate::errors::QuizHubError;
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::models::notifications::responses::MarkAllReadResponse;

pub async fn mark_as_read(
    service: &NotificationService,
    notification_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    let storage = service.get_storage(request)?;

    // 不属于当前用户的通知按不存在处理
    if !storage
        .mark_notification_as_read(notification_id, user.id)
        .await?
    {
        return Err(
            QuizHubError::not_found(format!("Notification {notification_id} not found")).into(),
        );
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Marked as read")))
}

pub async fn mark_all_as_read(
    service: &NotificationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    let storage = service.get_storage(request)?;

    let marked_count = storage.mark_all_notifications_as_read(user.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MarkAllReadResponse { marked_count },
        "All notifications marked as read",
    )))
}
