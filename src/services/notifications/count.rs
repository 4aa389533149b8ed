use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NotificationService;
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::models::notifications::responses::UnreadCountResponse;

pub async fn get_unread_count(
    service: &NotificationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    let storage = service.get_storage(request)?;

    let unread_count = storage.get_unread_notification_count(user.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UnreadCountResponse { unread_count },
        "查询成功",
    )))
}
