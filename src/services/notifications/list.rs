use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NotificationService;
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::models::notifications::requests::NotificationListQuery;

pub async fn list_notifications(
    service: &NotificationService,
    query: NotificationListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    let storage = service.get_storage(request)?;

    let response = storage
        .list_notifications_with_pagination(user.id, query)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
}
