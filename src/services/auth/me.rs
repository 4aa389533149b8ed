use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, auth::UserInfoResponse};

pub async fn handle_me(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserInfoResponse { user },
        "User information retrieved",
    )))
}
