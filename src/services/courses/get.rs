use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::{ApiResponse, courses::responses::CourseResponse};
use crate::services::access::load_course;

pub async fn get_course(
    service: &CourseService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let course = load_course(&storage, course_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(CourseResponse { course }, "查询成功")))
}
