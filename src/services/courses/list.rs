use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::cache::cached_query;
use crate::config::AppConfig;
use crate::errors::QuizHubError;
use crate::models::ApiResponse;
use crate::models::courses::{
    requests::{CourseListParams, validate_academic_year},
    responses::CourseListResponse,
};

pub async fn list_courses(
    service: &CourseService,
    query: CourseListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(year) = &query.academic_year {
        validate_academic_year(year).map_err(QuizHubError::validation)?;
    }

    let storage = service.get_storage(request)?;
    let cache = service.get_cache(request)?;
    let ttl = AppConfig::get().cache.default_ttl;

    let response: CourseListResponse = cached_query(&cache, &query, ttl, || {
        let query = query.clone();
        async move { storage.list_courses_with_pagination(query).await }
    })
    .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
}
