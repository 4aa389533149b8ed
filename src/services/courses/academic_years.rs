use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::cache::cached_query;
use crate::config::AppConfig;
use crate::errors::QuizHubError;
use crate::models::ApiResponse;
use crate::models::courses::{requests::AcademicYearsQuery, responses::AcademicYearListResponse};

pub async fn list_academic_years(
    service: &CourseService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let cache = service.get_cache(request)?;
    let ttl = AppConfig::get().cache.default_ttl;

    let response = cached_query(&cache, &AcademicYearsQuery::default(), ttl, || async move {
        Ok::<_, QuizHubError>(AcademicYearListResponse {
            items: storage.list_academic_years().await?,
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
}
