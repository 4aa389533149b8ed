use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::courses::requests::{CourseListParams, CreateCourseRequest};
use crate::models::groups::requests::CreateGroupRequest;
use crate::models::users::entities::UserRole;
use crate::services::{CourseService, GroupService};

// 懒加载的全局服务实例
static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);
static GROUP_SERVICE: Lazy<GroupService> = Lazy::new(GroupService::new_lazy);

pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseListParams>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_courses(query.into_inner(), &req).await
}

pub async fn create_course(
    req: HttpRequest,
    course_data: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .create_course(course_data.into_inner(), &req)
        .await
}

pub async fn get_course(req: HttpRequest, course_id: web::Path<i64>) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_course(course_id.into_inner(), &req).await
}

pub async fn list_groups(req: HttpRequest, course_id: web::Path<i64>) -> ActixResult<HttpResponse> {
    GROUP_SERVICE.list_groups(course_id.into_inner(), &req).await
}

pub async fn create_group(
    req: HttpRequest,
    course_id: web::Path<i64>,
    group_data: web::Json<CreateGroupRequest>,
) -> ActixResult<HttpResponse> {
    GROUP_SERVICE
        .create_group(course_id.into_inner(), group_data.into_inner(), &req)
        .await
}

pub async fn list_academic_years(req: HttpRequest) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_academic_years(&req).await
}

// 配置路由
pub fn configure_course_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/courses")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list_courses)).route(
                    web::post()
                        .to(create_course)
                        // 教师为自己开课，管理员可指定任课教师
                        .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                ),
            )
            .service(web::resource("/{course_id}").route(web::get().to(get_course)))
            .service(
                web::resource("/{course_id}/groups")
                    .route(
                        web::get()
                            .to(list_groups)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::post()
                            .to(create_group)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            ),
    )
    .service(
        web::resource("/api/academic-years")
            .wrap(middlewares::RequireJWT)
            .route(web::get().to(list_academic_years)),
    );
}
