use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseService;
use crate::errors::QuizHubError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    courses::{requests::CreateCourseRequest, responses::CourseResponse},
    users::entities::UserRole,
};
use crate::utils::Validate;

pub async fn create_course(
    service: &CourseService,
    course_data: CreateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    course_data.validate()?;

    let storage = service.get_storage(request)?;

    // 教师只能为自己创建课程，管理员可指定任课教师
    let instructor_id = match (&user.role, course_data.instructor_id) {
        (UserRole::Instructor, Some(id)) if id != user.id => {
            return Err(QuizHubError::authorization(
                "Instructors may only create courses they teach",
            )
            .into());
        }
        (UserRole::Instructor, _) => user.id,
        (role, Some(id)) if role.is_admin() => {
            let instructor = storage
                .get_user_by_id(id)
                .await?
                .ok_or_else(|| QuizHubError::not_found(format!("User {id} not found")))?;
            if instructor.role != UserRole::Instructor {
                return Err(
                    QuizHubError::validation("Course instructor must be an instructor").into(),
                );
            }
            id
        }
        (role, None) if role.is_admin() => user.id,
        _ => {
            return Err(QuizHubError::authorization("Only staff may create courses").into());
        }
    };

    if storage
        .get_course_by_code(course_data.code.trim())
        .await?
        .is_some()
    {
        return Err(QuizHubError::conflict("Course code already exists").into());
    }

    let course = storage.create_course(course_data, instructor_id).await?;
    info!("Course {} created by {}", course.code, user.username);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        CourseResponse { course },
        "Course created successfully",
    )))
}
