//! 业务层权限判断
//!
//! 路由中间件只按系统角色放行，这里再按课程归属做细粒度检查。

use std::sync::Arc;

use crate::errors::{QuizHubError, Result};
use crate::models::courses::entities::Course;
use crate::models::quizzes::entities::Quiz;
use crate::models::users::entities::{User, UserRole};
use crate::storage::Storage;

/// 管理员可管理任意课程，教师只能管理自己任课的课程
pub fn can_manage_course(user: &User, course: &Course) -> bool {
    user.role.is_admin() || (user.role == UserRole::Instructor && course.instructor_id == user.id)
}

pub fn ensure_course_staff(user: &User, course: &Course) -> Result<()> {
    if can_manage_course(user, course) {
        Ok(())
    } else {
        Err(QuizHubError::authorization(
            "Only the course instructor or an administrator may do this",
        ))
    }
}

pub fn ensure_student(user: &User) -> Result<()> {
    if user.role == UserRole::Student {
        Ok(())
    } else {
        Err(QuizHubError::authorization("Only students may do this"))
    }
}

pub async fn load_course(storage: &Arc<dyn Storage>, course_id: i64) -> Result<Course> {
    storage
        .get_course_by_id(course_id)
        .await?
        .ok_or_else(|| QuizHubError::not_found(format!("Course {course_id} not found")))
}

pub async fn load_quiz(storage: &Arc<dyn Storage>, quiz_id: i64) -> Result<Quiz> {
    storage
        .get_quiz_by_id(quiz_id)
        .await?
        .ok_or_else(|| QuizHubError::not_found(format!("Quiz {quiz_id} not found")))
}

/// 加载测验及其课程，并确认调用者是课程教师或管理员
pub async fn load_managed_quiz(
    storage: &Arc<dyn Storage>,
    user: &User,
    quiz_id: i64,
) -> Result<(Quiz, Course)> {
    let quiz = load_quiz(storage, quiz_id).await?;
    let course = load_course(storage, quiz.course_id).await?;
    ensure_course_staff(user, &course)?;
    Ok((quiz, course))
}

/// 已有作答的测验不能再修改题目、选项和分组
pub async fn ensure_no_submissions(storage: &Arc<dyn Storage>, quiz_id: i64) -> Result<()> {
    if storage.count_submissions_for_quiz(quiz_id).await? > 0 {
        return Err(QuizHubError::conflict(
            "Quiz already has submissions; its structure can no longer change",
        ));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::users::entities::UserStatus;
    use chrono::Utc;

    pub(crate) fn user(id: i64, role: UserRole) -> User {
        User {
            id,
            username: format!("user{id:04}"),
            email: format!("user{id}@example.com"),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            display_name: None,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn course(instructor_id: i64) -> Course {
        Course {
            id: 1,
            code: "CS101".to_string(),
            title: "Intro".to_string(),
            description: None,
            academic_year: "2025-2026".to_string(),
            instructor_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_course_management_rules() {
        let course = course(10);
        assert!(can_manage_course(&user(10, UserRole::Instructor), &course));
        assert!(!can_manage_course(&user(11, UserRole::Instructor), &course));
        assert!(can_manage_course(&user(1, UserRole::Admin), &course));
        assert!(can_manage_course(&user(2, UserRole::SuperAdmin), &course));
        // 学生即使 ID 相同也不能管理
        assert!(!can_manage_course(&user(10, UserRole::Student), &course));
    }

    #[test]
    fn test_forbidden_is_authorization_error() {
        let err = ensure_course_staff(&user(11, UserRole::Instructor), &course(10)).unwrap_err();
        assert!(matches!(err, QuizHubError::Authorization(_)));
        assert!(ensure_student(&user(3, UserRole::Student)).is_ok());
        assert!(ensure_student(&user(3, UserRole::Admin)).is_err());
    }
}
