//! 课程存储操作

use super::SeaOrmStorage;
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::errors::{QuizHubError, Result};
use crate::models::{
    PaginationInfo,
    courses::{
        entities::Course,
        requests::{CourseListParams, CreateCourseRequest},
        responses::CourseListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建课程
    pub async fn create_course_impl(
        &self,
        req: CreateCourseRequest,
        instructor_id: i64,
    ) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            code: Set(req.code.trim().to_string()),
            title: Set(req.title.trim().to_string()),
            description: Set(req.description),
            academic_year: Set(req.academic_year),
            instructor_id: Set(instructor_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("创建课程失败: {e}")))?;

        Ok(result.into_course())
    }

    /// 通过 ID 获取课程
    pub async fn get_course_by_id_impl(&self, course_id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 通过课程代码获取课程
    pub async fn get_course_by_code_impl(&self, code: &str) -> Result<Option<Course>> {
        let result = Courses::find()
            .filter(Column::Code.eq(code.trim()))
            .one(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 分页列出课程
    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseListParams,
    ) -> Result<CourseListResponse> {
        let page = query.pagination.normalized_page();
        let size = query.pagination.normalized_size();

        let mut select = Courses::find();

        if let Some(ref year) = query.academic_year
            && !year.trim().is_empty()
        {
            select = select.filter(Column::AcademicYear.eq(year.trim()));
        }

        select = select.order_by_asc(Column::Code);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询课程总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询课程页数失败: {e}")))?;

        let courses = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(CourseListResponse {
            items: courses.into_iter().map(|m| m.into_course()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 去重后的学年列表（新学年在前）
    pub async fn list_academic_years_impl(&self) -> Result<Vec<String>> {
        let years: Vec<String> = Courses::find()
            .select_only()
            .column(Column::AcademicYear)
            .distinct()
            .order_by_desc(Column::AcademicYear)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询学年列表失败: {e}")))?;

        Ok(years)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support;
    use crate::models::PaginationQuery;
    use crate::models::courses::requests::{CourseListParams, CreateCourseRequest};
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_list_courses_filters_by_year() {
        let storage = test_support::storage().await;
        let teacher = test_support::user(&storage, "teacher01", UserRole::Instructor).await;

        test_support::course(&storage, "CS101", teacher.id).await;
        storage
            .create_course_impl(
                CreateCourseRequest {
                    code: "CS201".to_string(),
                    title: "Data Structures".to_string(),
                    description: None,
                    academic_year: "2024-2025".to_string(),
                    instructor_id: None,
                },
                teacher.id,
            )
            .await
            .unwrap();

        let all = storage
            .list_courses_with_pagination_impl(CourseListParams {
                pagination: PaginationQuery::default(),
                academic_year: None,
            })
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 2);

        let filtered = storage
            .list_courses_with_pagination_impl(CourseListParams {
                pagination: PaginationQuery::default(),
                academic_year: Some("2024-2025".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(filtered.items.len(), 1);
        assert_eq!(filtered.items[0].code, "CS201");

        let years = storage.list_academic_years_impl().await.unwrap();
        assert_eq!(years, vec!["2025-2026".to_string(), "2024-2025".to_string()]);
    }

    #[tokio::test]
    async fn test_course_lookup_by_code() {
        let storage = test_support::storage().await;
        let teacher = test_support::user(&storage, "teacher01", UserRole::Instructor).await;
        let course = test_support::course(&storage, "MATH1", teacher.id).await;

        let found = storage.get_course_by_code_impl("MATH1").await.unwrap();
        assert_eq!(found.map(|c| c.id), Some(course.id));
        assert!(storage.get_course_by_code_impl("NOPE").await.unwrap().is_none());
    }
}
