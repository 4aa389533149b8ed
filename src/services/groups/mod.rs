pub mod create;
pub mod list;
pub mod members;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{QuizHubError, Result};
use crate::models::courses::entities::Course;
use crate::models::groups::{
    entities::Group,
    requests::{AddGroupMemberRequest, CreateGroupRequest},
};
use crate::models::users::entities::User;
use crate::storage::Storage;

pub struct GroupService {
    storage: Option<Arc<dyn Storage>>,
}

impl GroupService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 在课程下创建分组
    pub async fn create_group(
        &self,
        course_id: i64,
        group_data: CreateGroupRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_group(self, course_id, group_data, request).await
    }

    // 获取课程的分组列表
    pub async fn list_groups(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_groups(self, course_id, request).await
    }

    // 添加分组成员
    pub async fn add_member(
        &self,
        group_id: i64,
        member: AddGroupMemberRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        members::add_member(self, group_id, member, request).await
    }

    // 移除分组成员
    pub async fn remove_member(
        &self,
        group_id: i64,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        members::remove_member(self, group_id, user_id, request).await
    }
}

/// 加载分组及其课程，并确认调用者可管理该课程
pub(crate) async fn load_managed_group(
    storage: &Arc<dyn Storage>,
    user: &User,
    group_id: i64,
) -> Result<(Group, Course)> {
    let group = storage
        .get_group_by_id(group_id)
        .await?
        .ok_or_else(|| QuizHubError::not_found(format!("Group {group_id} not found")))?;
    let course = super::access::load_course(storage, group.course_id).await?;
    super::access::ensure_course_staff(user, &course)?;
    Ok((group, course))
}
