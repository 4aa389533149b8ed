pub mod analytics;
pub mod create;
pub mod delete;
pub mod get;
pub mod groups;
pub mod list;
pub mod status;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::quizzes::requests::{
    AssignGroupsRequest, CreateQuizRequest, QuizListParams, UpdateQuizRequest,
};
use crate::storage::Storage;

pub struct QuizService {
    storage: Option<Arc<dyn Storage>>,
}

impl QuizService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 创建测验
    pub async fn create_quiz(
        &self,
        quiz_data: CreateQuizRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_quiz(self, quiz_data, request).await
    }

    // 更新测验
    pub async fn update_quiz(
        &self,
        quiz_id: i64,
        update_data: UpdateQuizRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_quiz(self, quiz_id, update_data, request).await
    }

    // 获取测验详情
    pub async fn get_quiz(&self, quiz_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_quiz(self, quiz_id, request).await
    }

    // 获取测验列表
    pub async fn list_quizzes(
        &self,
        query: QuizListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_quizzes(self, query, request).await
    }

    // 删除测验
    pub async fn delete_quiz(
        &self,
        quiz_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_quiz(self, quiz_id, request).await
    }

    // 分配分组
    pub async fn assign_groups(
        &self,
        quiz_id: i64,
        assign_data: AssignGroupsRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        groups::assign_groups(self, quiz_id, assign_data, request).await
    }

    // 发布测验
    pub async fn publish_quiz(
        &self,
        quiz_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        status::publish_quiz(self, quiz_id, request).await
    }

    // 归档测验
    pub async fn archive_quiz(
        &self,
        quiz_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        status::archive_quiz(self, quiz_id, request).await
    }

    // 测验统计
    pub async fn get_analytics(
        &self,
        quiz_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        analytics::get_quiz_analytics(self, quiz_id, request).await
    }
}
