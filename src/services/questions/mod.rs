pub mod add;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{QuizHubError, Result};
use crate::models::questions::{entities::Question, requests::QuestionRequest};
use crate::storage::Storage;

pub struct QuestionService {
    storage: Option<Arc<dyn Storage>>,
}

impl QuestionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 追加题目
    pub async fn add_question(
        &self,
        quiz_id: i64,
        question: QuestionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        add::add_question(self, quiz_id, question, request).await
    }

    // 更新题目
    pub async fn update_question(
        &self,
        quiz_id: i64,
        question_id: i64,
        question: QuestionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_question(self, quiz_id, question_id, question, request).await
    }

    // 删除题目
    pub async fn delete_question(
        &self,
        quiz_id: i64,
        question_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_question(self, quiz_id, question_id, request).await
    }

    // 题目列表
    pub async fn list_questions(
        &self,
        quiz_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_questions(self, quiz_id, request).await
    }
}

/// 题目必须属于路径中的测验
pub(crate) async fn load_quiz_question(
    storage: &Arc<dyn Storage>,
    quiz_id: i64,
    question_id: i64,
) -> Result<Question> {
    storage
        .get_question_by_id(question_id)
        .await?
        .filter(|q| q.quiz_id == quiz_id)
        .ok_or_else(|| {
            QuizHubError::not_found(format!("Question {question_id} not found in quiz {quiz_id}"))
        })
}
