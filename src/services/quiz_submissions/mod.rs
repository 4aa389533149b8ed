pub mod answer;
pub mod current;
pub mod grading;
pub mod list;
pub mod release;
pub mod results;
pub mod start;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{QuizHubError, Result};
use crate::models::quiz_submissions::{
    entities::QuizSubmission,
    requests::{
        MultipleChoiceAnswerRequest, ShortAnswerRequest, StartSubmissionRequest, SubmitQuizRequest,
    },
};
use crate::models::users::entities::User;
use crate::storage::Storage;

pub struct QuizSubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl QuizSubmissionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 开始作答
    pub async fn start(
        &self,
        start_data: StartSubmissionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        start::start_submission(self, start_data, request).await
    }

    // 获取进行中的作答
    pub async fn current(&self, quiz_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        current::get_current_submission(self, quiz_id, request).await
    }

    // 保存选择题答案
    pub async fn answer_multiple_choice(
        &self,
        answer_data: MultipleChoiceAnswerRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        answer::answer_multiple_choice(self, answer_data, request).await
    }

    // 保存简答题答案
    pub async fn answer_short_answer(
        &self,
        answer_data: ShortAnswerRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        answer::answer_short_answer(self, answer_data, request).await
    }

    // 提交并评分
    pub async fn submit(
        &self,
        submit_data: SubmitQuizRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_quiz(self, submit_data, request).await
    }

    // 查看成绩
    pub async fn results(
        &self,
        submission_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        results::get_submission_results(self, submission_id, request).await
    }

    // 发布成绩
    pub async fn release_results(
        &self,
        quiz_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        release::release_results(self, quiz_id, request).await
    }

    // 我的作答列表
    pub async fn list_my(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_my_submissions(self, request).await
    }

    // 测验的作答列表
    pub async fn list_for_quiz(
        &self,
        quiz_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_quiz_submissions(self, quiz_id, request).await
    }
}

/// 加载作答并确认属于当前学生
pub(crate) async fn load_owned_submission(
    storage: &Arc<dyn Storage>,
    user: &User,
    submission_id: i64,
) -> Result<QuizSubmission> {
    let submission = storage
        .get_submission_by_id(submission_id)
        .await?
        .ok_or_else(|| QuizHubError::not_found(format!("Submission {submission_id} not found")))?;

    if submission.student_id != user.id {
        return Err(QuizHubError::authorization(
            "You do not own this submission",
        ));
    }
    Ok(submission)
}
