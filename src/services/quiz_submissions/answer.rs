use std::collections::HashSet;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{QuizSubmissionService, grading, load_owned_submission};
use crate::errors::{QuizHubError, Result};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    questions::entities::{Question, QuestionType},
    quiz_submissions::{
        entities::{QuizAnswer, QuizSubmission, SubmissionStatus},
        requests::{MultipleChoiceAnswerRequest, ShortAnswerRequest},
        responses::AnswerResponse,
    },
};
use crate::services::access::load_quiz;
use crate::storage::{AnswerPayload, Storage};
use crate::utils::Validate;

pub async fn answer_multiple_choice(
    service: &QuizSubmissionService,
    answer_data: MultipleChoiceAnswerRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let (submission, question) = load_answer_target(
        &storage,
        request,
        answer_data.submission_id,
        answer_data.question_id,
        QuestionType::MultipleChoice,
    )
    .await?;

    let selection = answer_data.normalized_selection();
    let option_ids: HashSet<i64> = question.options.iter().map(|o| o.id).collect();
    if let Some(unknown) = selection.iter().find(|id| !option_ids.contains(id)) {
        return Err(QuizHubError::bad_request(format!(
            "Option {unknown} does not belong to question {}",
            question.id
        ))
        .into());
    }

    let response = save_answer(
        &storage,
        &submission,
        question.id,
        AnswerPayload::Choice(selection),
    )
    .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Answer saved")))
}

pub async fn answer_short_answer(
    service: &QuizSubmissionService,
    answer_data: ShortAnswerRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    answer_data.validate()?;

    let storage = service.get_storage(request)?;
    let (submission, question) = load_answer_target(
        &storage,
        request,
        answer_data.submission_id,
        answer_data.question_id,
        QuestionType::ShortAnswer,
    )
    .await?;

    let response = save_answer(
        &storage,
        &submission,
        question.id,
        AnswerPayload::Text(answer_data.text_answer),
    )
    .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Answer saved")))
}

/// 校验作答归属、可编辑性以及题目类型
async fn load_answer_target(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
    submission_id: i64,
    question_id: i64,
    expected_type: QuestionType,
) -> Result<(QuizSubmission, Question)> {
    let user = RequireJWT::current_user(request)?;
    let submission = load_owned_submission(storage, &user, submission_id).await?;

    let question = storage
        .get_question_by_id(question_id)
        .await?
        .filter(|q| q.quiz_id == submission.quiz_id)
        .ok_or_else(|| {
            QuizHubError::not_found(format!(
                "Question {question_id} not found in this submission's quiz"
            ))
        })?;

    let quiz = load_quiz(storage, submission.quiz_id).await?;
    if !grading::is_editable(&submission, &quiz, chrono::Utc::now()) {
        return Err(QuizHubError::bad_request(
            "Submission can no longer be edited",
        ));
    }

    if question.question_type != expected_type {
        return Err(QuizHubError::bad_request(format!(
            "Question {} is not a {} question",
            question.id, expected_type
        )));
    }

    Ok((submission, question))
}

/// 写入答案，已提交的作答在同一事务中重新评分
async fn save_answer(
    storage: &Arc<dyn Storage>,
    submission: &QuizSubmission,
    question_id: i64,
    payload: AnswerPayload,
) -> Result<AnswerResponse> {
    if submission.status == SubmissionStatus::InProgress {
        let answer = storage
            .upsert_answer(submission.id, question_id, payload)
            .await?;
        return Ok(AnswerResponse {
            answer,
            regraded: false,
        });
    }

    let questions = storage.list_questions(submission.quiz_id).await?;
    let regrade = |answers: &[QuizAnswer]| grading::grade_submission(&questions, answers);

    let (answer, regraded) = storage
        .save_answer_and_regrade(submission.id, question_id, payload, &regrade)
        .await?
        .ok_or_else(|| {
            QuizHubError::bad_request(format!(
                "Submission {} can no longer be edited",
                submission.id
            ))
        })?;
    info!(
        "Submission {} regraded after edit, new score {:?}",
        submission.id, regraded.score
    );

    Ok(AnswerResponse {
        answer,
        regraded: true,
    })
}
