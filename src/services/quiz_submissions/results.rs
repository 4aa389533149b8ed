use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::QuizSubmissionService;
use crate::config::AppConfig;
use crate::errors::QuizHubError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    quiz_submissions::{
        entities::SubmissionStatus,
        responses::{QuestionResult, SubmissionResultsResponse},
    },
};
use crate::services::access::{can_manage_course, load_course, load_quiz};

pub async fn get_submission_results(
    service: &QuizSubmissionService,
    submission_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    let storage = service.get_storage(request)?;

    let submission = storage
        .get_submission_by_id(submission_id)
        .await?
        .ok_or_else(|| QuizHubError::not_found(format!("Submission {submission_id} not found")))?;
    let quiz = load_quiz(&storage, submission.quiz_id).await?;
    let course = load_course(&storage, quiz.course_id).await?;

    let is_staff = can_manage_course(&user, &course);
    let is_owner = submission.student_id == user.id;
    if !is_staff && !is_owner {
        return Err(QuizHubError::authorization("You cannot view this submission").into());
    }

    if submission.status != SubmissionStatus::Graded {
        return Err(QuizHubError::bad_request("Submission has not been graded yet").into());
    }
    // 教师始终可见，学生需即时公布或已发布成绩
    if !is_staff && !quiz.results_visible_to_student() {
        return Err(QuizHubError::bad_request("Results have not been released yet").into());
    }

    let questions = storage.list_questions(quiz.id).await?;
    let answers: HashMap<i64, _> = storage
        .list_answers(submission.id)
        .await?
        .into_iter()
        .map(|a| (a.question_id, a))
        .collect();

    let questions = questions
        .into_iter()
        .map(|q| {
            let answer = answers.get(&q.id);
            QuestionResult {
                question_id: q.id,
                position: q.position,
                correct_option_ids: q.correct_option_ids(),
                points_awarded: answer.and_then(|a| a.points_awarded).unwrap_or(0.0),
                is_correct: answer.and_then(|a| a.is_correct),
                selected_option_ids: answer
                    .map(|a| a.selected_option_ids.clone())
                    .unwrap_or_default(),
                text_answer: answer.and_then(|a| a.text_answer.clone()),
                text: q.text,
                question_type: q.question_type,
                points: q.points,
                expected_answer: q.expected_answer,
            }
        })
        .collect();

    let percentage = submission.percentage.unwrap_or(0.0);
    let response = SubmissionResultsResponse {
        submission_id: submission.id,
        quiz_id: quiz.id,
        student_id: submission.student_id,
        score: submission.score.unwrap_or(0.0),
        max_score: submission.max_score.unwrap_or(0.0),
        percentage,
        passed: percentage >= AppConfig::get().quiz.pass_percentage,
        needs_review: submission.needs_review,
        graded_at: submission.graded_at,
        questions,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "查询成功")))
}
