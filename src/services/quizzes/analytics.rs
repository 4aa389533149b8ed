//! 测验统计
//!
//! 每次请求时根据作答记录现场计算，不做持久化。

use std::collections::{HashMap, HashSet};

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::QuizService;
use crate::config::AppConfig;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    analytics::responses::{QuestionAnalytics, QuizAnalytics, ScoreDistribution},
    questions::entities::Question,
    quiz_submissions::entities::{QuizAnswer, QuizSubmission, SubmissionStatus},
};
use crate::services::access::load_managed_quiz;

pub async fn get_quiz_analytics(
    service: &QuizService,
    quiz_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = RequireJWT::current_user(request)?;
    let storage = service.get_storage(request)?;
    let (quiz, _) = load_managed_quiz(&storage, &user, quiz_id).await?;

    let questions = storage.list_questions(quiz.id).await?;
    let submissions = storage.list_submissions_by_quiz(quiz.id).await?;
    let answers = storage.list_answers_for_quiz(quiz.id).await?;

    let analytics = compute_analytics(
        quiz.id,
        &questions,
        &submissions,
        &answers,
        AppConfig::get().quiz.pass_percentage,
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(analytics, "查询成功")))
}

/// 汇总作答数据
///
/// 单题统计只计入已评分作答中的答案，`is_correct` 为空的答案算作已答但不算正确。
pub fn compute_analytics(
    quiz_id: i64,
    questions: &[Question],
    submissions: &[QuizSubmission],
    answers: &[QuizAnswer],
    pass_percentage: f64,
) -> QuizAnalytics {
    let total = submissions.len() as i64;
    let graded: Vec<f64> = submissions
        .iter()
        .filter(|s| s.status == SubmissionStatus::Graded)
        .map(|s| s.percentage.unwrap_or(0.0))
        .collect();
    let finished = submissions
        .iter()
        .filter(|s| s.status != SubmissionStatus::InProgress)
        .count();

    let graded_count = graded.len() as i64;
    let average_score = if graded.is_empty() {
        0.0
    } else {
        graded.iter().sum::<f64>() / graded.len() as f64
    };
    let pass_rate = if graded.is_empty() {
        0.0
    } else {
        graded.iter().filter(|p| **p >= pass_percentage).count() as f64 / graded.len() as f64
    };
    let completion_rate = if total == 0 {
        0.0
    } else {
        finished as f64 / total as f64
    };

    let graded_ids: HashSet<i64> = submissions
        .iter()
        .filter(|s| s.status == SubmissionStatus::Graded)
        .map(|s| s.id)
        .collect();

    // question_id -> (answered, correct)
    let mut tally: HashMap<i64, (i64, i64)> = HashMap::new();
    for answer in answers
        .iter()
        .filter(|a| graded_ids.contains(&a.submission_id))
    {
        let entry = tally.entry(answer.question_id).or_default();
        entry.0 += 1;
        if answer.is_correct == Some(true) {
            entry.1 += 1;
        }
    }

    let questions = questions
        .iter()
        .map(|q| {
            let (answered_count, correct_count) = tally.get(&q.id).copied().unwrap_or_default();
            QuestionAnalytics {
                question_id: q.id,
                position: q.position,
                text: q.text.clone(),
                answered_count,
                correct_count,
                success_rate: if answered_count == 0 {
                    0.0
                } else {
                    correct_count as f64 / answered_count as f64
                },
            }
        })
        .collect();

    let mut score_distribution = ScoreDistribution::default();
    for percentage in &graded {
        match *percentage {
            p if p >= 90.0 => score_distribution.a += 1,
            p if p >= 80.0 => score_distribution.b += 1,
            p if p >= 70.0 => score_distribution.c += 1,
            p if p >= 60.0 => score_distribution.d += 1,
            _ => score_distribution.f += 1,
        }
    }

    QuizAnalytics {
        quiz_id,
        total_submissions: total,
        graded_submissions: graded_count,
        average_score,
        pass_rate,
        completion_rate,
        questions,
        score_distribution,
    }
}
