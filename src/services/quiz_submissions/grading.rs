//! 自动评分
//!
//! 纯函数，不访问存储。选择题按集合相等判分，简答题在有参考答案时做
//! 忽略大小写与首尾空白的比较，否则留待人工复核。

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};

use crate::models::questions::entities::{Question, QuestionType};
use crate::models::quiz_submissions::entities::{
    AnswerGrade, GradingOutcome, QuizAnswer, QuizSubmission, SubmissionStatus,
};
use crate::models::quizzes::entities::Quiz;

/// 单题评分，`answer` 为 None 表示未作答
pub fn grade_question(question: &Question, answer: Option<&QuizAnswer>) -> AnswerGrade {
    let is_correct = match question.question_type {
        QuestionType::MultipleChoice => {
            let selected: BTreeSet<i64> = answer
                .map(|a| a.selected_option_ids.iter().copied().collect())
                .unwrap_or_default();
            let correct: BTreeSet<i64> = question.correct_option_ids().into_iter().collect();
            Some(selected == correct)
        }
        // 空白参考答案视为没有参考答案
        QuestionType::ShortAnswer => question
            .expected_answer
            .as_deref()
            .map(str::trim)
            .filter(|expected| !expected.is_empty())
            .map(|expected| {
                let given = answer
                    .and_then(|a| a.text_answer.as_deref())
                    .unwrap_or_default();
                given.trim().to_lowercase() == expected.to_lowercase()
            }),
    };

    AnswerGrade {
        question_id: question.id,
        is_correct,
        points_awarded: if is_correct == Some(true) {
            question.points
        } else {
            0.0
        },
    }
}

/// 整份作答评分
pub fn grade_submission(questions: &[Question], answers: &[QuizAnswer]) -> GradingOutcome {
    let by_question: HashMap<i64, &QuizAnswer> =
        answers.iter().map(|a| (a.question_id, a)).collect();

    let mut grades = Vec::with_capacity(questions.len());
    let mut score = 0.0;
    let mut max_score = 0.0;
    let mut needs_review = false;

    for question in questions {
        let answer = by_question.get(&question.id).copied();
        let grade = grade_question(question, answer);

        // 有作答但无参考答案的简答题需要人工复核
        if grade.is_correct.is_none() && answer.is_some() {
            needs_review = true;
        }

        score += grade.points_awarded;
        max_score += question.points;
        grades.push(grade);
    }

    GradingOutcome {
        answers: grades,
        score,
        max_score,
        percentage: percentage(score, max_score),
        needs_review,
    }
}

pub fn percentage(score: f64, max_score: f64) -> f64 {
    if max_score > 0.0 {
        score / max_score * 100.0
    } else {
        0.0
    }
}

/// 作答能否继续修改
///
/// 作答中总是可改；已提交的作答需要测验允许提交后修改、仍在开放窗口内且成绩未发布。
pub fn is_editable(submission: &QuizSubmission, quiz: &Quiz, now: DateTime<Utc>) -> bool {
    match submission.status {
        SubmissionStatus::InProgress => true,
        SubmissionStatus::Submitted | SubmissionStatus::Graded => {
            quiz.allow_edit_after_submission && quiz.is_open_at(now) && !quiz.results_released
        }
    }
}
