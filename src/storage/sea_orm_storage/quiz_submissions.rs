//! 作答与答案存储操作

use super::SeaOrmStorage;
use super::notifications::notification_active_model;
use crate::entity::quiz_answers::{
    ActiveModel as AnswerActiveModel, Column as AnswerColumn, Entity as QuizAnswers,
};
use crate::entity::quiz_submissions::{ActiveModel, Column, Entity as QuizSubmissions};
use crate::errors::{QuizHubError, Result};
use crate::models::notifications::requests::CreateNotificationRequest;
use crate::models::quiz_submissions::entities::{
    GradingOutcome, QuizAnswer, QuizSubmission, SubmissionStatus,
};
use crate::storage::AnswerPayload;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};

/// 在给定连接（或事务）上写入答案
async fn upsert_answer_in<C: ConnectionTrait>(
    conn: &C,
    submission_id: i64,
    question_id: i64,
    payload: AnswerPayload,
) -> Result<QuizAnswer> {
    let (selected, text) = match payload {
        AnswerPayload::Choice(ids) => {
            let json = serde_json::to_string(&ids)
                .map_err(|e| QuizHubError::serialization(format!("选项序列化失败: {e}")))?;
            (Some(json), None)
        }
        AnswerPayload::Text(text) => (None, Some(text)),
    };
    let now = chrono::Utc::now().timestamp();

    let existing = QuizAnswers::find()
        .filter(AnswerColumn::SubmissionId.eq(submission_id))
        .filter(AnswerColumn::QuestionId.eq(question_id))
        .one(conn)
        .await
        .map_err(|e| QuizHubError::database_operation(format!("查询答案失败: {e}")))?;

    let result = match existing {
        Some(existing) => {
            let mut model: AnswerActiveModel = existing.into();
            model.selected_option_ids = Set(selected);
            model.text_answer = Set(text);
            model.is_correct = Set(None);
            model.points_awarded = Set(None);
            model.updated_at = Set(now);
            model.update(conn).await
        }
        None => {
            AnswerActiveModel {
                submission_id: Set(submission_id),
                question_id: Set(question_id),
                selected_option_ids: Set(selected),
                text_answer: Set(text),
                is_correct: Set(None),
                points_awarded: Set(None),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(conn)
            .await
        }
    }
    .map_err(|e| QuizHubError::database_operation(format!("保存答案失败: {e}")))?;

    Ok(result.into_answer())
}

/// 写入每道题的评分，未作答的题目没有答案行，其得分只体现在总分中
async fn write_answer_grades<C: ConnectionTrait>(
    conn: &C,
    submission_id: i64,
    outcome: &GradingOutcome,
) -> Result<()> {
    for grade in &outcome.answers {
        QuizAnswers::update_many()
            .col_expr(AnswerColumn::IsCorrect, Expr::value(grade.is_correct))
            .col_expr(AnswerColumn::PointsAwarded, Expr::value(grade.points_awarded))
            .filter(AnswerColumn::SubmissionId.eq(submission_id))
            .filter(AnswerColumn::QuestionId.eq(grade.question_id))
            .exec(conn)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("写入评分失败: {e}")))?;
    }
    Ok(())
}

async fn list_answers_in<C: ConnectionTrait>(
    conn: &C,
    submission_id: i64,
) -> Result<Vec<QuizAnswer>> {
    let result = QuizAnswers::find()
        .filter(AnswerColumn::SubmissionId.eq(submission_id))
        .order_by_asc(AnswerColumn::QuestionId)
        .all(conn)
        .await
        .map_err(|e| QuizHubError::database_operation(format!("查询答案失败: {e}")))?;

    Ok(result.into_iter().map(|m| m.into_answer()).collect())
}

impl SeaOrmStorage {
    /// 开始作答
    pub async fn create_submission_impl(
        &self,
        quiz_id: i64,
        student_id: i64,
    ) -> Result<QuizSubmission> {
        let model = ActiveModel {
            quiz_id: Set(quiz_id),
            student_id: Set(student_id),
            status: Set(SubmissionStatus::InProgress.to_string()),
            started_at: Set(chrono::Utc::now().timestamp()),
            submitted_at: Set(None),
            graded_at: Set(None),
            score: Set(None),
            max_score: Set(None),
            percentage: Set(None),
            needs_review: Set(false),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("创建作答失败: {e}")))?;

        Ok(result.into_submission())
    }

    pub async fn get_submission_by_id_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<QuizSubmission>> {
        let result = QuizSubmissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询作答失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 查找学生在该测验下仍在作答中的记录
    pub async fn find_in_progress_submission_impl(
        &self,
        quiz_id: i64,
        student_id: i64,
    ) -> Result<Option<QuizSubmission>> {
        let result = QuizSubmissions::find()
            .filter(Column::QuizId.eq(quiz_id))
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::Status.eq(SubmissionStatus::InProgress.to_string()))
            .order_by_desc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询作答失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn list_submissions_by_student_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<QuizSubmission>> {
        let result = QuizSubmissions::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::StartedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询作答列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_submission()).collect())
    }

    pub async fn list_submissions_by_quiz_impl(&self, quiz_id: i64) -> Result<Vec<QuizSubmission>> {
        let result = QuizSubmissions::find()
            .filter(Column::QuizId.eq(quiz_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询作答列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_submission()).collect())
    }

    pub async fn count_submissions_for_quiz_impl(&self, quiz_id: i64) -> Result<i64> {
        let count = QuizSubmissions::find()
            .filter(Column::QuizId.eq(quiz_id))
            .count(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("统计作答数量失败: {e}")))?;

        Ok(count as i64)
    }

    /// 写入答案，每道题只保留一条，评分字段清空
    pub async fn upsert_answer_impl(
        &self,
        submission_id: i64,
        question_id: i64,
        payload: AnswerPayload,
    ) -> Result<QuizAnswer> {
        upsert_answer_in(&self.db, submission_id, question_id, payload).await
    }

    pub async fn list_answers_impl(&self, submission_id: i64) -> Result<Vec<QuizAnswer>> {
        list_answers_in(&self.db, submission_id).await
    }

    /// 测验下所有作答的答案
    pub async fn list_answers_for_quiz_impl(&self, quiz_id: i64) -> Result<Vec<QuizAnswer>> {
        let submission_ids: Vec<i64> = QuizSubmissions::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::QuizId.eq(quiz_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询作答失败: {e}")))?;

        if submission_ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = QuizAnswers::find()
            .filter(AnswerColumn::SubmissionId.is_in(submission_ids))
            .order_by_asc(AnswerColumn::SubmissionId)
            .order_by_asc(AnswerColumn::QuestionId)
            .all(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询答案失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_answer()).collect())
    }

    /// 提交：写入评分结果并置为 Graded（同一事务）
    ///
    /// 条件更新，作答已不在 InProgress 时返回 None，并发提交只有一个能成功。
    pub async fn finalize_submission_impl(
        &self,
        submission_id: i64,
        outcome: GradingOutcome,
        notification: Option<CreateNotificationRequest>,
    ) -> Result<Option<QuizSubmission>> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| QuizHubError::database_operation(format!("开启事务失败: {e}")))?;

        let result = QuizSubmissions::update_many()
            .col_expr(Column::Status, Expr::value(SubmissionStatus::Graded.to_string()))
            .col_expr(Column::SubmittedAt, Expr::value(now))
            .col_expr(Column::GradedAt, Expr::value(now))
            .col_expr(Column::Score, Expr::value(outcome.score))
            .col_expr(Column::MaxScore, Expr::value(outcome.max_score))
            .col_expr(Column::Percentage, Expr::value(outcome.percentage))
            .col_expr(Column::NeedsReview, Expr::value(outcome.needs_review))
            .filter(Column::Id.eq(submission_id))
            .filter(Column::Status.eq(SubmissionStatus::InProgress.to_string()))
            .exec(&txn)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("更新作答状态失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        write_answer_grades(&txn, submission_id, &outcome).await?;

        if let Some(req) = notification {
            notification_active_model(req)
                .insert(&txn)
                .await
                .map_err(|e| QuizHubError::database_operation(format!("创建通知失败: {e}")))?;
        }

        let submission = QuizSubmissions::find_by_id(submission_id)
            .one(&txn)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询作答失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| QuizHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(submission.map(|m| m.into_submission()))
    }

    /// 修改已提交作答的答案并立即重新评分（同一事务）
    ///
    /// `regrade` 基于事务内最新的全部答案计算评分；作答仍在 InProgress 或不存在时返回 None。
    pub async fn save_answer_and_regrade_impl(
        &self,
        submission_id: i64,
        question_id: i64,
        payload: AnswerPayload,
        regrade: &(dyn Fn(&[QuizAnswer]) -> GradingOutcome + Sync),
    ) -> Result<Option<(QuizAnswer, QuizSubmission)>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| QuizHubError::database_operation(format!("开启事务失败: {e}")))?;

        let submitted = QuizSubmissions::find_by_id(submission_id)
            .filter(Column::Status.ne(SubmissionStatus::InProgress.to_string()))
            .one(&txn)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询作答失败: {e}")))?;
        if submitted.is_none() {
            return Ok(None);
        }

        let saved = upsert_answer_in(&txn, submission_id, question_id, payload).await?;
        let answers = list_answers_in(&txn, submission_id).await?;
        let outcome = regrade(&answers);

        QuizSubmissions::update_many()
            .col_expr(Column::Status, Expr::value(SubmissionStatus::Graded.to_string()))
            .col_expr(Column::GradedAt, Expr::value(chrono::Utc::now().timestamp()))
            .col_expr(Column::Score, Expr::value(outcome.score))
            .col_expr(Column::MaxScore, Expr::value(outcome.max_score))
            .col_expr(Column::Percentage, Expr::value(outcome.percentage))
            .col_expr(Column::NeedsReview, Expr::value(outcome.needs_review))
            .filter(Column::Id.eq(submission_id))
            .exec(&txn)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("更新作答评分失败: {e}")))?;

        write_answer_grades(&txn, submission_id, &outcome).await?;

        let answer = QuizAnswers::find_by_id(saved.id)
            .one(&txn)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询答案失败: {e}")))?
            .map(|m| m.into_answer())
            .unwrap_or(saved);
        let submission = QuizSubmissions::find_by_id(submission_id)
            .one(&txn)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询作答失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| QuizHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(submission.map(|m| (answer, m.into_submission())))
    }
}

#[cfg(test)]
mod tests {
    use super::super::{SeaOrmStorage, test_support};
    use crate::models::quiz_submissions::entities::{
        AnswerGrade, GradingOutcome, SubmissionStatus,
    };
    use crate::models::quizzes::requests::CreateQuizRequest;
    use crate::models::users::entities::UserRole;
    use crate::storage::AnswerPayload;

    async fn setup(storage: &SeaOrmStorage) -> (i64, i64) {
        let teacher = test_support::user(storage, "teacher01", UserRole::Instructor).await;
        let student = test_support::user(storage, "student01", UserRole::Student).await;
        let course = test_support::course(storage, "CS101", teacher.id).await;
        let quiz = storage
            .create_quiz_impl(
                CreateQuizRequest {
                    course_id: course.id,
                    title: "Week 1".to_string(),
                    description: None,
                    available_from: None,
                    available_to: None,
                    shuffle_questions: false,
                    show_results_immediately: false,
                    allow_edit_after_submission: false,
                },
                teacher.id,
            )
            .await
            .unwrap();
        (quiz.id, student.id)
    }

    fn outcome(question_id: i64, correct: bool) -> GradingOutcome {
        let points = if correct { 1.0 } else { 0.0 };
        GradingOutcome {
            answers: vec![AnswerGrade {
                question_id,
                is_correct: Some(correct),
                points_awarded: points,
            }],
            score: points,
            max_score: 1.0,
            percentage: points * 100.0,
            needs_review: false,
        }
    }

    #[tokio::test]
    async fn test_upsert_keeps_one_answer_per_question() {
        let storage = test_support::storage().await;
        let (quiz_id, student_id) = setup(&storage).await;
        let question = storage
            .add_question_impl(quiz_id, test_support::mc_question("Pick", &[("A", true), ("B", false)]))
            .await
            .unwrap();
        let submission = storage.create_submission_impl(quiz_id, student_id).await.unwrap();

        let a = question.options[0].id;
        let b = question.options[1].id;
        storage
            .upsert_answer_impl(submission.id, question.id, AnswerPayload::Choice(vec![b]))
            .await
            .unwrap();
        let answer = storage
            .upsert_answer_impl(submission.id, question.id, AnswerPayload::Choice(vec![a, b]))
            .await
            .unwrap();
        assert_eq!(answer.selected_option_ids, vec![a, b]);
        assert!(answer.is_correct.is_none());

        let answers = storage.list_answers_impl(submission.id).await.unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(storage.list_answers_for_quiz_impl(quiz_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_finalize_only_once_from_in_progress() {
        let storage = test_support::storage().await;
        let (quiz_id, student_id) = setup(&storage).await;
        let question = storage
            .add_question_impl(quiz_id, test_support::mc_question("Pick", &[("A", true)]))
            .await
            .unwrap();
        let submission = storage.create_submission_impl(quiz_id, student_id).await.unwrap();
        assert!(
            storage
                .find_in_progress_submission_impl(quiz_id, student_id)
                .await
                .unwrap()
                .is_some()
        );

        storage
            .upsert_answer_impl(
                submission.id,
                question.id,
                AnswerPayload::Choice(vec![question.options[0].id]),
            )
            .await
            .unwrap();

        let graded = storage
            .finalize_submission_impl(submission.id, outcome(question.id, true), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(graded.status, SubmissionStatus::Graded);
        assert_eq!(graded.score, Some(1.0));
        assert!(graded.submitted_at.is_some());

        let answers = storage.list_answers_impl(submission.id).await.unwrap();
        assert_eq!(answers[0].is_correct, Some(true));
        assert_eq!(answers[0].points_awarded, Some(1.0));

        // 已不在 InProgress，条件更新不生效
        let again = storage
            .finalize_submission_impl(submission.id, outcome(question.id, false), None)
            .await
            .unwrap();
        assert!(again.is_none());

        assert!(
            storage
                .find_in_progress_submission_impl(quiz_id, student_id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_answer_change_and_regrade_commit_together() {
        let storage = test_support::storage().await;
        let (quiz_id, student_id) = setup(&storage).await;
        let question = storage
            .add_question_impl(
                quiz_id,
                test_support::mc_question("Pick", &[("A", true), ("B", false)]),
            )
            .await
            .unwrap();
        let (right, wrong) = (question.options[0].id, question.options[1].id);
        let submission = storage.create_submission_impl(quiz_id, student_id).await.unwrap();

        // 作答中不走重新评分
        let skipped = storage
            .save_answer_and_regrade_impl(
                submission.id,
                question.id,
                AnswerPayload::Choice(vec![wrong]),
                &|_| outcome(question.id, false),
            )
            .await
            .unwrap();
        assert!(skipped.is_none());
        assert!(storage.list_answers_impl(submission.id).await.unwrap().is_empty());

        storage
            .upsert_answer_impl(submission.id, question.id, AnswerPayload::Choice(vec![wrong]))
            .await
            .unwrap();
        storage
            .finalize_submission_impl(submission.id, outcome(question.id, false), None)
            .await
            .unwrap()
            .unwrap();

        // 评分闭包看到的是事务内刚写入的答案
        let (answer, regraded) = storage
            .save_answer_and_regrade_impl(
                submission.id,
                question.id,
                AnswerPayload::Choice(vec![right]),
                &|answers| {
                    let correct = answers[0].selected_option_ids == vec![right];
                    outcome(question.id, correct)
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(answer.selected_option_ids, vec![right]);
        assert_eq!(answer.is_correct, Some(true));
        assert_eq!(answer.points_awarded, Some(1.0));
        assert_eq!(regraded.status, SubmissionStatus::Graded);
        assert_eq!(regraded.score, Some(1.0));

        let stored = storage.get_submission_by_id_impl(submission.id).await.unwrap().unwrap();
        assert_eq!(stored.score, Some(1.0));
        assert_eq!(stored.percentage, Some(100.0));
    }
}
