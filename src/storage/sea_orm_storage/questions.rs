//! 题目与选项存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::question_options::{
    ActiveModel as OptionActiveModel, Column as OptionColumn, Entity as QuestionOptions,
};
use crate::entity::questions::{ActiveModel, Column, Entity as Questions};
use crate::errors::{QuizHubError, Result};
use crate::models::questions::{
    entities::{Question, QuestionOption, QuestionType},
    requests::{OptionRequest, QuestionRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

/// 按顺序写入选项，位置从 1 开始
async fn insert_options<C: ConnectionTrait>(
    conn: &C,
    question_id: i64,
    options: Vec<OptionRequest>,
) -> Result<Vec<QuestionOption>> {
    let mut inserted = Vec::with_capacity(options.len());
    for (idx, option) in options.into_iter().enumerate() {
        let model = OptionActiveModel {
            question_id: Set(question_id),
            position: Set(idx as i32 + 1),
            text: Set(option.text.trim().to_string()),
            is_correct: Set(option.is_correct),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| QuizHubError::database_operation(format!("写入选项失败: {e}")))?;

        inserted.push(model.into_option());
    }
    Ok(inserted)
}

type QuestionParts = (String, f64, QuestionType, Option<String>, Vec<OptionRequest>);

/// 只有简答题保留参考答案（空白视为无），只有选择题保留选项
fn split_request(req: QuestionRequest) -> QuestionParts {
    match req.question_type {
        QuestionType::MultipleChoice => (
            req.text.trim().to_string(),
            req.points,
            req.question_type,
            None,
            req.options,
        ),
        QuestionType::ShortAnswer => (
            req.text.trim().to_string(),
            req.points,
            req.question_type,
            req.expected_answer
                .map(|answer| answer.trim().to_string())
                .filter(|answer| !answer.is_empty()),
            Vec::new(),
        ),
    }
}

impl SeaOrmStorage {
    /// 追加题目，位置为当前题目数 + 1
    pub async fn add_question_impl(&self, quiz_id: i64, req: QuestionRequest) -> Result<Question> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| QuizHubError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = Questions::find()
            .filter(Column::QuizId.eq(quiz_id))
            .count(&txn)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("统计题目数量失败: {e}")))?;

        let now = chrono::Utc::now().timestamp();
        let (text, points, question_type, expected_answer, options) = split_request(req);

        let question = ActiveModel {
            quiz_id: Set(quiz_id),
            position: Set(existing as i32 + 1),
            text: Set(text),
            points: Set(points),
            question_type: Set(question_type.to_string()),
            expected_answer: Set(expected_answer),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| QuizHubError::database_operation(format!("创建题目失败: {e}")))?;

        let options = insert_options(&txn, question.id, options).await?;

        txn.commit()
            .await
            .map_err(|e| QuizHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(question.into_question(options))
    }

    /// 整体替换题目内容与选项，位置不变
    pub async fn update_question_impl(
        &self,
        question_id: i64,
        req: QuestionRequest,
    ) -> Result<Option<Question>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| QuizHubError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = Questions::find_by_id(question_id)
            .one(&txn)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询题目失败: {e}")))?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let (text, points, question_type, expected_answer, options) = split_request(req);

        let mut model: ActiveModel = existing.into();
        model.text = Set(text);
        model.points = Set(points);
        model.question_type = Set(question_type.to_string());
        model.expected_answer = Set(expected_answer);
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let question = model
            .update(&txn)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("更新题目失败: {e}")))?;

        QuestionOptions::delete_many()
            .filter(OptionColumn::QuestionId.eq(question_id))
            .exec(&txn)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("删除选项失败: {e}")))?;

        let options = insert_options(&txn, question_id, options).await?;

        txn.commit()
            .await
            .map_err(|e| QuizHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(question.into_question(options)))
    }

    /// 删除题目，其后的题目位置依次前移
    pub async fn delete_question_impl(&self, question_id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| QuizHubError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = Questions::find_by_id(question_id)
            .one(&txn)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询题目失败: {e}")))?;

        let Some(existing) = existing else {
            return Ok(false);
        };

        QuestionOptions::delete_many()
            .filter(OptionColumn::QuestionId.eq(question_id))
            .exec(&txn)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("删除选项失败: {e}")))?;

        Questions::delete_by_id(question_id)
            .exec(&txn)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("删除题目失败: {e}")))?;

        let remaining = Questions::find()
            .filter(Column::QuizId.eq(existing.quiz_id))
            .order_by_asc(Column::Position)
            .order_by_asc(Column::Id)
            .all(&txn)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询题目失败: {e}")))?;

        for (idx, question) in remaining.into_iter().enumerate() {
            let position = idx as i32 + 1;
            if question.position == position {
                continue;
            }
            let mut model: ActiveModel = question.into();
            model.position = Set(position);
            model
                .update(&txn)
                .await
                .map_err(|e| QuizHubError::database_operation(format!("调整题目位置失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| QuizHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(true)
    }

    pub async fn get_question_by_id_impl(&self, question_id: i64) -> Result<Option<Question>> {
        let question = Questions::find_by_id(question_id)
            .one(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询题目失败: {e}")))?;

        let Some(question) = question else {
            return Ok(None);
        };

        let options = QuestionOptions::find()
            .filter(OptionColumn::QuestionId.eq(question_id))
            .order_by_asc(OptionColumn::Position)
            .all(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询选项失败: {e}")))?
            .into_iter()
            .map(|m| m.into_option())
            .collect();

        Ok(Some(question.into_question(options)))
    }

    /// 按位置列出测验的全部题目（含选项）
    pub async fn list_questions_impl(&self, quiz_id: i64) -> Result<Vec<Question>> {
        let questions = Questions::find()
            .filter(Column::QuizId.eq(quiz_id))
            .order_by_asc(Column::Position)
            .all(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询题目列表失败: {e}")))?;

        if questions.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = questions.iter().map(|q| q.id).collect();
        let options = QuestionOptions::find()
            .filter(OptionColumn::QuestionId.is_in(ids))
            .order_by_asc(OptionColumn::QuestionId)
            .order_by_asc(OptionColumn::Position)
            .all(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询选项失败: {e}")))?;

        let mut by_question: HashMap<i64, Vec<QuestionOption>> = HashMap::new();
        for option in options {
            by_question
                .entry(option.question_id)
                .or_default()
                .push(option.into_option());
        }

        Ok(questions
            .into_iter()
            .map(|q| {
                let options = by_question.remove(&q.id).unwrap_or_default();
                q.into_question(options)
            })
            .collect())
    }

    pub async fn count_questions_impl(&self, quiz_id: i64) -> Result<i64> {
        let count = Questions::find()
            .filter(Column::QuizId.eq(quiz_id))
            .count(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("统计题目数量失败: {e}")))?;

        Ok(count as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support;
    use crate::models::questions::entities::QuestionType;
    use crate::models::questions::requests::QuestionRequest;
    use crate::models::quizzes::requests::CreateQuizRequest;
    use crate::models::users::entities::UserRole;

    async fn quiz_id(storage: &super::SeaOrmStorage) -> i64 {
        let teacher = test_support::user(storage, "teacher01", UserRole::Instructor).await;
        let course = test_support::course(storage, "CS101", teacher.id).await;
        storage
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
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_positions_stay_dense() {
        let storage = test_support::storage().await;
        let quiz_id = quiz_id(&storage).await;

        let mut ids = Vec::new();
        for text in ["Q1", "Q2", "Q3"] {
            let q = storage
                .add_question_impl(quiz_id, test_support::mc_question(text, &[("A", true)]))
                .await
                .unwrap();
            ids.push(q.id);
        }

        let positions: Vec<i32> = storage
            .list_questions_impl(quiz_id)
            .await
            .unwrap()
            .iter()
            .map(|q| q.position)
            .collect();
        assert_eq!(positions, vec![1, 2, 3]);

        assert!(storage.delete_question_impl(ids[0]).await.unwrap());
        let remaining = storage.list_questions_impl(quiz_id).await.unwrap();
        assert_eq!(
            remaining.iter().map(|q| (q.text.as_str(), q.position)).collect::<Vec<_>>(),
            vec![("Q2", 1), ("Q3", 2)]
        );
        assert!(!storage.delete_question_impl(ids[0]).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_replaces_options() {
        let storage = test_support::storage().await;
        let quiz_id = quiz_id(&storage).await;

        let q = storage
            .add_question_impl(
                quiz_id,
                test_support::mc_question("Pick", &[("A", true), ("B", false)]),
            )
            .await
            .unwrap();
        assert_eq!(q.options.len(), 2);
        assert_eq!(q.options[1].position, 2);

        let updated = storage
            .update_question_impl(
                q.id,
                QuestionRequest {
                    text: "Explain".to_string(),
                    points: 2.5,
                    question_type: QuestionType::ShortAnswer,
                    expected_answer: Some("Ownership".to_string()),
                    options: Vec::new(),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.position, 1);
        assert_eq!(updated.question_type, QuestionType::ShortAnswer);
        assert!(updated.options.is_empty());

        let reloaded = storage.get_question_by_id_impl(q.id).await.unwrap().unwrap();
        assert_eq!(reloaded.expected_answer.as_deref(), Some("Ownership"));
        assert!(reloaded.options.is_empty());
        assert_eq!(storage.count_questions_impl(quiz_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_blank_expected_answer_is_stored_as_none() {
        let storage = test_support::storage().await;
        let quiz_id = quiz_id(&storage).await;

        let q = storage
            .add_question_impl(
                quiz_id,
                QuestionRequest {
                    text: "Explain".to_string(),
                    points: 1.0,
                    question_type: QuestionType::ShortAnswer,
                    expected_answer: Some("   ".to_string()),
                    options: Vec::new(),
                },
            )
            .await
            .unwrap();
        assert!(q.expected_answer.is_none());

        let updated = storage
            .update_question_impl(
                q.id,
                QuestionRequest {
                    text: "Explain".to_string(),
                    points: 1.0,
                    question_type: QuestionType::ShortAnswer,
                    expected_answer: Some("  Lifetimes ".to_string()),
                    options: Vec::new(),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.expected_answer.as_deref(), Some("Lifetimes"));
    }
}
