use serde::Serialize;
use ts_rs::TS;

// 单题统计
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct QuestionAnalytics {
    pub question_id: i64,
    pub position: i32,
    pub text: String,
    pub answered_count: i64,
    pub correct_count: i64,
    /// correct / answered，未作答时为 0
    pub success_rate: f64,
}

// 分数段分布
#[derive(Debug, Clone, Default, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct ScoreDistribution {
    /// [90, 100]
    pub a: i64,
    /// [80, 90)
    pub b: i64,
    /// [70, 80)
    pub c: i64,
    /// [60, 70)
    pub d: i64,
    /// [0, 60)
    pub f: i64,
}

// 测验统计
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct QuizAnalytics {
    pub quiz_id: i64,
    pub total_submissions: i64,
    pub graded_submissions: i64,
    pub average_score: f64,
    pub pass_rate: f64,
    pub completion_rate: f64,
    pub questions: Vec<QuestionAnalytics>,
    pub score_distribution: ScoreDistribution,
}
