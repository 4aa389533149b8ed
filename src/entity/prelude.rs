//! 预导入模块，方便使用

pub use super::course_groups::{
    ActiveModel as CourseGroupActiveModel, Entity as CourseGroups, Model as CourseGroupModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::group_members::{
    ActiveModel as GroupMemberActiveModel, Entity as GroupMembers, Model as GroupMemberModel,
};
pub use super::notifications::{
    ActiveModel as NotificationActiveModel, Entity as Notifications, Model as NotificationModel,
};
pub use super::question_options::{
    ActiveModel as QuestionOptionActiveModel, Entity as QuestionOptions,
    Model as QuestionOptionModel,
};
pub use super::questions::{
    ActiveModel as QuestionActiveModel, Entity as Questions, Model as QuestionModel,
};
pub use super::quiz_answers::{
    ActiveModel as QuizAnswerActiveModel, Entity as QuizAnswers, Model as QuizAnswerModel,
};
pub use super::quiz_groups::{
    ActiveModel as QuizGroupActiveModel, Entity as QuizGroups, Model as QuizGroupModel,
};
pub use super::quiz_submissions::{
    ActiveModel as QuizSubmissionActiveModel, Entity as QuizSubmissions,
    Model as QuizSubmissionModel,
};
pub use super::quizzes::{ActiveModel as QuizActiveModel, Entity as Quizzes, Model as QuizModel};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
