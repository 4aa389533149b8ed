use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::DisplayName).string().null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 课程表
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Courses::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Courses::Title).string().not_null())
                    .col(ColumnDef::new(Courses::Description).text().null())
                    .col(ColumnDef::new(Courses::AcademicYear).string().not_null())
                    .col(
                        ColumnDef::new(Courses::InstructorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Courses::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Courses::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::InstructorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 学生分组表
        manager
            .create_table(
                Table::create()
                    .table(CourseGroups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseGroups::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CourseGroups::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CourseGroups::Name).string().not_null())
                    .col(
                        ColumnDef::new(CourseGroups::AcademicYear)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseGroups::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseGroups::Table, CourseGroups::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 分组成员表
        manager
            .create_table(
                Table::create()
                    .table(GroupMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GroupMembers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GroupMembers::GroupId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GroupMembers::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GroupMembers::JoinedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GroupMembers::Table, GroupMembers::GroupId)
                            .to(CourseGroups::Table, CourseGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GroupMembers::Table, GroupMembers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 测验表
        manager
            .create_table(
                Table::create()
                    .table(Quizzes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Quizzes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Quizzes::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(Quizzes::CreatedBy).big_integer().not_null())
                    .col(ColumnDef::new(Quizzes::Title).string().not_null())
                    .col(ColumnDef::new(Quizzes::Description).text().null())
                    .col(ColumnDef::new(Quizzes::AvailableFrom).big_integer().null())
                    .col(ColumnDef::new(Quizzes::AvailableTo).big_integer().null())
                    .col(
                        ColumnDef::new(Quizzes::ShuffleQuestions)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Quizzes::ShowResultsImmediately)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Quizzes::AllowEditAfterSubmission)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Quizzes::Status).string().not_null())
                    .col(
                        ColumnDef::new(Quizzes::ResultsReleased)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Quizzes::ResultsReleasedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Quizzes::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Quizzes::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Quizzes::Table, Quizzes::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Quizzes::Table, Quizzes::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 测验-分组关联表
        manager
            .create_table(
                Table::create()
                    .table(QuizGroups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuizGroups::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(QuizGroups::QuizId).big_integer().not_null())
                    .col(ColumnDef::new(QuizGroups::GroupId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(QuizGroups::Table, QuizGroups::QuizId)
                            .to(Quizzes::Table, Quizzes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(QuizGroups::Table, QuizGroups::GroupId)
                            .to(CourseGroups::Table, CourseGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 题目表
        manager
            .create_table(
                Table::create()
                    .table(Questions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Questions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Questions::QuizId).big_integer().not_null())
                    .col(ColumnDef::new(Questions::Position).integer().not_null())
                    .col(ColumnDef::new(Questions::Text).text().not_null())
                    .col(ColumnDef::new(Questions::Points).double().not_null())
                    .col(ColumnDef::new(Questions::QuestionType).string().not_null())
                    .col(ColumnDef::new(Questions::ExpectedAnswer).text().null())
                    .col(
                        ColumnDef::new(Questions::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Questions::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Questions::Table, Questions::QuizId)
                            .to(Quizzes::Table, Quizzes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 选项表
        manager
            .create_table(
                Table::create()
                    .table(QuestionOptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuestionOptions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(QuestionOptions::QuestionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuestionOptions::Position)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(QuestionOptions::Text).text().not_null())
                    .col(
                        ColumnDef::new(QuestionOptions::IsCorrect)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(QuestionOptions::Table, QuestionOptions::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 答题记录表
        manager
            .create_table(
                Table::create()
                    .table(QuizSubmissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuizSubmissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(QuizSubmissions::QuizId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuizSubmissions::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(QuizSubmissions::Status).string().not_null())
                    .col(
                        ColumnDef::new(QuizSubmissions::StartedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuizSubmissions::SubmittedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(QuizSubmissions::GradedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(QuizSubmissions::Score).double().null())
                    .col(ColumnDef::new(QuizSubmissions::MaxScore).double().null())
                    .col(ColumnDef::new(QuizSubmissions::Percentage).double().null())
                    .col(
                        ColumnDef::new(QuizSubmissions::NeedsReview)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(QuizSubmissions::Table, QuizSubmissions::QuizId)
                            .to(Quizzes::Table, Quizzes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(QuizSubmissions::Table, QuizSubmissions::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 答案表
        manager
            .create_table(
                Table::create()
                    .table(QuizAnswers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuizAnswers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(QuizAnswers::SubmissionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuizAnswers::QuestionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(QuizAnswers::SelectedOptionIds).text().null())
                    .col(ColumnDef::new(QuizAnswers::TextAnswer).text().null())
                    .col(ColumnDef::new(QuizAnswers::IsCorrect).boolean().null())
                    .col(ColumnDef::new(QuizAnswers::PointsAwarded).double().null())
                    .col(
                        ColumnDef::new(QuizAnswers::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(QuizAnswers::Table, QuizAnswers::SubmissionId)
                            .to(QuizSubmissions::Table, QuizSubmissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(QuizAnswers::Table, QuizAnswers::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_courses_academic_year")
                    .table(Courses::Table)
                    .col(Courses::AcademicYear)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_course_groups_course_id")
                    .table(CourseGroups::Table)
                    .col(CourseGroups::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_group_members_group_user")
                    .table(GroupMembers::Table)
                    .col(GroupMembers::GroupId)
                    .col(GroupMembers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_quizzes_course_id")
                    .table(Quizzes::Table)
                    .col(Quizzes::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_quiz_groups_quiz_group")
                    .table(QuizGroups::Table)
                    .col(QuizGroups::QuizId)
                    .col(QuizGroups::GroupId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_questions_quiz_id")
                    .table(Questions::Table)
                    .col(Questions::QuizId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_question_options_question_id")
                    .table(QuestionOptions::Table)
                    .col(QuestionOptions::QuestionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_quiz_submissions_quiz_student")
                    .table(QuizSubmissions::Table)
                    .col(QuizSubmissions::QuizId)
                    .col(QuizSubmissions::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_quiz_answers_submission_question")
                    .table(QuizAnswers::Table)
                    .col(QuizAnswers::SubmissionId)
                    .col(QuizAnswers::QuestionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QuizAnswers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(QuizSubmissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(QuestionOptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Questions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(QuizGroups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Quizzes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GroupMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CourseGroups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    Status,
    DisplayName,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Courses {
    #[sea_orm(iden = "courses")]
    Table,
    Id,
    Code,
    Title,
    Description,
    AcademicYear,
    InstructorId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CourseGroups {
    #[sea_orm(iden = "course_groups")]
    Table,
    Id,
    CourseId,
    Name,
    AcademicYear,
    CreatedAt,
}

#[derive(DeriveIden)]
enum GroupMembers {
    #[sea_orm(iden = "group_members")]
    Table,
    Id,
    GroupId,
    UserId,
    JoinedAt,
}

#[derive(DeriveIden)]
enum Quizzes {
    #[sea_orm(iden = "quizzes")]
    Table,
    Id,
    CourseId,
    CreatedBy,
    Title,
    Description,
    AvailableFrom,
    AvailableTo,
    ShuffleQuestions,
    ShowResultsImmediately,
    AllowEditAfterSubmission,
    Status,
    ResultsReleased,
    ResultsReleasedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum QuizGroups {
    #[sea_orm(iden = "quiz_groups")]
    Table,
    Id,
    QuizId,
    GroupId,
}

#[derive(DeriveIden)]
enum Questions {
    #[sea_orm(iden = "questions")]
    Table,
    Id,
    QuizId,
    Position,
    Text,
    Points,
    QuestionType,
    ExpectedAnswer,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum QuestionOptions {
    #[sea_orm(iden = "question_options")]
    Table,
    Id,
    QuestionId,
    Position,
    Text,
    IsCorrect,
}

#[derive(DeriveIden)]
enum QuizSubmissions {
    #[sea_orm(iden = "quiz_submissions")]
    Table,
    Id,
    QuizId,
    StudentId,
    Status,
    StartedAt,
    SubmittedAt,
    GradedAt,
    Score,
    MaxScore,
    Percentage,
    NeedsReview,
}

#[derive(DeriveIden)]
enum QuizAnswers {
    #[sea_orm(iden = "quiz_answers")]
    Table,
    Id,
    SubmissionId,
    QuestionId,
    SelectedOptionIds,
    TextAnswer,
    IsCorrect,
    PointsAwarded,
    UpdatedAt,
}
