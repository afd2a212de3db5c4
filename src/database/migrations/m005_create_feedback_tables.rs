use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PedagogicalFeedback::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PedagogicalFeedback::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PedagogicalFeedback::CourseId).integer().not_null())
                    .col(ColumnDef::new(PedagogicalFeedback::SurveyId).integer().not_null())
                    .col(ColumnDef::new(PedagogicalFeedback::Category).string().not_null())
                    .col(ColumnDef::new(PedagogicalFeedback::Indicator).string().not_null())
                    .col(ColumnDef::new(PedagogicalFeedback::MeanValue).double().not_null())
                    .col(ColumnDef::new(PedagogicalFeedback::TotalResponses).integer().not_null())
                    .col(ColumnDef::new(PedagogicalFeedback::ReferencePeriod).string().not_null())
                    .col(ColumnDef::new(PedagogicalFeedback::Notes).text().null())
                    .col(ColumnDef::new(PedagogicalFeedback::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pedagogical_feedback_course_id")
                            .from(PedagogicalFeedback::Table, PedagogicalFeedback::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pedagogical_feedback_survey_id")
                            .from(PedagogicalFeedback::Table, PedagogicalFeedback::SurveyId)
                            .to(Surveys::Table, Surveys::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CorrectiveActions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CorrectiveActions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CorrectiveActions::CourseId).integer().not_null())
                    .col(ColumnDef::new(CorrectiveActions::FeedbackId).integer().null())
                    .col(ColumnDef::new(CorrectiveActions::Title).string().not_null())
                    .col(ColumnDef::new(CorrectiveActions::Description).text().not_null())
                    .col(ColumnDef::new(CorrectiveActions::Category).string().not_null())
                    .col(ColumnDef::new(CorrectiveActions::Priority).string().not_null().default("media"))
                    .col(ColumnDef::new(CorrectiveActions::Status).string().not_null().default("planejada"))
                    .col(ColumnDef::new(CorrectiveActions::Owner).string().null())
                    .col(ColumnDef::new(CorrectiveActions::DueOn).date().null())
                    .col(ColumnDef::new(CorrectiveActions::CompletedOn).date().null())
                    .col(ColumnDef::new(CorrectiveActions::Results).text().null())
                    .col(ColumnDef::new(CorrectiveActions::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(CorrectiveActions::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_corrective_actions_course_id")
                            .from(CorrectiveActions::Table, CorrectiveActions::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_corrective_actions_feedback_id")
                            .from(CorrectiveActions::Table, CorrectiveActions::FeedbackId)
                            .to(PedagogicalFeedback::Table, PedagogicalFeedback::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CorrectiveActions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(PedagogicalFeedback::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum PedagogicalFeedback {
    Table,
    Id,
    CourseId,
    SurveyId,
    Category,
    Indicator,
    MeanValue,
    TotalResponses,
    ReferencePeriod,
    Notes,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CorrectiveActions {
    Table,
    Id,
    CourseId,
    FeedbackId,
    Title,
    Description,
    Category,
    Priority,
    Status,
    Owner,
    DueOn,
    CompletedOn,
    Results,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Courses {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Surveys {
    Table,
    Id,
}
