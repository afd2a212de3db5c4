use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SurveyTemplates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SurveyTemplates::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SurveyTemplates::Title).string().not_null())
                    .col(ColumnDef::new(SurveyTemplates::Description).text().null())
                    .col(ColumnDef::new(SurveyTemplates::Objectives).text().null())
                    .col(ColumnDef::new(SurveyTemplates::Category).string().not_null())
                    .col(ColumnDef::new(SurveyTemplates::Audience).string().not_null())
                    .col(ColumnDef::new(SurveyTemplates::Periodicity).string().not_null())
                    .col(ColumnDef::new(SurveyTemplates::Semester).string().null())
                    .col(ColumnDef::new(SurveyTemplates::Mandatory).boolean().not_null().default(false))
                    .col(ColumnDef::new(SurveyTemplates::Anonymous).boolean().not_null().default(false))
                    .col(ColumnDef::new(SurveyTemplates::Active).boolean().not_null().default(true))
                    .col(ColumnDef::new(SurveyTemplates::CreatedBy).integer().null())
                    .col(ColumnDef::new(SurveyTemplates::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(SurveyTemplates::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_survey_templates_created_by")
                            .from(SurveyTemplates::Table, SurveyTemplates::CreatedBy)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(QuestionTemplates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuestionTemplates::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(QuestionTemplates::TemplateId).integer().not_null())
                    .col(ColumnDef::new(QuestionTemplates::Prompt).text().not_null())
                    .col(ColumnDef::new(QuestionTemplates::Kind).string().not_null())
                    .col(ColumnDef::new(QuestionTemplates::Options).text().null())
                    .col(ColumnDef::new(QuestionTemplates::Required).boolean().not_null().default(false))
                    .col(ColumnDef::new(QuestionTemplates::Position).integer().not_null())
                    .col(ColumnDef::new(QuestionTemplates::ResponseCategory).string().null())
                    .col(ColumnDef::new(QuestionTemplates::Weight).double().not_null().default(1.0))
                    .col(ColumnDef::new(QuestionTemplates::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_question_templates_template_id")
                            .from(QuestionTemplates::Table, QuestionTemplates::TemplateId)
                            .to(SurveyTemplates::Table, SurveyTemplates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Surveys::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Surveys::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Surveys::TemplateId).integer().null())
                    .col(ColumnDef::new(Surveys::Title).string().not_null())
                    .col(ColumnDef::new(Surveys::Description).text().null())
                    .col(ColumnDef::new(Surveys::StartsAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Surveys::EndsAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Surveys::Active).boolean().not_null().default(true))
                    .col(ColumnDef::new(Surveys::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_surveys_template_id")
                            .from(Surveys::Table, Surveys::TemplateId)
                            .to(SurveyTemplates::Table, SurveyTemplates::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Questions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Questions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Questions::SurveyId).integer().not_null())
                    .col(ColumnDef::new(Questions::QuestionTemplateId).integer().null())
                    .col(ColumnDef::new(Questions::Prompt).text().not_null())
                    .col(ColumnDef::new(Questions::Kind).string().not_null())
                    .col(ColumnDef::new(Questions::Options).text().null())
                    .col(ColumnDef::new(Questions::Required).boolean().not_null().default(false))
                    .col(ColumnDef::new(Questions::Position).integer().not_null())
                    .col(ColumnDef::new(Questions::ResponseCategory).string().null())
                    .col(ColumnDef::new(Questions::Weight).double().not_null().default(1.0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_questions_survey_id")
                            .from(Questions::Table, Questions::SurveyId)
                            .to(Surveys::Table, Surveys::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Responses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Responses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Responses::AlumnusId).integer().not_null())
                    .col(ColumnDef::new(Responses::SurveyId).integer().not_null())
                    .col(ColumnDef::new(Responses::QuestionId).integer().not_null())
                    .col(ColumnDef::new(Responses::Answer).text().not_null())
                    .col(ColumnDef::new(Responses::NumericValue).double().null())
                    .col(ColumnDef::new(Responses::ResponseCategory).string().null())
                    .col(ColumnDef::new(Responses::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_responses_alumnus_id")
                            .from(Responses::Table, Responses::AlumnusId)
                            .to(Alumni::Table, Alumni::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_responses_survey_id")
                            .from(Responses::Table, Responses::SurveyId)
                            .to(Surveys::Table, Surveys::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_responses_question_id")
                            .from(Responses::Table, Responses::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_responses_alumnus_question_unique")
                    .table(Responses::Table)
                    .col(Responses::AlumnusId)
                    .col(Responses::QuestionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Responses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Questions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Surveys::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(QuestionTemplates::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(SurveyTemplates::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum SurveyTemplates {
    Table,
    Id,
    Title,
    Description,
    Objectives,
    Category,
    Audience,
    Periodicity,
    Semester,
    Mandatory,
    Anonymous,
    Active,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum QuestionTemplates {
    Table,
    Id,
    TemplateId,
    Prompt,
    Kind,
    Options,
    Required,
    Position,
    ResponseCategory,
    Weight,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Surveys {
    Table,
    Id,
    TemplateId,
    Title,
    Description,
    StartsAt,
    EndsAt,
    Active,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Questions {
    Table,
    Id,
    SurveyId,
    QuestionTemplateId,
    Prompt,
    Kind,
    Options,
    Required,
    Position,
    ResponseCategory,
    Weight,
}

#[derive(DeriveIden)]
enum Responses {
    Table,
    Id,
    AlumnusId,
    SurveyId,
    QuestionId,
    Answer,
    NumericValue,
    ResponseCategory,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Alumni {
    Table,
    Id,
}
