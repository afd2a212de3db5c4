use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profiles::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Profiles::FullName).string().not_null())
                    .col(ColumnDef::new(Profiles::Role).string().not_null().default("egresso"))
                    .col(ColumnDef::new(Profiles::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Profiles::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Profiles::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Profiles::UpdatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Profiles::LastLoginAt).timestamp_with_time_zone().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sessions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sessions::Token).string().not_null().unique_key())
                    .col(ColumnDef::new(Sessions::ProfileId).integer().not_null())
                    .col(ColumnDef::new(Sessions::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Sessions::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Sessions::ExpiresAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Sessions::LastActivity).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sessions_profile_id")
                            .from(Sessions::Table, Sessions::ProfileId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Alumni::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alumni::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alumni::ProfileId).integer().not_null().unique_key())
                    .col(ColumnDef::new(Alumni::Course).string().not_null())
                    .col(ColumnDef::new(Alumni::Unit).string().null())
                    .col(ColumnDef::new(Alumni::GraduationYear).integer().not_null())
                    .col(ColumnDef::new(Alumni::Phone).string().null())
                    .col(ColumnDef::new(Alumni::Address).string().null())
                    .col(ColumnDef::new(Alumni::City).string().null())
                    .col(ColumnDef::new(Alumni::State).string().null())
                    .col(ColumnDef::new(Alumni::EmploymentStatus).string().null())
                    .col(ColumnDef::new(Alumni::CurrentEmployer).string().null())
                    .col(ColumnDef::new(Alumni::CurrentPosition).string().null())
                    .col(ColumnDef::new(Alumni::ContinuingEducation).string().null())
                    .col(ColumnDef::new(Alumni::LinkedinUrl).string().null())
                    .col(ColumnDef::new(Alumni::FacebookUrl).string().null())
                    .col(ColumnDef::new(Alumni::InstagramUrl).string().null())
                    .col(ColumnDef::new(Alumni::PersonalSite).string().null())
                    .col(ColumnDef::new(Alumni::Gender).string().null())
                    .col(ColumnDef::new(Alumni::BirthYear).integer().null())
                    .col(ColumnDef::new(Alumni::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Alumni::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alumni_profile_id")
                            .from(Alumni::Table, Alumni::ProfileId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Coordinators::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Coordinators::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Coordinators::ProfileId).integer().not_null().unique_key())
                    .col(ColumnDef::new(Coordinators::Phone).string().null())
                    .col(ColumnDef::new(Coordinators::Course).string().not_null())
                    .col(ColumnDef::new(Coordinators::Unit).string().not_null())
                    .col(ColumnDef::new(Coordinators::AcademicBackground).string().null())
                    .col(ColumnDef::new(Coordinators::ProfessionalExperience).string().null())
                    .col(ColumnDef::new(Coordinators::StartedOn).date().null())
                    .col(ColumnDef::new(Coordinators::Address).string().null())
                    .col(ColumnDef::new(Coordinators::City).string().null())
                    .col(ColumnDef::new(Coordinators::State).string().null())
                    .col(ColumnDef::new(Coordinators::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_coordinators_profile_id")
                            .from(Coordinators::Table, Coordinators::ProfileId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Coordinators::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Alumni::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
    Email,
    FullName,
    Role,
    PasswordHash,
    IsActive,
    CreatedAt,
    UpdatedAt,
    LastLoginAt,
}

#[derive(DeriveIden)]
enum Sessions {
    Table,
    Id,
    Token,
    ProfileId,
    IsActive,
    CreatedAt,
    ExpiresAt,
    LastActivity,
}

#[derive(DeriveIden)]
enum Alumni {
    Table,
    Id,
    ProfileId,
    Course,
    Unit,
    GraduationYear,
    Phone,
    Address,
    City,
    State,
    EmploymentStatus,
    CurrentEmployer,
    CurrentPosition,
    ContinuingEducation,
    LinkedinUrl,
    FacebookUrl,
    InstagramUrl,
    PersonalSite,
    Gender,
    BirthYear,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Coordinators {
    Table,
    Id,
    ProfileId,
    Phone,
    Course,
    Unit,
    AcademicBackground,
    ProfessionalExperience,
    StartedOn,
    Address,
    City,
    State,
    CreatedAt,
}
