use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Units::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Units::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Units::Name).string().not_null())
                    .col(ColumnDef::new(Units::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(Units::City).string().not_null())
                    .col(ColumnDef::new(Units::Address).string().null())
                    .col(ColumnDef::new(Units::Phone).string().null())
                    .col(ColumnDef::new(Units::Email).string().null())
                    .col(ColumnDef::new(Units::Director).string().null())
                    .col(ColumnDef::new(Units::Active).boolean().not_null().default(true))
                    .col(ColumnDef::new(Units::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courses::UnitId).integer().not_null())
                    .col(ColumnDef::new(Courses::Name).string().not_null())
                    .col(ColumnDef::new(Courses::Code).string().not_null())
                    .col(ColumnDef::new(Courses::Modality).string().not_null().default("presencial"))
                    .col(ColumnDef::new(Courses::DurationSemesters).integer().not_null().default(8))
                    .col(ColumnDef::new(Courses::Coordinator).string().null())
                    .col(ColumnDef::new(Courses::Active).boolean().not_null().default(true))
                    .col(ColumnDef::new(Courses::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_courses_unit_id")
                            .from(Courses::Table, Courses::UnitId)
                            .to(Units::Table, Units::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_courses_unit_code_unique")
                    .table(Courses::Table)
                    .col(Courses::UnitId)
                    .col(Courses::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Units::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Units {
    Table,
    Id,
    Name,
    Code,
    City,
    Address,
    Phone,
    Email,
    Director,
    Active,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Courses {
    Table,
    Id,
    UnitId,
    Name,
    Code,
    Modality,
    DurationSemesters,
    Coordinator,
    Active,
    CreatedAt,
}
