use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EventCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EventCategories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EventCategories::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(EventCategories::Description).text().null())
                    .col(ColumnDef::new(EventCategories::Color).string().not_null().default("#3B82F6"))
                    .col(ColumnDef::new(EventCategories::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Events::Title).string().not_null())
                    .col(ColumnDef::new(Events::Description).text().null())
                    .col(ColumnDef::new(Events::CategoryId).integer().null())
                    .col(ColumnDef::new(Events::StartsAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Events::EndsAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Events::Location).string().null())
                    .col(ColumnDef::new(Events::Modality).string().not_null().default("presencial"))
                    .col(ColumnDef::new(Events::OnlineLink).string().null())
                    .col(ColumnDef::new(Events::Capacity).integer().null())
                    .col(ColumnDef::new(Events::Free).boolean().not_null().default(true))
                    .col(ColumnDef::new(Events::Price).double().not_null().default(0.0))
                    .col(ColumnDef::new(Events::Certificate).boolean().not_null().default(false))
                    .col(ColumnDef::new(Events::WorkloadHours).integer().null())
                    .col(ColumnDef::new(Events::Organizer).string().null())
                    .col(ColumnDef::new(Events::Status).string().not_null().default("rascunho"))
                    .col(ColumnDef::new(Events::CreatedBy).integer().null())
                    .col(ColumnDef::new(Events::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Events::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_events_category_id")
                            .from(Events::Table, Events::CategoryId)
                            .to(EventCategories::Table, EventCategories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_events_created_by")
                            .from(Events::Table, Events::CreatedBy)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EventParticipants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EventParticipants::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EventParticipants::EventId).integer().not_null())
                    .col(ColumnDef::new(EventParticipants::AlumnusId).integer().not_null())
                    .col(ColumnDef::new(EventParticipants::Status).string().not_null().default("inscrito"))
                    .col(ColumnDef::new(EventParticipants::RegisteredAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_participants_event_id")
                            .from(EventParticipants::Table, EventParticipants::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_participants_alumnus_id")
                            .from(EventParticipants::Table, EventParticipants::AlumnusId)
                            .to(Alumni::Table, Alumni::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_event_participants_event_alumnus_unique")
                    .table(EventParticipants::Table)
                    .col(EventParticipants::EventId)
                    .col(EventParticipants::AlumnusId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EventRatings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EventRatings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EventRatings::EventId).integer().not_null())
                    .col(ColumnDef::new(EventRatings::AlumnusId).integer().not_null())
                    .col(ColumnDef::new(EventRatings::Overall).integer().not_null())
                    .col(ColumnDef::new(EventRatings::Organization).integer().null())
                    .col(ColumnDef::new(EventRatings::Content).integer().null())
                    .col(ColumnDef::new(EventRatings::Speakers).integer().null())
                    .col(ColumnDef::new(EventRatings::Infrastructure).integer().null())
                    .col(ColumnDef::new(EventRatings::WouldRecommend).boolean().not_null())
                    .col(ColumnDef::new(EventRatings::Positives).text().null())
                    .col(ColumnDef::new(EventRatings::Improvements).text().null())
                    .col(ColumnDef::new(EventRatings::OtherInterests).text().null())
                    .col(ColumnDef::new(EventRatings::Comments).text().null())
                    .col(ColumnDef::new(EventRatings::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_ratings_event_id")
                            .from(EventRatings::Table, EventRatings::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_ratings_alumnus_id")
                            .from(EventRatings::Table, EventRatings::AlumnusId)
                            .to(Alumni::Table, Alumni::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_event_ratings_event_alumnus_unique")
                    .table(EventRatings::Table)
                    .col(EventRatings::EventId)
                    .col(EventRatings::AlumnusId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventRatings::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(EventParticipants::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(EventCategories::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum EventCategories {
    Table,
    Id,
    Name,
    Description,
    Color,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
    Title,
    Description,
    CategoryId,
    StartsAt,
    EndsAt,
    Location,
    Modality,
    OnlineLink,
    Capacity,
    Free,
    Price,
    Certificate,
    WorkloadHours,
    Organizer,
    Status,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EventParticipants {
    Table,
    Id,
    EventId,
    AlumnusId,
    Status,
    RegisteredAt,
}

#[derive(DeriveIden)]
enum EventRatings {
    Table,
    Id,
    EventId,
    AlumnusId,
    Overall,
    Organization,
    Content,
    Speakers,
    Infrastructure,
    WouldRecommend,
    Positives,
    Improvements,
    OtherInterests,
    Comments,
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
