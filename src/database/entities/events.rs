use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub starts_at: ChronoDateTimeUtc,
    pub ends_at: Option<ChronoDateTimeUtc>,
    pub location: Option<String>,
    pub modality: String, // presencial | online | hibrido
    pub online_link: Option<String>,
    pub capacity: Option<i32>,
    pub free: bool,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub certificate: bool,
    pub workload_hours: Option<i32>,
    pub organizer: Option<String>,
    pub status: String, // rascunho | publicado | cancelado | finalizado
    pub created_by: Option<i32>,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::event_categories::Entity",
        from = "Column::CategoryId",
        to = "super::event_categories::Column::Id"
    )]
    EventCategories,
    #[sea_orm(has_many = "super::event_participants::Entity")]
    EventParticipants,
    #[sea_orm(has_many = "super::event_ratings::Entity")]
    EventRatings,
}

impl Related<super::event_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventCategories.def()
    }
}

impl Related<super::event_participants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventParticipants.def()
    }
}

impl Related<super::event_ratings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventRatings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
