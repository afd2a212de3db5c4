use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event_ratings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub event_id: i32,
    pub alumnus_id: i32,
    pub overall: i32,
    pub organization: Option<i32>,
    pub content: Option<i32>,
    pub speakers: Option<i32>,
    pub infrastructure: Option<i32>,
    pub would_recommend: bool,
    pub positives: Option<String>,
    pub improvements: Option<String>,
    pub other_interests: Option<String>,
    pub comments: Option<String>,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::events::Entity",
        from = "Column::EventId",
        to = "super::events::Column::Id"
    )]
    Events,
    #[sea_orm(
        belongs_to = "super::alumni::Entity",
        from = "Column::AlumnusId",
        to = "super::alumni::Column::Id"
    )]
    Alumni,
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl Related<super::alumni::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Alumni.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
