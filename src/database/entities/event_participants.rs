use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event_participants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub event_id: i32,
    pub alumnus_id: i32,
    pub status: String, // inscrito | presente | ausente
    pub registered_at: ChronoDateTimeUtc,
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

impl ActiveModel {
    pub fn new(event_id: i32, alumnus_id: i32) -> Self {
        Self {
            id: ActiveValue::NotSet,
            event_id: Set(event_id),
            alumnus_id: Set(alumnus_id),
            status: Set("inscrito".to_string()),
            registered_at: Set(chrono::Utc::now()),
        }
    }
}
