use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub unit_id: i32,
    pub name: String,
    pub code: String,
    pub modality: String, // presencial | ead | hibrido
    pub duration_semesters: i32,
    pub coordinator: Option<String>,
    pub active: bool,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::units::Entity",
        from = "Column::UnitId",
        to = "super::units::Column::Id"
    )]
    Units,
    #[sea_orm(has_many = "super::pedagogical_feedback::Entity")]
    PedagogicalFeedback,
    #[sea_orm(has_many = "super::corrective_actions::Entity")]
    CorrectiveActions,
}

impl Related<super::units::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Units.def()
    }
}

impl Related<super::pedagogical_feedback::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PedagogicalFeedback.def()
    }
}

impl Related<super::corrective_actions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CorrectiveActions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub fn new(unit_id: i32, code: &str, name: &str) -> Self {
        Self {
            id: ActiveValue::NotSet,
            unit_id: Set(unit_id),
            name: Set(name.to_string()),
            code: Set(code.to_string()),
            modality: Set("presencial".to_string()),
            duration_semesters: Set(8),
            coordinator: Set(None),
            active: Set(true),
            created_at: Set(chrono::Utc::now()),
        }
    }
}
