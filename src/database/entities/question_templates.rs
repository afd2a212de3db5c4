use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "question_templates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub template_id: i32,
    pub prompt: String,
    pub kind: String,
    pub options: Option<String>, // JSON array of strings
    pub required: bool,
    pub position: i32,
    pub response_category: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub weight: f64,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::survey_templates::Entity",
        from = "Column::TemplateId",
        to = "super::survey_templates::Column::Id"
    )]
    SurveyTemplates,
}

impl Related<super::survey_templates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SurveyTemplates.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
