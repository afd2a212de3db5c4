use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "survey_templates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub objectives: Option<String>,
    pub category: String,
    pub audience: String,
    pub periodicity: String,
    pub semester: Option<String>,
    pub mandatory: bool,
    pub anonymous: bool,
    pub active: bool,
    pub created_by: Option<i32>,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::question_templates::Entity")]
    QuestionTemplates,
    #[sea_orm(has_many = "super::surveys::Entity")]
    Surveys,
}

impl Related<super::question_templates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuestionTemplates.def()
    }
}

impl Related<super::surveys::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Surveys.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
