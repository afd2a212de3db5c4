use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "corrective_actions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub course_id: i32,
    pub feedback_id: Option<i32>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub status: String, // planejada | em_andamento | concluida | cancelada
    pub owner: Option<String>,
    pub due_on: Option<ChronoDate>,
    pub completed_on: Option<ChronoDate>,
    pub results: Option<String>,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Courses,
    #[sea_orm(
        belongs_to = "super::pedagogical_feedback::Entity",
        from = "Column::FeedbackId",
        to = "super::pedagogical_feedback::Column::Id"
    )]
    PedagogicalFeedback,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Courses.def()
    }
}

impl Related<super::pedagogical_feedback::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PedagogicalFeedback.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
