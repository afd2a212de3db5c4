pub use sea_orm_migration::prelude::*;

mod m001_create_institution_tables;
mod m002_user_authentication;
mod m003_create_survey_tables;
mod m004_create_event_tables;
mod m005_create_feedback_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m001_create_institution_tables::Migration),
            Box::new(m002_user_authentication::Migration),
            Box::new(m003_create_survey_tables::Migration),
            Box::new(m004_create_event_tables::Migration),
            Box::new(m005_create_feedback_tables::Migration),
        ]
    }
}
