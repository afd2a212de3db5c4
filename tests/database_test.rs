//! Database functionality tests
//!
//! Tests for migrations, reference data seeding and data integrity

use alumni_portal::database::entities::*;
use alumni_portal::database::seed_data;
use alumni_portal::database::setup_database;
use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};
use tempfile::NamedTempFile;

/// Create a test database connection with migrations
async fn setup_test_db() -> Result<(DatabaseConnection, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db = Database::connect(&db_url).await?;
    setup_database(&db).await?;

    Ok((db, temp_file))
}

#[tokio::test]
async fn test_database_migrations() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    // Every table exists and starts empty
    assert_eq!(units::Entity::find().count(&db).await?, 0);
    assert_eq!(courses::Entity::find().count(&db).await?, 0);
    assert_eq!(profiles::Entity::find().count(&db).await?, 0);
    assert_eq!(sessions::Entity::find().count(&db).await?, 0);
    assert_eq!(alumni::Entity::find().count(&db).await?, 0);
    assert_eq!(coordinators::Entity::find().count(&db).await?, 0);
    assert_eq!(survey_templates::Entity::find().count(&db).await?, 0);
    assert_eq!(question_templates::Entity::find().count(&db).await?, 0);
    assert_eq!(surveys::Entity::find().count(&db).await?, 0);
    assert_eq!(questions::Entity::find().count(&db).await?, 0);
    assert_eq!(responses::Entity::find().count(&db).await?, 0);
    assert_eq!(event_categories::Entity::find().count(&db).await?, 0);
    assert_eq!(events::Entity::find().count(&db).await?, 0);
    assert_eq!(event_participants::Entity::find().count(&db).await?, 0);
    assert_eq!(event_ratings::Entity::find().count(&db).await?, 0);
    assert_eq!(pedagogical_feedback::Entity::find().count(&db).await?, 0);
    assert_eq!(corrective_actions::Entity::find().count(&db).await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_reference_data_seeding() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    seed_data::seed_reference_data(&db).await?;
    seed_data::seed_reference_data(&db).await?;

    assert_eq!(units::Entity::find().count(&db).await?, 14);
    assert_eq!(event_categories::Entity::find().count(&db).await?, 5);

    let bh = units::Entity::find()
        .filter(units::Column::Code.eq("BH"))
        .one(&db)
        .await?
        .expect("BH unit seeded");
    let bh_courses = courses::Entity::find()
        .filter(courses::Column::UnitId.eq(bh.id))
        .all(&db)
        .await?;
    assert_eq!(bh_courses.len(), 4);
    assert!(bh_courses.iter().any(|c| c.name == "Ciência da Computação"));

    Ok(())
}

#[tokio::test]
async fn test_demo_seeding_is_idempotent() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    seed_data::seed_reference_data(&db).await?;
    seed_data::seed_demo(&db).await?;
    seed_data::seed_demo(&db).await?;

    assert_eq!(profiles::Entity::find().count(&db).await?, 3);
    assert_eq!(alumni::Entity::find().count(&db).await?, 1);
    assert_eq!(survey_templates::Entity::find().count(&db).await?, 1);
    assert_eq!(surveys::Entity::find().count(&db).await?, 1);
    assert_eq!(questions::Entity::find().count(&db).await?, 7);
    assert_eq!(events::Entity::find().count(&db).await?, 4);

    let alumnus = alumni::Entity::find().one(&db).await?.expect("demo alumnus");
    assert_eq!(alumnus.unit.as_deref(), Some("BH"));
    assert_eq!(alumnus.employment_status.as_deref(), Some("Empregado"));

    Ok(())
}

#[tokio::test]
async fn test_one_response_per_question() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    seed_data::seed_reference_data(&db).await?;
    seed_data::seed_demo(&db).await?;

    let alumnus = alumni::Entity::find().one(&db).await?.expect("demo alumnus");
    let question = questions::Entity::find().one(&db).await?.expect("demo question");

    let response = |answer: &str| responses::ActiveModel {
        alumnus_id: Set(alumnus.id),
        survey_id: Set(question.survey_id),
        question_id: Set(question.id),
        answer: Set(answer.to_string()),
        numeric_value: Set(None),
        response_category: Set(question.response_category.clone()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    response("Satisfeito").insert(&db).await?;
    let duplicate = response("Neutro").insert(&db).await;
    assert!(duplicate.is_err());

    assert_eq!(responses::Entity::find().count(&db).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_one_registration_per_event() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    seed_data::seed_reference_data(&db).await?;
    seed_data::seed_demo(&db).await?;

    let alumnus = alumni::Entity::find().one(&db).await?.expect("demo alumnus");
    let event = events::Entity::find().one(&db).await?.expect("demo event");

    event_participants::ActiveModel::new(event.id, alumnus.id)
        .insert(&db)
        .await?;
    let duplicate = event_participants::ActiveModel::new(event.id, alumnus.id)
        .insert(&db)
        .await;
    assert!(duplicate.is_err());

    Ok(())
}

#[tokio::test]
async fn test_profile_email_is_unique() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    let profile = |name: &str| {
        let now = Utc::now();
        profiles::ActiveModel {
            email: Set("ana@example.com".to_string()),
            password_hash: Set("hash".to_string()),
            full_name: Set(name.to_string()),
            role: Set("egresso".to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    };

    profile("Ana").insert(&db).await?;
    assert!(profile("Outra Ana").insert(&db).await.is_err());

    Ok(())
}
