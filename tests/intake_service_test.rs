use std::io::Write;

use alumni_portal::database::entities::{alumni, profiles};
use alumni_portal::database::seed_data;
use alumni_portal::database::setup_database;
use alumni_portal::errors::CoreErrorKind;
use alumni_portal::services::alumni_service::{AlumnusProfileInput, RegisterAlumnusRequest};
use alumni_portal::services::coordinator_service::RegisterCoordinatorRequest;
use alumni_portal::services::{AlumniService, CoordinatorService, ImportService};
use anyhow::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, PaginatorTrait};
use tempfile::NamedTempFile;

/// Create a migrated SQLite database with units and courses
async fn setup_test_db() -> Result<(DatabaseConnection, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db = Database::connect(&db_url).await?;
    setup_database(&db).await?;
    seed_data::seed_reference_data(&db).await?;

    Ok((db, temp_file))
}

fn alumnus_request(email: &str) -> RegisterAlumnusRequest {
    RegisterAlumnusRequest {
        full_name: "Rui Costa".to_string(),
        email: email.to_string(),
        profile: AlumnusProfileInput {
            course: "Direito".to_string(),
            graduation_year: 2015,
            ..Default::default()
        },
    }
}

fn coordinator_request(email: &str) -> RegisterCoordinatorRequest {
    RegisterCoordinatorRequest {
        full_name: "Carlos Lima".to_string(),
        email: email.to_string(),
        phone: None,
        unit: "BH".to_string(),
        course: "Ciência da Computação".to_string(),
        academic_background: None,
        professional_experience: None,
        started_on: None,
        address: None,
        city: None,
        state: None,
    }
}

#[tokio::test]
async fn test_register_alumnus_creates_profile_and_row() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let service = AlumniService::new(db.clone());

    let registered = service.register_alumnus(alumnus_request("rui@example.com")).await?;
    assert_eq!(registered.profile.role, "egresso");
    assert_eq!(registered.alumnus.profile_id, registered.profile.id);
    assert_eq!(profiles::Entity::find().count(&db).await?, 1);
    assert_eq!(alumni::Entity::find().count(&db).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_failed_alumnus_row_leaves_no_profile() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    db.execute_unprepared("DROP TABLE alumni").await?;

    let service = AlumniService::new(db.clone());
    let result = service.register_alumnus(alumnus_request("rui@example.com")).await;

    assert!(result.is_err());
    assert_eq!(profiles::Entity::find().count(&db).await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_failed_coordinator_row_leaves_no_profile() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    db.execute_unprepared("DROP TABLE coordinators").await?;

    let service = CoordinatorService::new(db.clone());
    let result = service
        .register_coordinator(coordinator_request("carlos@example.com"))
        .await;

    assert!(result.is_err());
    assert_eq!(profiles::Entity::find().count(&db).await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_import_reports_unknown_unit_per_row() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let service = ImportService::new(AlumniService::new(db));

    let csv = "full_name,email,curso,unidade,ano_conclusao\n\
               Rui Costa,rui@example.com,Direito,NENHUMA,2015\n";
    let result = service.import_csv(csv).await?;

    assert_eq!(result.success, 0);
    assert_eq!(result.errors, vec!["Linha 2: Unidade desconhecida - NENHUMA".to_string()]);

    Ok(())
}

#[tokio::test]
async fn test_import_stops_on_database_failure() -> Result<()> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());
    let db = Database::connect(&db_url).await?;
    setup_database(&db).await?;
    db.execute_unprepared("DROP TABLE units").await?;

    let service = ImportService::new(AlumniService::new(db));
    let csv = "full_name,email,curso,unidade,ano_conclusao\n\
               Rui Costa,rui@example.com,Direito,BH,2015\n";
    let err = service.import_csv(csv).await.unwrap_err();

    assert_eq!(err.kind(), CoreErrorKind::Internal);

    Ok(())
}

#[tokio::test]
async fn test_import_file_from_disk() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;
    let service = ImportService::new(AlumniService::new(db.clone()));

    let mut csv_file = NamedTempFile::new()?;
    write!(
        csv_file,
        "full_name,email,curso,unidade,ano_conclusao,status_profissional\n\
         Rui Costa,rui@example.com,Direito,LEOPOLDINA,2015,Empregado\n\
         Lia Melo,lia@example.com,Medicina,LEOPOLDINA,2016,\n\
         Ana Souza,ana@example.com,Direito,,2019,Autônomo\n"
    )?;
    csv_file.flush()?;

    let result = service.import_file(csv_file.path()).await?;
    assert_eq!(result.success, 2);
    assert_eq!(
        result.errors,
        vec!["Linha 3: Curso inválido para a unidade selecionada".to_string()]
    );
    assert_eq!(alumni::Entity::find().count(&db).await?, 2);

    let missing = service
        .import_file(&csv_file.path().with_extension("missing"))
        .await;
    assert!(missing.is_err());

    Ok(())
}
