use std::collections::BTreeSet;

use chrono::{Datelike, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::Role;
use crate::database::entities::{alumni, courses, profiles, units};
use crate::errors::{CoreError, CoreResult};

use super::auth_service::{AuthService, ProfileView};

pub const EMPLOYMENT_STATUSES: [&str; 4] = ["Empregado", "Empreendedor", "Autônomo", "Desempregado"];

/// Fields an alumnus edits on their own profile
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AlumnusProfileInput {
    pub course: String,
    pub unit: Option<String>,
    pub graduation_year: i32,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub employment_status: Option<String>,
    pub current_employer: Option<String>,
    pub current_position: Option<String>,
    pub continuing_education: Option<String>,
    pub linkedin_url: Option<String>,
    pub facebook_url: Option<String>,
    pub instagram_url: Option<String>,
    pub personal_site: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterAlumnusRequest {
    pub full_name: String,
    pub email: String,
    #[serde(flatten)]
    pub profile: AlumnusProfileInput,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisteredAlumnus {
    pub profile: ProfileView,
    pub alumnus: alumni::Model,
    /// Returned once so the registrar can hand it over
    pub initial_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnProfile {
    pub profile: ProfileView,
    pub alumnus: Option<alumni::Model>,
    pub complete: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlumniFilters {
    pub search: Option<String>,
    pub course: Option<String>,
    pub status: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlumnusRow {
    pub id: i32,
    pub profile_id: i32,
    pub full_name: String,
    pub email: String,
    pub course: String,
    pub unit: Option<String>,
    pub graduation_year: i32,
    pub employment_status: Option<String>,
    pub current_employer: Option<String>,
    pub current_position: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AlumniStats {
    pub total: usize,
    pub employed: usize,
    pub entrepreneurs: usize,
    pub self_employed: usize,
    pub unemployed: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterOptions {
    pub courses: Vec<String>,
    pub statuses: Vec<String>,
    pub years: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlumniListing {
    pub alumni: Vec<AlumnusRow>,
    pub stats: AlumniStats,
    pub filters: FilterOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitWithCourses {
    #[serde(flatten)]
    pub unit: units::Model,
    pub courses: Vec<courses::Model>,
}

impl AlumniFilters {
    pub fn matches(&self, row: &AlumnusRow) -> bool {
        if let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            let hit = row.full_name.to_lowercase().contains(&term)
                || row.email.to_lowercase().contains(&term)
                || row.course.to_lowercase().contains(&term);
            if !hit {
                return false;
            }
        }

        if let Some(course) = self.course.as_deref().filter(|c| !c.is_empty()) {
            if row.course != course {
                return false;
            }
        }

        if let Some(status) = self.status.as_deref().filter(|s| !s.is_empty()) {
            if row.employment_status.as_deref() != Some(status) {
                return false;
            }
        }

        if let Some(year) = self.year {
            if row.graduation_year != year {
                return false;
            }
        }

        true
    }
}

impl AlumniStats {
    pub fn from_rows(rows: &[AlumnusRow]) -> Self {
        let count = |status: &str| {
            rows.iter()
                .filter(|r| r.employment_status.as_deref() == Some(status))
                .count()
        };

        Self {
            total: rows.len(),
            employed: count("Empregado"),
            entrepreneurs: count("Empreendedor"),
            self_employed: count("Autônomo"),
            unemployed: count("Desempregado"),
        }
    }
}

impl FilterOptions {
    pub fn from_rows(rows: &[AlumnusRow]) -> Self {
        let courses: BTreeSet<String> = rows.iter().map(|r| r.course.clone()).collect();
        let statuses: BTreeSet<String> = rows
            .iter()
            .filter_map(|r| r.employment_status.clone())
            .filter(|s| !s.is_empty())
            .collect();
        let years: BTreeSet<i32> = rows.iter().map(|r| r.graduation_year).collect();

        Self {
            courses: courses.into_iter().collect(),
            statuses: statuses.into_iter().collect(),
            years: years.into_iter().rev().collect(),
        }
    }
}

pub fn validate_graduation_year(year: i32) -> CoreResult<()> {
    let max = Utc::now().year() + 1;
    if !(1900..=max).contains(&year) {
        return Err(CoreError::invalid_field(
            "graduation_year",
            format!("Graduation year must be between 1900 and {}", max),
        ));
    }
    Ok(())
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_input(input: &AlumnusProfileInput) -> CoreResult<()> {
    if input.course.trim().is_empty() {
        return Err(CoreError::invalid_field("course", "Course is required"));
    }
    validate_graduation_year(input.graduation_year)?;

    if let Some(status) = input.employment_status.as_deref().filter(|s| !s.is_empty()) {
        if !EMPLOYMENT_STATUSES.contains(&status) {
            return Err(CoreError::invalid_field(
                "employment_status",
                format!("Unknown employment status: {}", status),
            ));
        }
    }

    if let Some(birth_year) = input.birth_year {
        if birth_year < 1900 || birth_year > input.graduation_year {
            return Err(CoreError::invalid_field(
                "birth_year",
                "Birth year must be before graduation",
            ));
        }
    }

    Ok(())
}

fn apply_input(active: &mut alumni::ActiveModel, input: AlumnusProfileInput) {
    active.course = Set(input.course.trim().to_string());
    active.unit = Set(clean(input.unit));
    active.graduation_year = Set(input.graduation_year);
    active.phone = Set(clean(input.phone));
    active.address = Set(clean(input.address));
    active.city = Set(clean(input.city));
    active.state = Set(clean(input.state));
    active.employment_status = Set(clean(input.employment_status));
    active.current_employer = Set(clean(input.current_employer));
    active.current_position = Set(clean(input.current_position));
    active.continuing_education = Set(clean(input.continuing_education));
    active.linkedin_url = Set(clean(input.linkedin_url));
    active.facebook_url = Set(clean(input.facebook_url));
    active.instagram_url = Set(clean(input.instagram_url));
    active.personal_site = Set(clean(input.personal_site));
    active.gender = Set(clean(input.gender));
    active.birth_year = Set(input.birth_year);
    active.updated_at = Set(Utc::now());
}

fn row(alumnus: alumni::Model, profile: profiles::Model) -> AlumnusRow {
    AlumnusRow {
        id: alumnus.id,
        profile_id: profile.id,
        full_name: profile.full_name,
        email: profile.email,
        course: alumnus.course,
        unit: alumnus.unit,
        graduation_year: alumnus.graduation_year,
        employment_status: alumnus.employment_status,
        current_employer: alumnus.current_employer,
        current_position: alumnus.current_position,
        phone: alumnus.phone,
        city: alumnus.city,
        state: alumnus.state,
    }
}

#[derive(Clone)]
pub struct AlumniService {
    db: DatabaseConnection,
}

impl AlumniService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_own_profile(&self, profile_id: i32) -> CoreResult<OwnProfile> {
        let profile = profiles::Entity::find_by_id(profile_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found("Profile", profile_id))?;

        let alumnus = alumni::Entity::find()
            .filter(alumni::Column::ProfileId.eq(profile_id))
            .one(&self.db)
            .await?;

        Ok(OwnProfile {
            profile: profile.into(),
            complete: alumnus.is_some(),
            alumnus,
        })
    }

    /// Save the caller's alumnus row, creating it on first save
    pub async fn update_own_profile(
        &self,
        profile_id: i32,
        input: AlumnusProfileInput,
    ) -> CoreResult<alumni::Model> {
        validate_input(&input)?;

        let existing = alumni::Entity::find()
            .filter(alumni::Column::ProfileId.eq(profile_id))
            .one(&self.db)
            .await?;

        let model = match existing {
            Some(alumnus) => {
                let mut active: alumni::ActiveModel = alumnus.into();
                apply_input(&mut active, input);
                active.update(&self.db).await?
            }
            None => {
                let mut active = alumni::ActiveModel {
                    profile_id: Set(profile_id),
                    created_at: Set(Utc::now()),
                    ..Default::default()
                };
                apply_input(&mut active, input);
                let model = active.insert(&self.db).await?;
                info!("Created alumnus profile for profile {}", profile_id);
                model
            }
        };

        Ok(model)
    }

    /// Registrar intake: account plus alumnus row, in one transaction
    pub async fn register_alumnus(
        &self,
        request: RegisterAlumnusRequest,
    ) -> CoreResult<RegisteredAlumnus> {
        validate_input(&request.profile)?;

        let initial_password = AuthService::generate_initial_password();
        let txn = self.db.begin().await?;
        let profile = AuthService::create_account(
            &txn,
            &request.email,
            &request.full_name,
            Role::Alumnus,
            &initial_password,
        )
        .await?;

        let mut active = alumni::ActiveModel {
            profile_id: Set(profile.id),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        apply_input(&mut active, request.profile);
        let alumnus = active.insert(&txn).await?;
        txn.commit().await?;

        info!("Registered alumnus {} ({})", profile.full_name, profile.email);
        Ok(RegisteredAlumnus {
            profile: profile.into(),
            alumnus,
            initial_password,
        })
    }

    /// Every alumnus joined with their profile, ordered by name
    pub async fn all_rows(&self) -> CoreResult<Vec<AlumnusRow>> {
        let pairs = alumni::Entity::find()
            .find_also_related(profiles::Entity)
            .order_by_asc(alumni::Column::Id)
            .all(&self.db)
            .await?;

        let mut rows: Vec<AlumnusRow> = pairs
            .into_iter()
            .filter_map(|(alumnus, profile)| profile.map(|p| row(alumnus, p)))
            .collect();
        rows.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(rows)
    }

    pub async fn list_alumni(&self, filters: &AlumniFilters) -> CoreResult<AlumniListing> {
        let rows = self.all_rows().await?;
        let stats = AlumniStats::from_rows(&rows);
        let options = FilterOptions::from_rows(&rows);

        Ok(AlumniListing {
            alumni: rows.into_iter().filter(|r| filters.matches(r)).collect(),
            stats,
            filters: options,
        })
    }

    pub async fn list_units(&self) -> CoreResult<Vec<UnitWithCourses>> {
        let pairs = units::Entity::find()
            .filter(units::Column::Active.eq(true))
            .order_by_asc(units::Column::Id)
            .find_with_related(courses::Entity)
            .all(&self.db)
            .await?;

        Ok(pairs
            .into_iter()
            .map(|(unit, courses)| UnitWithCourses {
                unit,
                courses: courses.into_iter().filter(|c| c.active).collect(),
            })
            .collect())
    }

    pub async fn list_courses(&self, unit_code: &str) -> CoreResult<Vec<courses::Model>> {
        let unit = units::Entity::find()
            .filter(units::Column::Code.eq(unit_code))
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found("Unit", unit_code))?;

        Ok(courses::Entity::find()
            .filter(courses::Column::UnitId.eq(unit.id))
            .filter(courses::Column::Active.eq(true))
            .order_by_asc(courses::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Whether the unit offers a course with this name
    pub async fn unit_offers_course(&self, unit_code: &str, course: &str) -> CoreResult<bool> {
        Ok(self
            .list_courses(unit_code)
            .await?
            .iter()
            .any(|c| c.name == course))
    }
}
