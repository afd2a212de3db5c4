use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::Role;
use crate::database::entities::coordinators;
use crate::errors::{CoreError, CoreResult};

use super::alumni_service::AlumniService;
use super::auth_service::{AuthService, ProfileView};

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterCoordinatorRequest {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub unit: String,
    pub course: String,
    pub academic_background: Option<String>,
    pub professional_experience: Option<String>,
    pub started_on: Option<NaiveDate>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisteredCoordinator {
    pub profile: ProfileView,
    pub coordinator: coordinators::Model,
    pub initial_password: String,
}

#[derive(Clone)]
pub struct CoordinatorService {
    db: DatabaseConnection,
    alumni: AlumniService,
}

impl CoordinatorService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            alumni: AlumniService::new(db.clone()),
            db,
        }
    }

    /// Create a coordination account bound to a course of a unit
    pub async fn register_coordinator(
        &self,
        request: RegisterCoordinatorRequest,
    ) -> CoreResult<RegisteredCoordinator> {
        if request.unit.trim().is_empty() {
            return Err(CoreError::invalid_field("unit", "Unit is required"));
        }
        if request.course.trim().is_empty() {
            return Err(CoreError::invalid_field("course", "Course is required"));
        }
        if !self
            .alumni
            .unit_offers_course(request.unit.trim(), request.course.trim())
            .await?
        {
            return Err(CoreError::invalid_field(
                "course",
                "Course is not offered by the selected unit",
            ));
        }
        if let Some(started_on) = request.started_on {
            if started_on > Utc::now().date_naive() {
                return Err(CoreError::invalid_field(
                    "started_on",
                    "Start date cannot be in the future",
                ));
            }
        }

        let initial_password = AuthService::generate_initial_password();
        let txn = self.db.begin().await?;
        let profile = AuthService::create_account(
            &txn,
            &request.email,
            &request.full_name,
            Role::Coordination,
            &initial_password,
        )
        .await?;

        let coordinator = coordinators::ActiveModel {
            profile_id: Set(profile.id),
            phone: Set(request.phone),
            course: Set(request.course.trim().to_string()),
            unit: Set(request.unit.trim().to_string()),
            academic_background: Set(request.academic_background),
            professional_experience: Set(request.professional_experience),
            started_on: Set(request.started_on),
            address: Set(request.address),
            city: Set(request.city),
            state: Set(request.state),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(
            "Registered coordinator {} for {} / {}",
            profile.email, coordinator.unit, coordinator.course
        );
        Ok(RegisteredCoordinator {
            profile: profile.into(),
            coordinator,
            initial_password,
        })
    }
}
