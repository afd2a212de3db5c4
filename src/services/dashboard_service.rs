use std::collections::BTreeMap;

use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use crate::database::entities::events;
use crate::errors::CoreResult;

use super::alumni_service::{AlumniService, AlumnusRow};
use super::event_service::EventService;
use super::survey_service::{SurveyService, SurveySummary};

const DASHBOARD_ITEMS: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlumnusDashboard {
    pub profile_complete: bool,
    pub surveys: Vec<SurveySummary>,
    pub events: Vec<events::Model>,
    pub pending_surveys: usize,
    pub upcoming_events: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartSlice {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffDashboard {
    pub total_alumni: usize,
    pub employed: usize,
    pub active_surveys: usize,
    pub upcoming_events: usize,
    pub employment: Vec<ChartSlice>,
    pub by_course: Vec<ChartSlice>,
}

/// Employment chart and per-course counts. Everyone not "Empregado" counts as unemployed here.
pub fn staff_charts(rows: &[AlumnusRow]) -> (usize, Vec<ChartSlice>, Vec<ChartSlice>) {
    let employed = rows
        .iter()
        .filter(|r| r.employment_status.as_deref() == Some("Empregado"))
        .count();
    let employment = vec![
        ChartSlice {
            name: "Empregado".to_string(),
            value: employed,
        },
        ChartSlice {
            name: "Desempregado".to_string(),
            value: rows.len() - employed,
        },
    ];

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for row in rows {
        *counts.entry(row.course.as_str()).or_default() += 1;
    }
    let by_course = counts
        .into_iter()
        .map(|(course, value)| ChartSlice {
            name: course.to_string(),
            value,
        })
        .collect();

    (employed, employment, by_course)
}

/// Newest surveys that still accept answers; the list arrives newest first
pub fn latest_open_surveys(surveys: Vec<SurveySummary>, limit: usize) -> Vec<SurveySummary> {
    surveys.into_iter().filter(|s| !s.expired).take(limit).collect()
}

#[derive(Clone)]
pub struct DashboardService {
    alumni: AlumniService,
    surveys: SurveyService,
    events: EventService,
}

impl DashboardService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            alumni: AlumniService::new(db.clone()),
            surveys: SurveyService::new(db.clone()),
            events: EventService::new(db),
        }
    }

    pub async fn for_alumnus(
        &self,
        profile_id: i32,
        alumnus_id: Option<i32>,
    ) -> CoreResult<AlumnusDashboard> {
        let own = self.alumni.get_own_profile(profile_id).await?;
        let surveys = self.surveys.list_for_alumnus(alumnus_id).await?;
        let pending_surveys = surveys.iter().filter(|s| !s.answered && !s.expired).count();

        Ok(AlumnusDashboard {
            profile_complete: own.complete,
            pending_surveys,
            surveys: latest_open_surveys(surveys, DASHBOARD_ITEMS),
            events: self.events.upcoming(DASHBOARD_ITEMS).await?,
            upcoming_events: self.events.count_upcoming().await?,
        })
    }

    pub async fn for_staff(&self) -> CoreResult<StaffDashboard> {
        let rows = self.alumni.all_rows().await?;
        let (employed, employment, by_course) = staff_charts(&rows);
        let active_surveys = self
            .surveys
            .list_for_alumnus(None)
            .await?
            .iter()
            .filter(|s| !s.expired)
            .count();

        Ok(StaffDashboard {
            total_alumni: rows.len(),
            employed,
            active_surveys,
            upcoming_events: self.events.count_upcoming().await?,
            employment,
            by_course,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(id: i32, course: &str, status: Option<&str>) -> AlumnusRow {
        AlumnusRow {
            id,
            profile_id: id,
            full_name: format!("Egresso {}", id),
            email: format!("egresso{}@example.com", id),
            course: course.to_string(),
            unit: None,
            graduation_year: 2021,
            employment_status: status.map(str::to_string),
            current_employer: None,
            current_position: None,
            phone: None,
            city: None,
            state: None,
        }
    }

    fn survey(id: i32, expired: bool) -> SurveySummary {
        SurveySummary {
            id,
            title: format!("Pesquisa {}", id),
            description: None,
            category: None,
            starts_at: Utc::now(),
            ends_at: None,
            expired,
            days_remaining: None,
            answered: false,
            total_responses: 0,
        }
    }

    #[test]
    fn test_dashboard_skips_expired_surveys() {
        let surveys = vec![
            survey(5, true),
            survey(4, false),
            survey(3, true),
            survey(2, false),
            survey(1, false),
        ];
        let ids: Vec<i32> = latest_open_surveys(surveys, DASHBOARD_ITEMS)
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![4, 2, 1]);
    }

    #[test]
    fn test_unemployed_is_total_minus_employed() {
        let rows = vec![
            row(1, "Direito", Some("Empregado")),
            row(2, "Direito", Some("Empreendedor")),
            row(3, "Medicina", None),
        ];
        let (employed, employment, by_course) = staff_charts(&rows);
        assert_eq!(employed, 1);
        assert_eq!(employment[1].value, 2);
        assert_eq!(
            by_course,
            vec![
                ChartSlice { name: "Direito".to_string(), value: 2 },
                ChartSlice { name: "Medicina".to_string(), value: 1 },
            ]
        );
    }
}
