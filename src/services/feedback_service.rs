use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::database::entities::{
    alumni, corrective_actions, courses, pedagogical_feedback, responses, surveys, units,
};
use crate::errors::{CoreError, CoreResult};

pub const ACTION_STATUSES: [&str; 4] = ["planejada", "em_andamento", "concluida", "cancelada"];
pub const ACTION_PRIORITIES: [&str; 3] = ["baixa", "media", "alta"];
const COMPLETED: &str = "concluida";

fn default_priority() -> String {
    "media".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorrectiveActionInput {
    pub course_id: i32,
    pub feedback_id: Option<i32>,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default = "default_priority")]
    pub priority: String,
    pub owner: Option<String>,
    pub due_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActionStatusUpdate {
    pub status: String,
    pub results: Option<String>,
}

/// Mean and count of one response category for one course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub course_id: i32,
    pub category: String,
    pub mean_value: f64,
    pub total_responses: usize,
}

/// Semester label such as `2024.2`
pub fn reference_period(at: DateTime<Utc>) -> String {
    format!("{}.{}", at.year(), if at.month() <= 6 { 1 } else { 2 })
}

/// Group numeric answers by (course, response category) and average them
pub fn aggregate(answers: &[(i32, String, f64)]) -> Vec<Aggregate> {
    let mut groups: BTreeMap<(i32, &str), (f64, usize)> = BTreeMap::new();
    for (course_id, category, value) in answers {
        let entry = groups.entry((*course_id, category.as_str())).or_default();
        entry.0 += value;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|((course_id, category), (sum, count))| Aggregate {
            course_id,
            category: category.to_string(),
            mean_value: ((sum / count as f64) * 100.0).round() / 100.0,
            total_responses: count,
        })
        .collect()
}

fn validate_action(input: &CorrectiveActionInput) -> CoreResult<()> {
    if input.title.trim().is_empty() {
        return Err(CoreError::invalid_field("title", "Title is required"));
    }
    if input.description.trim().is_empty() {
        return Err(CoreError::invalid_field("description", "Description is required"));
    }
    if !ACTION_PRIORITIES.contains(&input.priority.as_str()) {
        return Err(CoreError::invalid_field(
            "priority",
            format!("Priority must be one of {}", ACTION_PRIORITIES.join(", ")),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct FeedbackService {
    db: DatabaseConnection,
}

impl FeedbackService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn ensure_course(&self, course_id: i32) -> CoreResult<courses::Model> {
        courses::Entity::find_by_id(course_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found("Course", course_id))
    }

    pub async fn list_feedback(&self, course_id: i32) -> CoreResult<Vec<pedagogical_feedback::Model>> {
        self.ensure_course(course_id).await?;
        Ok(pedagogical_feedback::Entity::find()
            .filter(pedagogical_feedback::Column::CourseId.eq(course_id))
            .order_by_desc(pedagogical_feedback::Column::CreatedAt)
            .order_by_asc(pedagogical_feedback::Column::Category)
            .all(&self.db)
            .await?)
    }

    /// Resolve an alumnus' course name (and unit code) to a course id
    async fn course_index(&self) -> CoreResult<HashMap<(Option<String>, String), i32>> {
        let unit_codes: HashMap<i32, String> = units::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|u| (u.id, u.code))
            .collect();

        let mut index = HashMap::new();
        for course in courses::Entity::find()
            .order_by_asc(courses::Column::Id)
            .all(&self.db)
            .await?
        {
            index
                .entry((unit_codes.get(&course.unit_id).cloned(), course.name.clone()))
                .or_insert(course.id);
            index.entry((None, course.name)).or_insert(course.id);
        }
        Ok(index)
    }

    /// Replace a survey's feedback rows with fresh means per course and category
    pub async fn recompute_for_survey(
        &self,
        survey_id: i32,
    ) -> CoreResult<Vec<pedagogical_feedback::Model>> {
        let survey = surveys::Entity::find_by_id(survey_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found("Survey", survey_id))?;

        let course_index = self.course_index().await?;
        let alumni_course: HashMap<i32, i32> = alumni::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .filter_map(|a| {
                course_index
                    .get(&(a.unit.clone(), a.course.clone()))
                    .or_else(|| course_index.get(&(None, a.course.clone())))
                    .map(|course_id| (a.id, *course_id))
            })
            .collect();

        let answers: Vec<(i32, String, f64)> = responses::Entity::find()
            .filter(responses::Column::SurveyId.eq(survey_id))
            .all(&self.db)
            .await?
            .into_iter()
            .filter_map(|r| {
                let course_id = alumni_course.get(&r.alumnus_id)?;
                let category = r.response_category?;
                let value = r.numeric_value?;
                Some((*course_id, category, value))
            })
            .collect();

        let aggregates = aggregate(&answers);
        let period = reference_period(survey.starts_at);
        let now = Utc::now();

        let txn = self.db.begin().await?;
        pedagogical_feedback::Entity::delete_many()
            .filter(pedagogical_feedback::Column::SurveyId.eq(survey_id))
            .exec(&txn)
            .await?;

        let mut rows = Vec::with_capacity(aggregates.len());
        for aggregate in aggregates {
            let row = pedagogical_feedback::ActiveModel {
                course_id: Set(aggregate.course_id),
                survey_id: Set(survey_id),
                indicator: Set(format!("Média - {}", aggregate.category)),
                category: Set(aggregate.category),
                mean_value: Set(aggregate.mean_value),
                total_responses: Set(aggregate.total_responses as i32),
                reference_period: Set(period.clone()),
                notes: Set(None),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            rows.push(row);
        }
        txn.commit().await?;

        info!(
            "Recomputed {} feedback indicators for survey {}",
            rows.len(),
            survey_id
        );
        Ok(rows)
    }

    pub async fn create_action(
        &self,
        input: CorrectiveActionInput,
    ) -> CoreResult<corrective_actions::Model> {
        validate_action(&input)?;
        self.ensure_course(input.course_id).await?;
        if let Some(feedback_id) = input.feedback_id {
            pedagogical_feedback::Entity::find_by_id(feedback_id)
                .one(&self.db)
                .await?
                .ok_or_else(|| CoreError::not_found("PedagogicalFeedback", feedback_id))?;
        }

        let now = Utc::now();
        let action = corrective_actions::ActiveModel {
            course_id: Set(input.course_id),
            feedback_id: Set(input.feedback_id),
            title: Set(input.title.trim().to_string()),
            description: Set(input.description.trim().to_string()),
            category: Set(input.category),
            priority: Set(input.priority),
            status: Set(ACTION_STATUSES[0].to_string()),
            owner: Set(input.owner),
            due_on: Set(input.due_on),
            completed_on: Set(None),
            results: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Created corrective action {} for course {}", action.id, action.course_id);
        Ok(action)
    }

    /// Move an action to a new status; completing stamps `completed_on`
    pub async fn update_action_status(
        &self,
        action_id: i32,
        update: ActionStatusUpdate,
    ) -> CoreResult<corrective_actions::Model> {
        if !ACTION_STATUSES.contains(&update.status.as_str()) {
            return Err(CoreError::invalid_field(
                "status",
                format!("Status must be one of {}", ACTION_STATUSES.join(", ")),
            ));
        }

        let action = corrective_actions::Entity::find_by_id(action_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found("CorrectiveAction", action_id))?;

        let now = Utc::now();
        let mut active: corrective_actions::ActiveModel = action.into();
        active.completed_on = Set(if update.status == COMPLETED {
            Some(now.date_naive())
        } else {
            None
        });
        active.status = Set(update.status);
        if let Some(results) = update.results {
            active.results = Set(Some(results));
        }
        active.updated_at = Set(now);

        Ok(active.update(&self.db).await?)
    }

    pub async fn list_actions(&self, course_id: i32) -> CoreResult<Vec<corrective_actions::Model>> {
        self.ensure_course(course_id).await?;
        Ok(corrective_actions::Entity::find()
            .filter(corrective_actions::Column::CourseId.eq(course_id))
            .order_by_desc(corrective_actions::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_aggregate_means_per_course_and_category() {
        let answers = vec![
            (1, "satisfacao_ensino".to_string(), 4.0),
            (1, "satisfacao_ensino".to_string(), 5.0),
            (1, "infraestrutura".to_string(), 2.0),
            (2, "satisfacao_ensino".to_string(), 3.0),
        ];
        let aggregates = aggregate(&answers);
        assert_eq!(aggregates.len(), 3);
        assert_eq!(
            aggregates[1],
            Aggregate {
                course_id: 1,
                category: "satisfacao_ensino".to_string(),
                mean_value: 4.5,
                total_responses: 2,
            }
        );
    }

    #[test]
    fn test_reference_period_by_semester() {
        let march = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let october = Utc.with_ymd_and_hms(2024, 10, 1, 12, 0, 0).unwrap();
        assert_eq!(reference_period(march), "2024.1");
        assert_eq!(reference_period(october), "2024.2");
    }

    #[test]
    fn test_action_requires_known_priority() {
        let input = CorrectiveActionInput {
            course_id: 1,
            feedback_id: None,
            title: "Revisar ementa".to_string(),
            description: "Atualizar conteúdos".to_string(),
            category: "curriculo".to_string(),
            priority: "urgente".to_string(),
            owner: None,
            due_on: None,
        };
        assert!(validate_action(&input).is_err());
    }
}
