use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::database::entities::{
    alumni, question_templates, questions, responses, survey_templates, surveys,
};
use crate::errors::{CoreResult, SurveyError};

pub const YES: &str = "Sim";
pub const NO: &str = "Não";
pub const NUMERIC_SCALE_MAX: i64 = 10;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    Checkbox,
    Text,
    LikertScale,
    NumericScale,
    YesNo,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "multiple_choice",
            QuestionKind::Checkbox => "checkbox",
            QuestionKind::Text => "text",
            QuestionKind::LikertScale => "likert_scale",
            QuestionKind::NumericScale => "numeric_scale",
            QuestionKind::YesNo => "yes_no",
        }
    }

    /// Kinds whose answers are picked from a list of options
    pub fn uses_options(&self) -> bool {
        matches!(
            self,
            QuestionKind::MultipleChoice | QuestionKind::Checkbox | QuestionKind::LikertScale
        )
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionKind {
    type Err = SurveyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multiple_choice" => Ok(QuestionKind::MultipleChoice),
            "checkbox" => Ok(QuestionKind::Checkbox),
            "text" => Ok(QuestionKind::Text),
            "likert_scale" => Ok(QuestionKind::LikertScale),
            "numeric_scale" => Ok(QuestionKind::NumericScale),
            "yes_no" => Ok(QuestionKind::YesNo),
            other => Err(SurveyError::InvalidQuestion {
                position: 0,
                reason: format!("unknown question kind {}", other),
            }),
        }
    }
}

fn default_weight() -> f64 {
    1.0
}

fn default_category() -> String {
    "geral".to_string()
}

fn default_audience() -> String {
    "todos".to_string()
}

fn default_periodicity() -> String {
    "unica".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuestionInput {
    pub prompt: String,
    pub kind: QuestionKind,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub required: bool,
    pub response_category: Option<String>,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateInput {
    pub title: String,
    pub description: Option<String>,
    pub objectives: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_audience")]
    pub audience: String,
    #[serde(default = "default_periodicity")]
    pub periodicity: String,
    pub semester: Option<String>,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub anonymous: bool,
    #[serde(default)]
    pub questions: Vec<QuestionInput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub objectives: Option<String>,
    pub category: Option<String>,
    pub audience: Option<String>,
    pub periodicity: Option<String>,
    pub semester: Option<String>,
    pub mandatory: Option<bool>,
    pub anonymous: Option<bool>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionUpdate {
    pub prompt: Option<String>,
    pub kind: Option<QuestionKind>,
    pub options: Option<Vec<String>>,
    pub required: Option<bool>,
    pub response_category: Option<String>,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishRequest {
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionView {
    pub id: i32,
    pub prompt: String,
    pub kind: QuestionKind,
    pub options: Vec<String>,
    pub required: bool,
    pub position: i32,
    pub response_category: Option<String>,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDetail {
    #[serde(flatten)]
    pub template: survey_templates::Model,
    pub questions: Vec<QuestionView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveySummary {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub expired: bool,
    pub days_remaining: Option<i64>,
    pub answered: bool,
    pub total_responses: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffSurveySummary {
    #[serde(flatten)]
    pub summary: SurveySummary,
    pub active: bool,
    pub question_count: u64,
    pub respondents: usize,
    pub pending: usize,
    pub overdue: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyDetail {
    #[serde(flatten)]
    pub summary: SurveySummary,
    pub questions: Vec<QuestionView>,
}

/// A submitted answer. Clients send a string, a number, a boolean or a list.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Choices(Vec<String>),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnswerInput {
    pub question_id: i32,
    pub value: AnswerValue,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRequest {
    pub answers: Vec<AnswerInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResult {
    pub survey_id: i32,
    pub saved: usize,
}

/// Stored form of a validated answer
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedAnswer {
    pub answer: String,
    pub numeric_value: Option<f64>,
}

pub fn parse_options(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|r| serde_json::from_str::<Vec<String>>(r).ok())
        .unwrap_or_default()
}

fn encode_options(kind: QuestionKind, options: &[String]) -> Option<String> {
    match kind {
        k if k.uses_options() => Some(serde_json::json!(options).to_string()),
        QuestionKind::YesNo => Some(serde_json::json!([YES, NO]).to_string()),
        _ => None,
    }
}

/// Ceil of the remaining days, floored at zero; `None` without an end date
pub fn days_remaining(ends_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<i64> {
    ends_at.map(|end| {
        let seconds = (end - now).num_seconds();
        if seconds <= 0 {
            0
        } else {
            (seconds + 86_399) / 86_400
        }
    })
}

/// Trim options and check the per-kind rules
pub fn normalize_question(
    position: usize,
    mut input: QuestionInput,
) -> Result<QuestionInput, SurveyError> {
    let invalid = |reason: &str| SurveyError::InvalidQuestion {
        position,
        reason: reason.to_string(),
    };

    input.prompt = input.prompt.trim().to_string();
    if input.prompt.is_empty() {
        return Err(invalid("prompt is required"));
    }

    if input.kind.uses_options() {
        input.options = input
            .options
            .into_iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
        if input.options.len() < 2 {
            return Err(invalid("at least two non-empty options are required"));
        }
        let unique: HashSet<&String> = input.options.iter().collect();
        if unique.len() != input.options.len() {
            return Err(invalid("options must be distinct"));
        }
    } else {
        input.options.clear();
    }

    if !(input.weight.is_finite() && input.weight > 0.0) {
        return Err(invalid("weight must be positive"));
    }

    Ok(input)
}

/// Validate one answer for its question kind. `Ok(None)` means left blank.
pub fn encode_answer(
    kind: QuestionKind,
    options: &[String],
    value: &AnswerValue,
) -> Result<Option<EncodedAnswer>, String> {
    let text = |v: &AnswerValue| match v {
        AnswerValue::Text(s) => Some(s.trim().to_string()),
        AnswerValue::Number(n) => Some(n.to_string()),
        AnswerValue::Bool(b) => Some(if *b { YES } else { NO }.to_string()),
        AnswerValue::Choices(_) => None,
    };

    match kind {
        QuestionKind::Text => {
            let answer = text(value).ok_or("expected text")?;
            Ok((!answer.is_empty()).then_some(EncodedAnswer {
                answer,
                numeric_value: None,
            }))
        }
        QuestionKind::MultipleChoice => {
            let answer = text(value).ok_or("expected a single option")?;
            if answer.is_empty() {
                return Ok(None);
            }
            if !options.contains(&answer) {
                return Err(format!("'{}' is not one of the options", answer));
            }
            Ok(Some(EncodedAnswer {
                answer,
                numeric_value: None,
            }))
        }
        QuestionKind::Checkbox => {
            let picked: Vec<String> = match value {
                AnswerValue::Choices(items) => items.iter().map(|s| s.trim().to_string()).collect(),
                AnswerValue::Text(s) if options.contains(&s.trim().to_string()) => {
                    vec![s.trim().to_string()]
                }
                AnswerValue::Text(s) => s.split(',').map(|s| s.trim().to_string()).collect(),
                _ => return Err("expected a list of options".to_string()),
            };
            let mut seen = HashSet::new();
            let picked: Vec<String> = picked
                .into_iter()
                .filter(|s| !s.is_empty())
                .filter(|s| seen.insert(s.clone()))
                .collect();
            if picked.is_empty() {
                return Ok(None);
            }
            if let Some(unknown) = picked.iter().find(|p| !options.contains(*p)) {
                return Err(format!("'{}' is not one of the options", unknown));
            }
            // Stored as a JSON array, like question options
            Ok(Some(EncodedAnswer {
                answer: serde_json::json!(picked).to_string(),
                numeric_value: None,
            }))
        }
        QuestionKind::LikertScale => {
            let index = match value {
                AnswerValue::Number(n) if n.fract() == 0.0 && *n >= 1.0 => {
                    let index = *n as usize - 1;
                    (index < options.len()).then_some(index)
                }
                AnswerValue::Text(s) if s.trim().is_empty() => return Ok(None),
                AnswerValue::Text(s) => options.iter().position(|o| o == s.trim()),
                _ => None,
            }
            .ok_or("answer must be one of the scale options")?;

            Ok(Some(EncodedAnswer {
                answer: options[index].clone(),
                numeric_value: Some(index as f64 + 1.0),
            }))
        }
        QuestionKind::NumericScale => {
            let number = match value {
                AnswerValue::Number(n) => Some(*n),
                AnswerValue::Text(s) if s.trim().is_empty() => return Ok(None),
                AnswerValue::Text(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            }
            .ok_or("expected a number")?;

            if number.fract() != 0.0 || number < 1.0 || number > NUMERIC_SCALE_MAX as f64 {
                return Err(format!("value must be an integer from 1 to {}", NUMERIC_SCALE_MAX));
            }
            Ok(Some(EncodedAnswer {
                answer: (number as i64).to_string(),
                numeric_value: Some(number),
            }))
        }
        QuestionKind::YesNo => {
            let answer = text(value).ok_or("expected Sim or Não")?;
            let numeric = match answer.as_str() {
                "" => return Ok(None),
                YES => 1.0,
                NO => 0.0,
                _ => return Err("expected Sim or Não".to_string()),
            };
            Ok(Some(EncodedAnswer {
                answer,
                numeric_value: Some(numeric),
            }))
        }
    }
}

fn template_question_view(model: question_templates::Model) -> CoreResult<QuestionView> {
    Ok(QuestionView {
        id: model.id,
        kind: model.kind.parse()?,
        options: parse_options(model.options.as_deref()),
        prompt: model.prompt,
        required: model.required,
        position: model.position,
        response_category: model.response_category,
        weight: model.weight,
    })
}

fn question_view(model: questions::Model) -> CoreResult<QuestionView> {
    Ok(QuestionView {
        id: model.id,
        kind: model.kind.parse()?,
        options: parse_options(model.options.as_deref()),
        prompt: model.prompt,
        required: model.required,
        position: model.position,
        response_category: model.response_category,
        weight: model.weight,
    })
}

#[derive(Clone)]
pub struct SurveyService {
    db: DatabaseConnection,
}

impl SurveyService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ----- templates -----

    pub async fn create_template(
        &self,
        created_by: Option<i32>,
        input: TemplateInput,
    ) -> CoreResult<TemplateDetail> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(SurveyError::MissingTitle.into());
        }
        if input.questions.is_empty() {
            return Err(SurveyError::NoQuestions.into());
        }

        let questions = input
            .questions
            .into_iter()
            .enumerate()
            .map(|(index, q)| normalize_question(index + 1, q))
            .collect::<Result<Vec<_>, _>>()?;

        let txn = self.db.begin().await?;
        let now = Utc::now();

        let template = survey_templates::ActiveModel {
            title: Set(title),
            description: Set(input.description),
            objectives: Set(input.objectives),
            category: Set(input.category),
            audience: Set(input.audience),
            periodicity: Set(input.periodicity),
            semester: Set(input.semester),
            mandatory: Set(input.mandatory),
            anonymous: Set(input.anonymous),
            active: Set(true),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for (index, question) in questions.into_iter().enumerate() {
            question_templates::ActiveModel {
                template_id: Set(template.id),
                prompt: Set(question.prompt),
                options: Set(encode_options(question.kind, &question.options)),
                kind: Set(question.kind.as_str().to_string()),
                required: Set(question.required),
                position: Set(index as i32 + 1),
                response_category: Set(question.response_category),
                weight: Set(question.weight),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        info!("Created survey template {} ({})", template.id, template.title);
        self.get_template(template.id).await
    }

    pub async fn list_templates(&self) -> CoreResult<Vec<survey_templates::Model>> {
        Ok(survey_templates::Entity::find()
            .order_by_desc(survey_templates::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    pub async fn get_template(&self, template_id: i32) -> CoreResult<TemplateDetail> {
        let template = survey_templates::Entity::find_by_id(template_id)
            .one(&self.db)
            .await?
            .ok_or(SurveyError::TemplateNotFound(template_id))?;

        let questions = question_templates::Entity::find()
            .filter(question_templates::Column::TemplateId.eq(template_id))
            .order_by_asc(question_templates::Column::Position)
            .all(&self.db)
            .await?
            .into_iter()
            .map(template_question_view)
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(TemplateDetail {
            template,
            questions,
        })
    }

    pub async fn update_template(
        &self,
        template_id: i32,
        update: TemplateUpdate,
    ) -> CoreResult<TemplateDetail> {
        let template = survey_templates::Entity::find_by_id(template_id)
            .one(&self.db)
            .await?
            .ok_or(SurveyError::TemplateNotFound(template_id))?;

        let mut active: survey_templates::ActiveModel = template.into();
        if let Some(title) = update.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(SurveyError::MissingTitle.into());
            }
            active.title = Set(title);
        }
        if let Some(description) = update.description {
            active.description = Set(Some(description));
        }
        if let Some(objectives) = update.objectives {
            active.objectives = Set(Some(objectives));
        }
        if let Some(category) = update.category {
            active.category = Set(category);
        }
        if let Some(audience) = update.audience {
            active.audience = Set(audience);
        }
        if let Some(periodicity) = update.periodicity {
            active.periodicity = Set(periodicity);
        }
        if let Some(semester) = update.semester {
            active.semester = Set(Some(semester));
        }
        if let Some(mandatory) = update.mandatory {
            active.mandatory = Set(mandatory);
        }
        if let Some(anonymous) = update.anonymous {
            active.anonymous = Set(anonymous);
        }
        if let Some(flag) = update.active {
            active.active = Set(flag);
        }
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;

        self.get_template(template_id).await
    }

    async fn template_questions(
        &self,
        template_id: i32,
    ) -> CoreResult<Vec<question_templates::Model>> {
        Ok(question_templates::Entity::find()
            .filter(question_templates::Column::TemplateId.eq(template_id))
            .order_by_asc(question_templates::Column::Position)
            .all(&self.db)
            .await?)
    }

    async fn find_template_question(
        &self,
        question_id: i32,
    ) -> CoreResult<question_templates::Model> {
        Ok(question_templates::Entity::find_by_id(question_id)
            .one(&self.db)
            .await?
            .ok_or(SurveyError::QuestionNotFound(question_id))?)
    }

    /// Append a question. Choice kinds without options get two placeholders.
    pub async fn add_question(
        &self,
        template_id: i32,
        mut input: QuestionInput,
    ) -> CoreResult<TemplateDetail> {
        let existing = self.get_template(template_id).await?;
        let position = existing.questions.len() + 1;

        if input.kind.uses_options() && input.options.is_empty() {
            input.options = vec!["Opção 1".to_string(), "Opção 2".to_string()];
        }
        let question = normalize_question(position, input)?;

        question_templates::ActiveModel {
            template_id: Set(template_id),
            prompt: Set(question.prompt),
            options: Set(encode_options(question.kind, &question.options)),
            kind: Set(question.kind.as_str().to_string()),
            required: Set(question.required),
            position: Set(position as i32),
            response_category: Set(question.response_category),
            weight: Set(question.weight),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        self.get_template(template_id).await
    }

    pub async fn update_question(
        &self,
        question_id: i32,
        update: QuestionUpdate,
    ) -> CoreResult<TemplateDetail> {
        let model = self.find_template_question(question_id).await?;
        let template_id = model.template_id;
        let position = model.position as usize;

        let current_kind: QuestionKind = model.kind.parse()?;
        let kind = update.kind.unwrap_or(current_kind);
        let mut options = update
            .options
            .unwrap_or_else(|| parse_options(model.options.as_deref()));
        if kind.uses_options() && options.is_empty() {
            options = vec!["Opção 1".to_string(), "Opção 2".to_string()];
        }

        let merged = normalize_question(
            position,
            QuestionInput {
                prompt: update.prompt.unwrap_or_else(|| model.prompt.clone()),
                kind,
                options,
                required: update.required.unwrap_or(model.required),
                response_category: update
                    .response_category
                    .or_else(|| model.response_category.clone()),
                weight: update.weight.unwrap_or(model.weight),
            },
        )?;

        let mut active: question_templates::ActiveModel = model.into();
        active.prompt = Set(merged.prompt);
        active.options = Set(encode_options(merged.kind, &merged.options));
        active.kind = Set(merged.kind.as_str().to_string());
        active.required = Set(merged.required);
        active.response_category = Set(merged.response_category);
        active.weight = Set(merged.weight);
        active.update(&self.db).await?;

        self.get_template(template_id).await
    }

    /// Remove a question and renumber the rest 1..n
    pub async fn remove_question(&self, question_id: i32) -> CoreResult<TemplateDetail> {
        let model = self.find_template_question(question_id).await?;
        let template_id = model.template_id;

        let txn = self.db.begin().await?;
        question_templates::Entity::delete_by_id(question_id)
            .exec(&txn)
            .await?;

        let remaining = question_templates::Entity::find()
            .filter(question_templates::Column::TemplateId.eq(template_id))
            .order_by_asc(question_templates::Column::Position)
            .all(&txn)
            .await?;
        for (index, question) in remaining.into_iter().enumerate() {
            let position = index as i32 + 1;
            if question.position != position {
                let mut active: question_templates::ActiveModel = question.into();
                active.position = Set(position);
                active.update(&txn).await?;
            }
        }
        txn.commit().await?;

        debug!("Removed question {} from template {}", question_id, template_id);
        self.get_template(template_id).await
    }

    /// Swap with the neighbour; no-op at either end
    pub async fn move_question(
        &self,
        question_id: i32,
        direction: MoveDirection,
    ) -> CoreResult<TemplateDetail> {
        let model = self.find_template_question(question_id).await?;
        let template_id = model.template_id;
        let siblings = self.template_questions(template_id).await?;

        let index = siblings
            .iter()
            .position(|q| q.id == question_id)
            .ok_or(SurveyError::QuestionNotFound(question_id))?;
        let neighbour = match direction {
            MoveDirection::Up if index > 0 => Some(index - 1),
            MoveDirection::Down if index + 1 < siblings.len() => Some(index + 1),
            _ => None,
        };

        if let Some(other) = neighbour {
            let first = siblings[index].clone();
            let second = siblings[other].clone();
            let (first_position, second_position) = (first.position, second.position);

            let txn = self.db.begin().await?;
            let mut a: question_templates::ActiveModel = first.into();
            a.position = Set(second_position);
            a.update(&txn).await?;
            let mut b: question_templates::ActiveModel = second.into();
            b.position = Set(first_position);
            b.update(&txn).await?;
            txn.commit().await?;
        }

        self.get_template(template_id).await
    }

    pub async fn add_option(
        &self,
        question_id: i32,
        label: Option<String>,
    ) -> CoreResult<TemplateDetail> {
        let model = self.find_template_question(question_id).await?;
        let kind: QuestionKind = model.kind.parse()?;
        if !kind.uses_options() {
            return Err(SurveyError::InvalidQuestion {
                position: model.position as usize,
                reason: format!("{} questions have no options", kind),
            }
            .into());
        }

        let mut options = parse_options(model.options.as_deref());
        let label = label
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| format!("Opção {}", options.len() + 1));
        options.push(label);

        self.update_question(
            question_id,
            QuestionUpdate {
                options: Some(options),
                ..Default::default()
            },
        )
        .await
    }

    /// Drop an option by index; refused when only two are left
    pub async fn remove_option(&self, question_id: i32, index: usize) -> CoreResult<TemplateDetail> {
        let model = self.find_template_question(question_id).await?;
        let mut options = parse_options(model.options.as_deref());

        if options.len() <= 2 {
            return Err(SurveyError::TooFewOptions.into());
        }
        if index >= options.len() {
            return Err(SurveyError::InvalidQuestion {
                position: model.position as usize,
                reason: format!("option {} does not exist", index),
            }
            .into());
        }
        options.remove(index);

        self.update_question(
            question_id,
            QuestionUpdate {
                options: Some(options),
                ..Default::default()
            },
        )
        .await
    }

    // ----- instances -----

    /// Apply a template over a date window, snapshotting its questions
    pub async fn publish(
        &self,
        template_id: i32,
        starts_at: DateTime<Utc>,
        ends_at: Option<DateTime<Utc>>,
    ) -> CoreResult<surveys::Model> {
        if let Some(end) = ends_at {
            if end <= starts_at {
                return Err(SurveyError::InvalidWindow(
                    "end date must be after the start date".to_string(),
                )
                .into());
            }
        }

        let detail = self.get_template(template_id).await?;
        if detail.questions.is_empty() {
            return Err(SurveyError::NoQuestions.into());
        }

        let txn = self.db.begin().await?;
        let survey = surveys::ActiveModel {
            template_id: Set(Some(template_id)),
            title: Set(detail.template.title.clone()),
            description: Set(detail.template.description.clone()),
            starts_at: Set(starts_at),
            ends_at: Set(ends_at),
            active: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for question in detail.questions {
            questions::ActiveModel {
                survey_id: Set(survey.id),
                question_template_id: Set(Some(question.id)),
                prompt: Set(question.prompt),
                options: Set(encode_options(question.kind, &question.options)),
                kind: Set(question.kind.as_str().to_string()),
                required: Set(question.required),
                position: Set(question.position),
                response_category: Set(question.response_category),
                weight: Set(question.weight),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
        txn.commit().await?;

        info!("Published survey {} from template {}", survey.id, template_id);
        Ok(survey)
    }

    pub async fn set_survey_active(&self, survey_id: i32, active: bool) -> CoreResult<surveys::Model> {
        let survey = self.find_survey(survey_id).await?;
        let mut model: surveys::ActiveModel = survey.into();
        model.active = Set(active);
        Ok(model.update(&self.db).await?)
    }

    async fn find_survey(&self, survey_id: i32) -> CoreResult<surveys::Model> {
        Ok(surveys::Entity::find_by_id(survey_id)
            .one(&self.db)
            .await?
            .ok_or(SurveyError::SurveyNotFound(survey_id))?)
    }

    /// Distinct alumni who answered the survey
    pub async fn respondents(&self, survey_id: i32) -> CoreResult<Vec<i32>> {
        Ok(responses::Entity::find()
            .filter(responses::Column::SurveyId.eq(survey_id))
            .select_only()
            .column(responses::Column::AlumnusId)
            .distinct()
            .into_tuple::<i32>()
            .all(&self.db)
            .await?)
    }

    async fn has_answered<C>(conn: &C, survey_id: i32, alumnus_id: i32) -> CoreResult<bool>
    where
        C: ConnectionTrait,
    {
        let count = responses::Entity::find()
            .filter(responses::Column::SurveyId.eq(survey_id))
            .filter(responses::Column::AlumnusId.eq(alumnus_id))
            .count(conn)
            .await?;
        Ok(count > 0)
    }

    async fn template_categories(&self) -> CoreResult<HashMap<i32, String>> {
        Ok(survey_templates::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|t| (t.id, t.category))
            .collect())
    }

    async fn summarize(
        &self,
        survey: &surveys::Model,
        categories: &HashMap<i32, String>,
        alumnus_id: Option<i32>,
        now: DateTime<Utc>,
    ) -> CoreResult<SurveySummary> {
        let respondents = self.respondents(survey.id).await?;
        let answered = alumnus_id
            .map(|id| respondents.contains(&id))
            .unwrap_or(false);

        Ok(SurveySummary {
            id: survey.id,
            title: survey.title.clone(),
            description: survey.description.clone(),
            category: survey
                .template_id
                .and_then(|id| categories.get(&id).cloned()),
            starts_at: survey.starts_at,
            ends_at: survey.ends_at,
            expired: survey.is_expired(now),
            days_remaining: days_remaining(survey.ends_at, now),
            answered,
            total_responses: respondents.len(),
        })
    }

    /// Active, started surveys, newest first
    pub async fn list_for_alumnus(&self, alumnus_id: Option<i32>) -> CoreResult<Vec<SurveySummary>> {
        let now = Utc::now();
        let categories = self.template_categories().await?;
        let rows = surveys::Entity::find()
            .filter(surveys::Column::Active.eq(true))
            .filter(surveys::Column::StartsAt.lte(now))
            .order_by_desc(surveys::Column::StartsAt)
            .order_by_desc(surveys::Column::Id)
            .all(&self.db)
            .await?;

        let mut summaries = Vec::with_capacity(rows.len());
        for survey in &rows {
            summaries.push(self.summarize(survey, &categories, alumnus_id, now).await?);
        }
        Ok(summaries)
    }

    pub async fn list_for_staff(&self) -> CoreResult<Vec<StaffSurveySummary>> {
        let now = Utc::now();
        let categories = self.template_categories().await?;
        let total_alumni = alumni::Entity::find().count(&self.db).await? as usize;
        let rows = surveys::Entity::find()
            .order_by_desc(surveys::Column::CreatedAt)
            .order_by_desc(surveys::Column::Id)
            .all(&self.db)
            .await?;

        let mut summaries = Vec::with_capacity(rows.len());
        for survey in &rows {
            let summary = self.summarize(survey, &categories, None, now).await?;
            let question_count = questions::Entity::find()
                .filter(questions::Column::SurveyId.eq(survey.id))
                .count(&self.db)
                .await?;
            let respondents = summary.total_responses;
            let pending = total_alumni.saturating_sub(respondents);

            summaries.push(StaffSurveySummary {
                overdue: if summary.expired { pending } else { 0 },
                pending,
                respondents,
                question_count,
                active: survey.active,
                summary,
            });
        }
        Ok(summaries)
    }

    pub async fn survey_questions(&self, survey_id: i32) -> CoreResult<Vec<QuestionView>> {
        questions::Entity::find()
            .filter(questions::Column::SurveyId.eq(survey_id))
            .order_by_asc(questions::Column::Position)
            .all(&self.db)
            .await?
            .into_iter()
            .map(question_view)
            .collect()
    }

    pub async fn get_survey(
        &self,
        survey_id: i32,
        alumnus_id: Option<i32>,
    ) -> CoreResult<SurveyDetail> {
        let survey = self.find_survey(survey_id).await?;
        let categories = self.template_categories().await?;
        let summary = self
            .summarize(&survey, &categories, alumnus_id, Utc::now())
            .await?;

        Ok(SurveyDetail {
            summary,
            questions: self.survey_questions(survey_id).await?,
        })
    }

    /// Validate and store one alumnus' answers to a survey
    pub async fn submit(
        &self,
        survey_id: i32,
        alumnus_id: i32,
        answers: Vec<AnswerInput>,
    ) -> CoreResult<SubmitResult> {
        let survey = self.find_survey(survey_id).await?;
        let now = Utc::now();

        if !survey.active {
            return Err(SurveyError::Inactive.into());
        }
        if survey.starts_at > now {
            return Err(SurveyError::NotStarted.into());
        }
        if survey.is_expired(now) {
            return Err(SurveyError::Expired.into());
        }
        let questions = self.survey_questions(survey_id).await?;
        let by_id: HashMap<i32, &QuestionView> = questions.iter().map(|q| (q.id, q)).collect();

        let mut encoded: HashMap<i32, EncodedAnswer> = HashMap::new();
        for input in &answers {
            let question = by_id.get(&input.question_id).ok_or_else(|| {
                SurveyError::InvalidAnswer {
                    question_id: input.question_id,
                    reason: "question does not belong to this survey".to_string(),
                }
            })?;

            let value = encode_answer(question.kind, &question.options, &input.value).map_err(
                |reason| SurveyError::InvalidAnswer {
                    question_id: question.id,
                    reason,
                },
            )?;
            if let Some(value) = value {
                encoded.insert(question.id, value);
            }
        }

        let missing: Vec<i32> = questions
            .iter()
            .filter(|q| q.required && !encoded.contains_key(&q.id))
            .map(|q| q.id)
            .collect();
        if !missing.is_empty() {
            return Err(SurveyError::MissingRequired(missing).into());
        }

        let txn = self.db.begin().await?;
        if Self::has_answered(&txn, survey_id, alumnus_id).await? {
            return Err(SurveyError::AlreadyAnswered.into());
        }

        let mut saved = 0;
        for question in &questions {
            if let Some(value) = encoded.remove(&question.id) {
                responses::ActiveModel {
                    alumnus_id: Set(alumnus_id),
                    survey_id: Set(survey_id),
                    question_id: Set(question.id),
                    answer: Set(value.answer),
                    numeric_value: Set(value.numeric_value),
                    response_category: Set(question.response_category.clone()),
                    created_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
                saved += 1;
            }
        }
        txn.commit().await?;

        info!("Alumnus {} answered survey {} ({} answers)", alumnus_id, survey_id, saved);
        Ok(SubmitResult { survey_id, saved })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn opts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn question(kind: QuestionKind, options: &[&str]) -> QuestionInput {
        QuestionInput {
            prompt: "Pergunta".to_string(),
            kind,
            options: opts(options),
            required: true,
            response_category: None,
            weight: 1.0,
        }
    }

    #[test]
    fn test_days_remaining_rounds_up_and_floors_at_zero() {
        let now = Utc::now();
        assert_eq!(days_remaining(None, now), None);
        assert_eq!(days_remaining(Some(now + Duration::hours(1)), now), Some(1));
        assert_eq!(days_remaining(Some(now + Duration::hours(49)), now), Some(3));
        assert_eq!(days_remaining(Some(now - Duration::days(2)), now), Some(0));
    }

    #[test]
    fn test_choice_question_needs_two_options() {
        let err = normalize_question(1, question(QuestionKind::MultipleChoice, &["A", " "]));
        assert!(matches!(err, Err(SurveyError::InvalidQuestion { position: 1, .. })));

        let ok = normalize_question(1, question(QuestionKind::Checkbox, &[" A ", "B"])).unwrap();
        assert_eq!(ok.options, opts(&["A", "B"]));
    }

    #[test]
    fn test_text_question_drops_options() {
        let q = normalize_question(2, question(QuestionKind::Text, &["ignored"])).unwrap();
        assert!(q.options.is_empty());
    }

    #[test]
    fn test_checkbox_answers_are_stored_as_json() {
        let options = opts(&["Java", "Rust", "Go"]);
        let encoded = encode_answer(
            QuestionKind::Checkbox,
            &options,
            &AnswerValue::Choices(opts(&["Rust", "Go", "Rust"])),
        )
        .unwrap()
        .unwrap();
        assert_eq!(encoded.answer, r#"["Rust","Go"]"#);
        assert_eq!(encoded.numeric_value, None);
        assert_eq!(parse_options(Some(&encoded.answer)), opts(&["Rust", "Go"]));

        assert!(encode_answer(
            QuestionKind::Checkbox,
            &options,
            &AnswerValue::Choices(opts(&["Cobol"]))
        )
        .is_err());
    }

    #[test]
    fn test_checkbox_options_may_contain_commas() {
        let options = opts(&["Sim, integral", "Sim, parcial", "Não"]);
        let encoded = encode_answer(
            QuestionKind::Checkbox,
            &options,
            &AnswerValue::Choices(opts(&["Sim, parcial", "Não"])),
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            parse_options(Some(&encoded.answer)),
            opts(&["Sim, parcial", "Não"])
        );

        let single = encode_answer(
            QuestionKind::Checkbox,
            &options,
            &AnswerValue::Text("Sim, integral".to_string()),
        )
        .unwrap()
        .unwrap();
        assert_eq!(parse_options(Some(&single.answer)), opts(&["Sim, integral"]));
    }

    #[test]
    fn test_likert_value_is_option_index_plus_one() {
        let options = opts(&["Ruim", "Regular", "Bom", "Ótimo"]);
        let by_label = encode_answer(
            QuestionKind::LikertScale,
            &options,
            &AnswerValue::Text("Bom".into()),
        )
        .unwrap()
        .unwrap();
        assert_eq!(by_label.numeric_value, Some(3.0));

        let by_number =
            encode_answer(QuestionKind::LikertScale, &options, &AnswerValue::Number(4.0))
                .unwrap()
                .unwrap();
        assert_eq!(by_number.answer, "Ótimo");
        assert!(encode_answer(QuestionKind::LikertScale, &options, &AnswerValue::Number(5.0)).is_err());
    }

    #[test]
    fn test_numeric_scale_bounds() {
        let ok = encode_answer(QuestionKind::NumericScale, &[], &AnswerValue::Number(10.0))
            .unwrap()
            .unwrap();
        assert_eq!(ok.answer, "10");
        assert!(encode_answer(QuestionKind::NumericScale, &[], &AnswerValue::Number(0.0)).is_err());
        assert!(encode_answer(QuestionKind::NumericScale, &[], &AnswerValue::Number(7.5)).is_err());
        assert!(encode_answer(QuestionKind::NumericScale, &[], &AnswerValue::Text("11".into())).is_err());
    }

    #[test]
    fn test_yes_no_and_blank_answers() {
        let yes = encode_answer(QuestionKind::YesNo, &[], &AnswerValue::Bool(true))
            .unwrap()
            .unwrap();
        assert_eq!(yes.answer, YES);
        assert_eq!(yes.numeric_value, Some(1.0));
        assert!(encode_answer(QuestionKind::YesNo, &[], &AnswerValue::Text("Talvez".into())).is_err());

        let blank = encode_answer(QuestionKind::Text, &[], &AnswerValue::Text("   ".into())).unwrap();
        assert!(blank.is_none());
    }

    #[test]
    fn test_answer_value_deserializes_untagged() {
        let values: Vec<AnswerValue> =
            serde_json::from_str(r#"["texto", 7, true, ["a", "b"]]"#).unwrap();
        assert_eq!(
            values,
            vec![
                AnswerValue::Text("texto".into()),
                AnswerValue::Number(7.0),
                AnswerValue::Bool(true),
                AnswerValue::Choices(opts(&["a", "b"])),
            ]
        );
    }

    #[test]
    fn test_kind_storage_names() {
        for kind in [
            QuestionKind::MultipleChoice,
            QuestionKind::Checkbox,
            QuestionKind::Text,
            QuestionKind::LikertScale,
            QuestionKind::NumericScale,
            QuestionKind::YesNo,
        ] {
            assert_eq!(kind.as_str().parse::<QuestionKind>().unwrap(), kind);
        }
    }
}
