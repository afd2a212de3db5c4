use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::database::entities::{event_categories, event_participants, event_ratings, events};
use crate::errors::{CoreResult, EventError};

pub const STATUS_DRAFT: &str = "rascunho";
pub const STATUS_PUBLISHED: &str = "publicado";
pub const STATUS_CANCELLED: &str = "cancelado";
pub const STATUS_FINISHED: &str = "finalizado";
pub const STATUSES: [&str; 4] = [STATUS_DRAFT, STATUS_PUBLISHED, STATUS_CANCELLED, STATUS_FINISHED];
pub const MODALITIES: [&str; 3] = ["presencial", "online", "hibrido"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFilters {
    pub category_id: Option<i32>,
    pub modality: Option<String>,
}

fn default_modality() -> String {
    "presencial".to_string()
}

fn default_status() -> String {
    STATUS_DRAFT.to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventInput {
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    #[serde(default = "default_modality")]
    pub modality: String,
    pub online_link: Option<String>,
    pub capacity: Option<i32>,
    #[serde(default = "default_true")]
    pub free: bool,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub certificate: bool,
    pub workload_hours: Option<i32>,
    pub organizer: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i32>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub modality: Option<String>,
    pub online_link: Option<String>,
    pub capacity: Option<i32>,
    pub free: Option<bool>,
    pub price: Option<f64>,
    pub certificate: Option<bool>,
    pub workload_hours: Option<i32>,
    pub organizer: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

/// Star ratings use 0 for "not rated"
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RatingInput {
    pub overall: i32,
    #[serde(default)]
    pub organization: i32,
    #[serde(default)]
    pub content: i32,
    #[serde(default)]
    pub speakers: i32,
    #[serde(default)]
    pub infrastructure: i32,
    pub would_recommend: Option<bool>,
    pub positives: Option<String>,
    pub improvements: Option<String>,
    pub other_interests: Option<String>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventView {
    #[serde(flatten)]
    pub event: events::Model,
    pub category: Option<event_categories::Model>,
    pub occupied: usize,
    pub registered: bool,
    pub rated: bool,
    pub can_register: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EventSummary {
    pub registered_by_me: usize,
    pub occupied_seats: usize,
    pub free_events: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventListing {
    pub events: Vec<EventView>,
    pub summary: EventSummary,
}

impl EventFilters {
    pub fn matches(&self, event: &events::Model) -> bool {
        if let Some(category_id) = self.category_id {
            if event.category_id != Some(category_id) {
                return false;
            }
        }
        if let Some(modality) = self.modality.as_deref().filter(|m| !m.is_empty()) {
            if event.modality != modality {
                return false;
            }
        }
        true
    }
}

impl EventSummary {
    pub fn from_views(views: &[EventView]) -> Self {
        Self {
            registered_by_me: views.iter().filter(|v| v.registered).count(),
            occupied_seats: views.iter().map(|v| v.occupied).sum(),
            free_events: views.iter().filter(|v| v.event.free).count(),
        }
    }
}

/// Published, not started, not registered and with a seat left
pub fn can_register(
    event: &events::Model,
    occupied: usize,
    registered: bool,
    now: DateTime<Utc>,
) -> bool {
    let has_seat = event
        .capacity
        .map(|c| occupied < c.max(0) as usize)
        .unwrap_or(true);
    event.status == STATUS_PUBLISHED && event.starts_at > now && !registered && has_seat
}

fn star(field: &'static str, value: i32, required: bool) -> Result<Option<i32>, EventError> {
    match value {
        0 if !required => Ok(None),
        1..=5 => Ok(Some(value)),
        _ => Err(EventError::InvalidRating {
            field,
            reason: if required {
                "must be between 1 and 5".to_string()
            } else {
                "must be 0 or between 1 and 5".to_string()
            },
        }),
    }
}

/// Checked star values: (overall, organization, content, speakers, infrastructure)
pub fn validate_rating(
    input: &RatingInput,
) -> Result<(i32, [Option<i32>; 4], bool), EventError> {
    let overall = star("overall", input.overall, true)?.unwrap_or(input.overall);
    let others = [
        star("organization", input.organization, false)?,
        star("content", input.content, false)?,
        star("speakers", input.speakers, false)?,
        star("infrastructure", input.infrastructure, false)?,
    ];
    let recommend = input.would_recommend.ok_or(EventError::InvalidRating {
        field: "would_recommend",
        reason: "is required".to_string(),
    })?;
    Ok((overall, others, recommend))
}

fn validate_fields(
    title: &str,
    modality: &str,
    status: &str,
    starts_at: DateTime<Utc>,
    ends_at: Option<DateTime<Utc>>,
    capacity: Option<i32>,
    price: f64,
) -> Result<(), EventError> {
    if title.trim().is_empty() {
        return Err(EventError::Invalid("title is required".to_string()));
    }
    if !MODALITIES.contains(&modality) {
        return Err(EventError::Invalid(format!("unknown modality {}", modality)));
    }
    if !STATUSES.contains(&status) {
        return Err(EventError::Invalid(format!("unknown status {}", status)));
    }
    if let Some(end) = ends_at {
        if end < starts_at {
            return Err(EventError::Invalid("end must not precede start".to_string()));
        }
    }
    if capacity.map(|c| c <= 0).unwrap_or(false) {
        return Err(EventError::Invalid("capacity must be positive".to_string()));
    }
    if price < 0.0 {
        return Err(EventError::Invalid("price must not be negative".to_string()));
    }
    Ok(())
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Clone)]
pub struct EventService {
    db: DatabaseConnection,
}

impl EventService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ----- categories -----

    pub async fn list_categories(&self) -> CoreResult<Vec<event_categories::Model>> {
        Ok(event_categories::Entity::find()
            .order_by_asc(event_categories::Column::Name)
            .all(&self.db)
            .await?)
    }

    pub async fn create_category(&self, input: CategoryInput) -> CoreResult<event_categories::Model> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(EventError::Invalid("category name is required".to_string()).into());
        }

        let category = event_categories::ActiveModel {
            name: Set(name),
            description: Set(clean(input.description)),
            color: Set(input.color.unwrap_or_else(|| "#6b7280".to_string())),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Created event category {}", category.name);
        Ok(category)
    }

    pub async fn update_category(
        &self,
        category_id: i32,
        input: CategoryInput,
    ) -> CoreResult<event_categories::Model> {
        let category = event_categories::Entity::find_by_id(category_id)
            .one(&self.db)
            .await?
            .ok_or(EventError::CategoryNotFound(category_id))?;

        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(EventError::Invalid("category name is required".to_string()).into());
        }

        let mut active: event_categories::ActiveModel = category.into();
        active.name = Set(name);
        active.description = Set(clean(input.description));
        if let Some(color) = input.color {
            active.color = Set(color);
        }
        Ok(active.update(&self.db).await?)
    }

    async fn ensure_category(&self, category_id: Option<i32>) -> CoreResult<()> {
        if let Some(id) = category_id {
            event_categories::Entity::find_by_id(id)
                .one(&self.db)
                .await?
                .ok_or(EventError::CategoryNotFound(id))?;
        }
        Ok(())
    }

    // ----- events -----

    pub async fn create_event(
        &self,
        created_by: Option<i32>,
        input: EventInput,
    ) -> CoreResult<events::Model> {
        validate_fields(
            &input.title,
            &input.modality,
            &input.status,
            input.starts_at,
            input.ends_at,
            input.capacity,
            input.price,
        )?;
        self.ensure_category(input.category_id).await?;

        let now = Utc::now();
        let event = events::ActiveModel {
            title: Set(input.title.trim().to_string()),
            description: Set(clean(input.description)),
            category_id: Set(input.category_id),
            starts_at: Set(input.starts_at),
            ends_at: Set(input.ends_at),
            location: Set(clean(input.location)),
            modality: Set(input.modality),
            online_link: Set(clean(input.online_link)),
            capacity: Set(input.capacity),
            price: Set(if input.free { 0.0 } else { input.price }),
            free: Set(input.free),
            certificate: Set(input.certificate),
            workload_hours: Set(input.workload_hours),
            organizer: Set(clean(input.organizer)),
            status: Set(input.status),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Created event {} ({})", event.id, event.title);
        Ok(event)
    }

    pub async fn update_event(&self, event_id: i32, update: EventUpdate) -> CoreResult<events::Model> {
        let event = self.find_event(event_id).await?;

        let title = update.title.unwrap_or_else(|| event.title.clone());
        let modality = update.modality.unwrap_or_else(|| event.modality.clone());
        let status = update.status.unwrap_or_else(|| event.status.clone());
        let starts_at = update.starts_at.unwrap_or(event.starts_at);
        let ends_at = update.ends_at.or(event.ends_at);
        let capacity = update.capacity.or(event.capacity);
        let free = update.free.unwrap_or(event.free);
        let price = if free { 0.0 } else { update.price.unwrap_or(event.price) };

        validate_fields(&title, &modality, &status, starts_at, ends_at, capacity, price)?;
        self.ensure_category(update.category_id).await?;

        let mut active: events::ActiveModel = event.into();
        active.title = Set(title.trim().to_string());
        active.modality = Set(modality);
        active.status = Set(status);
        active.starts_at = Set(starts_at);
        active.ends_at = Set(ends_at);
        active.capacity = Set(capacity);
        active.free = Set(free);
        active.price = Set(price);
        if let Some(category_id) = update.category_id {
            active.category_id = Set(Some(category_id));
        }
        if let Some(description) = update.description {
            active.description = Set(clean(Some(description)));
        }
        if let Some(location) = update.location {
            active.location = Set(clean(Some(location)));
        }
        if let Some(link) = update.online_link {
            active.online_link = Set(clean(Some(link)));
        }
        if let Some(certificate) = update.certificate {
            active.certificate = Set(certificate);
        }
        if let Some(hours) = update.workload_hours {
            active.workload_hours = Set(Some(hours));
        }
        if let Some(organizer) = update.organizer {
            active.organizer = Set(clean(Some(organizer)));
        }
        active.updated_at = Set(Utc::now());

        Ok(active.update(&self.db).await?)
    }

    async fn find_event(&self, event_id: i32) -> CoreResult<events::Model> {
        Ok(events::Entity::find_by_id(event_id)
            .one(&self.db)
            .await?
            .ok_or(EventError::NotFound(event_id))?)
    }

    async fn occupied(&self, event_id: i32) -> CoreResult<usize> {
        Ok(event_participants::Entity::find()
            .filter(event_participants::Column::EventId.eq(event_id))
            .count(&self.db)
            .await? as usize)
    }

    async fn views(
        &self,
        rows: Vec<events::Model>,
        alumnus_id: Option<i32>,
    ) -> CoreResult<Vec<EventView>> {
        let now = Utc::now();
        let categories: HashMap<i32, event_categories::Model> = self
            .list_categories()
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let event_ids: Vec<i32> = rows.iter().map(|e| e.id).collect();
        let occupied: HashMap<i32, usize> = if event_ids.is_empty() {
            HashMap::new()
        } else {
            event_participants::Entity::find()
                .select_only()
                .column(event_participants::Column::EventId)
                .column_as(Expr::col(event_participants::Column::Id).count(), "seats")
                .filter(event_participants::Column::EventId.is_in(event_ids))
                .group_by(event_participants::Column::EventId)
                .into_tuple::<(i32, i64)>()
                .all(&self.db)
                .await?
                .into_iter()
                .map(|(event_id, seats)| (event_id, seats.max(0) as usize))
                .collect()
        };

        let mine: HashSet<i32> = match alumnus_id {
            Some(id) => event_participants::Entity::find()
                .filter(event_participants::Column::AlumnusId.eq(id))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|p| p.event_id)
                .collect(),
            None => HashSet::new(),
        };

        let rated: HashSet<i32> = match alumnus_id {
            Some(id) => event_ratings::Entity::find()
                .filter(event_ratings::Column::AlumnusId.eq(id))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|r| r.event_id)
                .collect(),
            None => HashSet::new(),
        };

        Ok(rows
            .into_iter()
            .map(|event| {
                let seats = occupied.get(&event.id).copied().unwrap_or(0);
                let registered = mine.contains(&event.id);
                EventView {
                    category: event.category_id.and_then(|id| categories.get(&id).cloned()),
                    occupied: seats,
                    registered,
                    rated: rated.contains(&event.id),
                    can_register: alumnus_id.is_some() && can_register(&event, seats, registered, now),
                    event,
                }
            })
            .collect())
    }

    /// Published and finalized events, soonest first
    pub async fn list_events(
        &self,
        alumnus_id: Option<i32>,
        filters: &EventFilters,
    ) -> CoreResult<EventListing> {
        let rows: Vec<events::Model> = events::Entity::find()
            .filter(events::Column::Status.is_in([STATUS_PUBLISHED, STATUS_FINISHED]))
            .order_by_asc(events::Column::StartsAt)
            .all(&self.db)
            .await?
            .into_iter()
            .filter(|e| filters.matches(e))
            .collect();

        let events = self.views(rows, alumnus_id).await?;
        Ok(EventListing {
            summary: EventSummary::from_views(&events),
            events,
        })
    }

    /// Every event regardless of status, for staff screens
    pub async fn list_all(&self) -> CoreResult<Vec<EventView>> {
        let rows = events::Entity::find()
            .order_by_desc(events::Column::StartsAt)
            .all(&self.db)
            .await?;
        self.views(rows, None).await
    }

    pub async fn get_event(&self, event_id: i32, alumnus_id: Option<i32>) -> CoreResult<EventView> {
        let event = self.find_event(event_id).await?;
        let mut views = self.views(vec![event], alumnus_id).await?;
        Ok(views.remove(0))
    }

    /// Published events that have not started yet
    pub async fn upcoming(&self, limit: usize) -> CoreResult<Vec<events::Model>> {
        Ok(events::Entity::find()
            .filter(events::Column::Status.eq(STATUS_PUBLISHED))
            .filter(events::Column::StartsAt.gt(Utc::now()))
            .order_by_asc(events::Column::StartsAt)
            .limit(limit as u64)
            .all(&self.db)
            .await?)
    }

    pub async fn count_upcoming(&self) -> CoreResult<usize> {
        Ok(events::Entity::find()
            .filter(events::Column::Status.eq(STATUS_PUBLISHED))
            .filter(events::Column::StartsAt.gt(Utc::now()))
            .count(&self.db)
            .await? as usize)
    }

    pub async fn register(
        &self,
        event_id: i32,
        alumnus_id: i32,
    ) -> CoreResult<event_participants::Model> {
        let event = self.find_event(event_id).await?;

        if event.status != STATUS_PUBLISHED {
            return Err(EventError::NotPublished.into());
        }
        if event.starts_at <= Utc::now() {
            return Err(EventError::AlreadyStarted.into());
        }

        let already = event_participants::Entity::find()
            .filter(event_participants::Column::EventId.eq(event_id))
            .filter(event_participants::Column::AlumnusId.eq(alumnus_id))
            .one(&self.db)
            .await?;
        if already.is_some() {
            return Err(EventError::AlreadyRegistered.into());
        }

        if let Some(capacity) = event.capacity {
            if self.occupied(event_id).await? >= capacity.max(0) as usize {
                return Err(EventError::Full.into());
            }
        }

        let participant = event_participants::ActiveModel::new(event_id, alumnus_id)
            .insert(&self.db)
            .await?;
        info!("Alumnus {} registered for event {}", alumnus_id, event_id);
        Ok(participant)
    }

    pub async fn rate(
        &self,
        event_id: i32,
        alumnus_id: i32,
        input: RatingInput,
    ) -> CoreResult<event_ratings::Model> {
        self.find_event(event_id).await?;
        let (overall, [organization, content, speakers, infrastructure], would_recommend) =
            validate_rating(&input)?;

        let registered = event_participants::Entity::find()
            .filter(event_participants::Column::EventId.eq(event_id))
            .filter(event_participants::Column::AlumnusId.eq(alumnus_id))
            .one(&self.db)
            .await?;
        if registered.is_none() {
            return Err(EventError::NotRegistered.into());
        }

        let existing = event_ratings::Entity::find()
            .filter(event_ratings::Column::EventId.eq(event_id))
            .filter(event_ratings::Column::AlumnusId.eq(alumnus_id))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(EventError::AlreadyRated.into());
        }

        let rating = event_ratings::ActiveModel {
            event_id: Set(event_id),
            alumnus_id: Set(alumnus_id),
            overall: Set(overall),
            organization: Set(organization),
            content: Set(content),
            speakers: Set(speakers),
            infrastructure: Set(infrastructure),
            would_recommend: Set(would_recommend),
            positives: Set(clean(input.positives)),
            improvements: Set(clean(input.improvements)),
            other_interests: Set(clean(input.other_interests)),
            comments: Set(clean(input.comments)),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        info!("Alumnus {} rated event {} with {}", alumnus_id, event_id, overall);
        Ok(rating)
    }
}
