use anyhow::{Context, Result};
use axum::{
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::services::{
    AlumniService, AuthService, AuthorizationService, CoordinatorService, DashboardService,
    EventService, FeedbackService, ImportService, ReportService, SurveyService,
};

use super::handlers::{
    alumni, auth, coordinators, dashboard, events, feedback, health, navigation, reports, surveys,
};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub institution: String,
    pub auth: AuthService,
    pub authorization: AuthorizationService,
    pub alumni: AlumniService,
    pub import: ImportService,
    pub coordinators: CoordinatorService,
    pub surveys: SurveyService,
    pub events: EventService,
    pub reports: ReportService,
    pub dashboards: DashboardService,
    pub feedback: FeedbackService,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: &AppConfig) -> Self {
        let alumni = AlumniService::new(db.clone());
        Self {
            institution: config.institution.name.clone(),
            auth: AuthService::new(db.clone())
                .with_session_hours(config.auth.session_hours)
                .with_demo_mode(config.demo_mode),
            authorization: AuthorizationService::new(db.clone())
                .with_session_hours(config.auth.session_hours),
            import: ImportService::new(alumni.clone()),
            alumni,
            coordinators: CoordinatorService::new(db.clone()),
            surveys: SurveyService::new(db.clone()),
            events: EventService::new(db.clone()),
            reports: ReportService::new(db.clone()),
            dashboards: DashboardService::new(db.clone()),
            feedback: FeedbackService::new(db.clone()),
            db,
        }
    }
}

pub async fn create_app(db: DatabaseConnection, config: &AppConfig) -> Result<Router> {
    let state = AppState::new(db, config);

    let cors = match config.server.cors_origin.as_deref() {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("invalid CORS origin {}", origin))?,
            )
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = Router::new()
        // Health check endpoint
        .route("/health", get(health::health_check))
        // API v1 routes
        .nest("/api/v1", api_v1_routes())
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state);

    Ok(app)
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        // Session routes
        .route("/auth/sign-up", post(auth::sign_up))
        .route("/auth/sign-in", post(auth::sign_in))
        .route("/auth/sign-out", post(auth::sign_out))
        .route("/auth/session", get(auth::current_session))
        .route("/auth/profile", put(auth::update_profile))
        .route("/navigation", get(navigation::shell))
        .route("/dashboard", get(dashboard::dashboard))
        // Alumni routes
        .route("/me/alumnus", get(alumni::get_own_profile).put(alumni::update_own_profile))
        .route("/alumni", get(alumni::list_alumni).post(alumni::register_alumnus))
        .route("/alumni/export", get(alumni::export_alumni))
        .route("/alumni/import", post(alumni::import_alumni))
        .route("/alumni/import/template", get(alumni::import_template))
        .route("/units", get(alumni::list_units))
        .route("/units/:code/courses", get(alumni::list_courses))
        .route("/coordinators", post(coordinators::register_coordinator))
        // Survey routes
        .route(
            "/survey-templates",
            get(surveys::list_templates).post(surveys::create_template),
        )
        .route(
            "/survey-templates/:id",
            get(surveys::get_template).put(surveys::update_template),
        )
        .route("/survey-templates/:id/questions", post(surveys::add_question))
        .route("/survey-templates/:id/publish", post(surveys::publish))
        .route(
            "/template-questions/:id",
            put(surveys::update_question).delete(surveys::remove_question),
        )
        .route("/template-questions/:id/move", post(surveys::move_question))
        .route("/template-questions/:id/options", post(surveys::add_option))
        .route(
            "/template-questions/:id/options/:index",
            axum::routing::delete(surveys::remove_option),
        )
        .route("/surveys", get(surveys::list_surveys))
        .route("/surveys/manage", get(surveys::list_surveys_for_staff))
        .route("/surveys/:id", get(surveys::get_survey))
        .route("/surveys/:id/active", put(surveys::set_active))
        .route("/surveys/:id/responses", post(surveys::submit))
        // Event routes
        .route("/events", get(events::list_events).post(events::create_event))
        .route("/events/manage", get(events::list_all_events))
        .route("/events/:id", get(events::get_event).put(events::update_event))
        .route("/events/:id/register", post(events::register))
        .route("/events/:id/rating", post(events::rate))
        .route(
            "/event-categories",
            get(events::list_categories).post(events::create_category),
        )
        .route("/event-categories/:id", put(events::update_category))
        // Report routes
        .route("/reports", get(reports::hub))
        .route("/reports/:kind", get(reports::report))
        .route("/reports/:kind/export", get(reports::export_report))
        // Feedback routes
        .route("/courses/:id/feedback", get(feedback::list_feedback))
        .route("/courses/:id/actions", get(feedback::list_actions))
        .route("/surveys/:id/feedback", post(feedback::recompute))
        .route("/corrective-actions", post(feedback::create_action))
        .route("/corrective-actions/:id/status", put(feedback::update_action_status))
}
