pub mod alumni_service;
pub mod auth_service;
pub mod authorization;
pub mod coordinator_service;
pub mod dashboard_service;
pub mod event_service;
pub mod feedback_service;
pub mod import_service;
pub mod report_service;
pub mod survey_service;

pub use alumni_service::AlumniService;
pub use auth_service::AuthService;
pub use authorization::{AuthorizationService, SessionContext};
pub use coordinator_service::CoordinatorService;
pub use dashboard_service::DashboardService;
pub use event_service::EventService;
pub use feedback_service::FeedbackService;
pub use import_service::ImportService;
pub use report_service::ReportService;
pub use survey_service::SurveyService;
