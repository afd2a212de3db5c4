pub mod alumni;
pub mod coordinators;
pub mod corrective_actions;
pub mod courses;
pub mod event_categories;
pub mod event_participants;
pub mod event_ratings;
pub mod events;
pub mod pedagogical_feedback;
pub mod profiles;
pub mod question_templates;
pub mod questions;
pub mod responses;
pub mod sessions;
pub mod survey_templates;
pub mod surveys;
pub mod units;
