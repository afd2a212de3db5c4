pub mod alumni;
pub mod auth;
pub mod coordinators;
pub mod dashboard;
pub mod events;
pub mod feedback;
pub mod health;
pub mod navigation;
pub mod reports;
pub mod surveys;
