//! Business logic services for the BioGarden platform

pub mod activity;
pub mod auth;
pub mod crop;
pub mod lot;
pub mod project;
pub mod reporting;

pub use activity::ActivityService;
pub use auth::AuthService;
pub use crop::CropService;
pub use lot::LotService;
pub use project::ProjectService;
pub use reporting::ReportingService;
