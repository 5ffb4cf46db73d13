//! Domain models for the BioGarden platform

mod activity;
mod crop;
mod lot;
mod project;
mod report;
mod user;

pub use activity::*;
pub use crop::*;
pub use lot::*;
pub use project::*;
pub use report::*;
pub use user::*;
