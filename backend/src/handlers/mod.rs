//! HTTP request handlers

pub mod activity;
pub mod auth;
pub mod crop;
pub mod health;
pub mod lot;
pub mod project;
pub mod reporting;
pub mod user;

pub use activity::*;
pub use auth::*;
pub use crop::*;
pub use health::*;
pub use lot::*;
pub use project::*;
pub use reporting::*;
pub use user::*;
