//! HTTP middleware and extractors

pub mod auth;
pub mod json;

pub use auth::{auth_middleware, AuthUser};
pub use json::JsonBody;
