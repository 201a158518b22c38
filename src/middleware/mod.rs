//! Middleware module
//!
//! The bearer-token gate protecting authenticated routes.

mod auth_middleware;

pub use auth_middleware::{AuthMiddleware, AuthenticatedUser};
