//! JSON API layer.
//!
//! - [`dto`] - request/response shapes
//! - [`extract`] - extractors rendering rejections as [`crate::AppError`]
//! - [`handlers`] - endpoint handlers
//! - [`middleware`] - admin session guard, rate limiting, request tracing
//! - [`routes`] - route tables

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
