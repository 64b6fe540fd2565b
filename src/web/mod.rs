//! Server-rendered pages (Askama templates).
//!
//! - [`handlers`] - template rendering handlers
//! - [`middleware`] - admin session guard with login redirects
//! - [`routes`] - page route configuration

pub mod handlers;
pub mod middleware;
pub mod routes;
