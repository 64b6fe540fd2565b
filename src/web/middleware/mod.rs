//! Middleware for the server-rendered pages.

pub mod web_auth;
