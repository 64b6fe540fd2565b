//! HTML template rendering handlers.

mod admin;
mod login;
mod owners;

pub use admin::admin_handler;
pub use login::{LoginParams, login_handler, safe_next};
pub use owners::{owners_cancel_handler, owners_success_handler};
