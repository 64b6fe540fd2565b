//! Login page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::Query, response::IntoResponse};
use serde::Deserialize;

pub const DEFAULT_NEXT: &str = "/admin";

#[derive(Debug, Default, Deserialize)]
pub struct LoginParams {
    pub next: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
struct LoginTemplate {
    next: String,
}

/// Renders the password form.
///
/// # Endpoint
///
/// `GET /admin/login?next=/admin`
///
/// After a successful login the browser is sent to `next`, which must be a
/// local `/admin` path.
pub async fn login_handler(Query(params): Query<LoginParams>) -> impl IntoResponse {
    LoginTemplate {
        next: safe_next(params.next.as_deref()),
    }
}

/// Keeps post-login redirects on this site and inside the admin area.
pub fn safe_next(next: Option<&str>) -> String {
    match next {
        Some(path)
            if path.starts_with("/admin")
                && !path.starts_with("/admin/login")
                && !path.contains("//")
                && !path.contains('\\') =>
        {
            path.to_string()
        }
        _ => DEFAULT_NEXT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next() {
        assert_eq!(safe_next(Some("/admin")), "/admin");
        assert_eq!(safe_next(Some("/admin/claims")), "/admin/claims");
        assert_eq!(safe_next(Some("https://evil.test/admin")), DEFAULT_NEXT);
        assert_eq!(safe_next(Some("//evil.test")), DEFAULT_NEXT);
        assert_eq!(safe_next(Some("/admin//evil.test")), DEFAULT_NEXT);
        assert_eq!(safe_next(Some("/admin/login")), DEFAULT_NEXT);
        assert_eq!(safe_next(None), DEFAULT_NEXT);
    }
}
