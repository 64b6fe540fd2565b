//! Query-string flag parsing.

/// `1`, `true`, `yes` and `on` (any case) are truthy; anything else is not.
pub fn is_truthy(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}
