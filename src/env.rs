//! Environment lookup with a fallback.

/// Returns the value of `name` if it is set and non-empty, else `default`.
///
/// No validation, no parsing: callers own type conversion.
///
/// # Example
/// ```
/// let addr = runkit::get_env("RUNKIT_DOC_UNSET_VARIABLE", "0.0.0.0:8080");
/// assert_eq!(addr, "0.0.0.0:8080");
/// ```
pub fn get_env(name: &str, default: &str) -> String {
    non_empty_or(std::env::var(name).ok(), default)
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => default.to_string(),
    }
}
