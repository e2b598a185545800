use actix_web::{Responder, get, web::Json};
use std::collections::BTreeMap;

/// Substrings that mark an environment variable as secret-like.
///
/// Matching keys are omitted from the response entirely rather than masked,
/// so callers can rely on the returned key set being free of credentials.
const SECRET_KEY_PATTERNS: &[&str] = &[
    "USER",
    "PASSWORD",
    "SECRET",
    "KEY",
    "TOKEN",
    "CREDENTIAL",
    "AUTH",
    "SHA256",
    "HASH",
];

/// Returns whether a key matches the secret deny-list, case-insensitively.
fn is_secret_key(key: &str) -> bool {
    let key = key.to_uppercase();
    SECRET_KEY_PATTERNS
        .iter()
        .any(|pattern| key.contains(pattern))
}

#[utoipa::path(
    summary = "Runtime environment snapshot",
    description = "Returns the process environment variables with every \
        secret-like key omitted. Useful for debugging deployed configuration.",
    responses(
        (status = 200, description = "Filtered environment returned successfully.",
            body = BTreeMap<String, String>),
    ),
    tag = "Environment",
)]
#[get("/api/env")]
pub async fn read_env() -> impl Responder {
    let variables: BTreeMap<String, String> = std::env::vars()
        .filter(|(key, _)| !is_secret_key(key))
        .collect();

    Json(variables)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_like_keys_are_detected() {
        assert!(is_secret_key("DB_PASSWORD"));
        assert!(is_secret_key("API_SECRET"));
        assert!(is_secret_key("AUTH_TOKEN"));
        assert!(is_secret_key("aws_access_key_id"));
        assert!(is_secret_key("GIT_CREDENTIALS"));
    }

    #[test]
    fn ordinary_keys_pass_the_filter() {
        assert!(!is_secret_key("PATH"));
        assert!(!is_secret_key("DB_HOST"));
        assert!(!is_secret_key("APP_ENVIRONMENT"));
    }
}
