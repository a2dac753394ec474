use url::Url;

use crate::WorkflowError;

/// Host used for user-facing short links when no redirect host is configured.
pub const DEFAULT_SHORT_LINK_HOST: &str = "http://localhost:8080";
/// Host used to expand bare codes in the decode form when no redirect host is configured.
pub const DEFAULT_DECODE_HOST: &str = "http://localhost:8080/api/v1";

/// Returns true only if `candidate` parses as an absolute `http` or `https` URL.
pub fn is_valid_url(candidate: &str) -> bool {
    Url::parse(candidate)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Joins `tail` onto `host`, dropping a single trailing slash from the host first.
pub fn join_on_host(host: &str, tail: &str) -> String {
    let host = host.strip_suffix('/').unwrap_or(host);
    format!("{host}/{tail}")
}

/// Turns raw decode-form input into the absolute short URL sent to the service.
///
/// Input with a scheme passes through. A bare code (no `/`) is joined onto
/// `default_host`. Anything else gets `http://` prepended.
pub fn normalize_decode_input(raw: &str, default_host: &str) -> Result<String, WorkflowError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(WorkflowError::Validation(
            crate::EMPTY_DECODE_INPUT.to_string(),
        ));
    }

    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Ok(trimmed.to_string());
    }

    if trimmed.contains('/') {
        Ok(format!("http://{trimmed}"))
    } else {
        Ok(join_on_host(default_host, trimmed))
    }
}
