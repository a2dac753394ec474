pub const EMPTY_URL: &str = "Please enter a URL";
pub const INVALID_URL: &str = "Please enter a valid URL (must start with http:// or https://)";
pub const INVALID_CALLBACK_URL: &str =
    "Please enter a valid callback URL (must start with http:// or https://)";
pub const EMPTY_DECODE_INPUT: &str = "Please enter a shortened URL";
pub const NO_DATA: &str = "No data returned from server";
pub const SUBMIT_FALLBACK: &str = "Failed to submit URL";
pub const LOOKUP_FALLBACK: &str = "Failed to get shortened URL";
pub const DECODE_FALLBACK: &str = "Failed to decode URL";

/// Terminal failure of a workflow run, shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    /// Input rejected locally; no request was made.
    #[error("{0}")]
    Validation(String),
    /// The service answered with an error.
    #[error("{0}")]
    Service(String),
    /// The attempt budget ran out before the record was encoded.
    #[error("Timeout: URL encoding is taking longer than expected. Please try again later.")]
    Timeout,
}

impl WorkflowError {
    /// Service error carrying `message`, or `fallback` when the server sent none.
    pub fn service(message: impl Into<String>, fallback: &str) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self::Service(fallback.to_string())
        } else {
            Self::Service(message)
        }
    }
}
