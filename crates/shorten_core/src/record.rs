/// Status value the service reports once a short code has been assigned.
pub const STATUS_ENCODED: &str = "encoded";

/// One shortening job as reported by the service.
///
/// `status` is kept as the raw string: anything other than [`STATUS_ENCODED`]
/// is treated as still pending, including values this client does not know.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShortenRecord {
    pub id: i64,
    pub created_at: String,
    pub updated_at: String,
    pub status: String,
    pub code: String,
    pub long_url: String,
}

impl ShortenRecord {
    pub fn is_encoded(&self) -> bool {
        self.status == STATUS_ENCODED
    }
}
