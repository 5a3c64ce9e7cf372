// ============================================================================
// Logging Configuration
// ============================================================================

use crate::constants::DEFAULT_LOG_HASH_SALT;

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// Salt for `log_safe_id`, so actor ids never appear in logs verbatim
    pub hash_salt: String,
}

impl LoggingConfig {
    pub(crate) fn from_env() -> Self {
        let hash_salt = std::env::var("LOG_HASH_SALT")
            .ok()
            .filter(|salt| !salt.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_HASH_SALT.to_string());
        Self { hash_salt }
    }

    /// True when `LOG_HASH_SALT` was not provided.
    ///
    /// Config is loaded before the tracing subscriber exists, so the caller
    /// reports this once logging is up.
    pub fn uses_default_salt(&self) -> bool {
        self.hash_salt == DEFAULT_LOG_HASH_SALT
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            hash_salt: DEFAULT_LOG_HASH_SALT.to_string(),
        }
    }
}
