// ============================================================================
// Configuration Constants
// ============================================================================

// Default port values
pub(crate) const DEFAULT_PORT: u16 = 8080;

// MongoDB defaults
pub(crate) const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
pub(crate) const DEFAULT_MONGODB_DATABASE: &str = "msgstore";
pub(crate) const DEFAULT_MONGODB_COLLECTION: &str = "messages";
pub(crate) const DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64 = 10;
pub(crate) const DEFAULT_DB_SERVER_SELECTION_TIMEOUT_SECS: u64 = 5;

// Collaborator HTTP clients
pub(crate) const DEFAULT_SERVICE_REQUEST_TIMEOUT_SECS: u64 = 5;

// Salt mixed into hashed identifiers in logs
pub(crate) const DEFAULT_LOG_HASH_SALT: &str = "msgstore";

// Request body limit for message payloads (in bytes)
pub const MAX_REQUEST_BODY_SIZE: usize = 64 * 1024; // 64 KB
