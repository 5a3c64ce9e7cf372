// ============================================================================
// Message Store Types - Core Data Types
// ============================================================================
//
// Data structures shared by the storage adapter, the authorization gate and
// the HTTP layer. No dependencies on databases or external services.
//
// Contents:
// - Message records and create/edit/delete payloads
// - Event-time parsing and time ranges for group listings
// - Dependency status reports
//
// ============================================================================

pub mod message;
pub mod status;
pub mod time;

// Re-exports for convenience
pub use message::*;
pub use status::*;
pub use time::*;
