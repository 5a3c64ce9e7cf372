use serde::{Deserialize, Serialize};

/// Names of backing services, split by last observed state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyReport {
    pub up: Vec<String>,
    pub down: Vec<String>,
}

impl DependencyReport {
    pub fn is_healthy(&self) -> bool {
        self.down.is_empty()
    }

    /// Adds `other` into this report, keeping each name once and sorted
    pub fn merge(&mut self, other: DependencyReport) {
        self.up.extend(other.up);
        self.down.extend(other.down);
        self.up.sort();
        self.up.dedup();
        self.down.sort();
        self.down.dedup();
        // A dependency seen down anywhere is reported down
        self.up.retain(|name| !self.down.contains(name));
    }
}

/// Liveness of the storage backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStatus {
    pub running: bool,
    pub deps: DependencyReport,
}
