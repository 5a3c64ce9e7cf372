// ============================================================================
// Dependency Status Registry
// ============================================================================
//
// Last observed state of each backing service the request path talks to.
// Callers record outcomes as a side effect of real traffic; nothing here
// probes on its own. The registry is read only by `GET /status`.
//
// ============================================================================

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use msgstore_metrics::DEPENDENCY_FAILURES_TOTAL;
use msgstore_types::DependencyReport;
use tokio::sync::RwLock;

pub const SESSION: &str = "session";
pub const POLICY: &str = "policy";
pub const DIRECTORY: &str = "directory";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyState {
    pub up: bool,
    pub last_error: Option<String>,
    pub changed_at: DateTime<Utc>,
}

impl DependencyState {
    fn up() -> Self {
        Self {
            up: true,
            last_error: None,
            changed_at: Utc::now(),
        }
    }
}

/// Cloneable handle; every clone shares the same registry
#[derive(Clone, Default)]
pub struct DependencyStatus {
    inner: Arc<RwLock<HashMap<&'static str, DependencyState>>>,
}

impl DependencyStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with `names`, all assumed up
    pub fn with_dependencies(names: &[&'static str]) -> Self {
        let map = names
            .iter()
            .map(|name| (*name, DependencyState::up()))
            .collect();
        Self {
            inner: Arc::new(RwLock::new(map)),
        }
    }

    pub async fn mark_up(&self, name: &'static str) {
        {
            let states = self.inner.read().await;
            if states.get(name).is_some_and(|state| state.up) {
                return;
            }
        }

        let mut states = self.inner.write().await;
        let previous = states.insert(name, DependencyState::up());
        if previous.is_some_and(|state| !state.up) {
            tracing::info!(dependency = name, "Dependency recovered");
        }
    }

    pub async fn mark_down(&self, name: &'static str, error: &str) {
        DEPENDENCY_FAILURES_TOTAL.with_label_values(&[name]).inc();

        let mut states = self.inner.write().await;
        match states.get_mut(name) {
            Some(state) if !state.up => {
                state.last_error = Some(error.to_string());
            }
            _ => {
                tracing::warn!(dependency = name, error = %error, "Dependency marked down");
                states.insert(
                    name,
                    DependencyState {
                        up: false,
                        last_error: Some(error.to_string()),
                        changed_at: Utc::now(),
                    },
                );
            }
        }
    }

    pub async fn state(&self, name: &str) -> Option<DependencyState> {
        self.inner.read().await.get(name).cloned()
    }

    pub async fn snapshot(&self) -> DependencyReport {
        let states = self.inner.read().await;
        let mut report = DependencyReport::default();
        for (name, state) in states.iter() {
            if state.up {
                report.up.push(name.to_string());
            } else {
                report.down.push(name.to_string());
            }
        }
        report.up.sort();
        report.down.sort();
        report
    }
}
