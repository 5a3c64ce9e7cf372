use std::sync::Arc;

use msgstore_config::Config;
use msgstore_db::MessageStore;

use crate::clients::{PolicyDecider, SessionResolver, UserDirectory};
use crate::gate::AuthorizationGate;
use crate::status::{DependencyStatus, DIRECTORY, POLICY, SESSION};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct ServiceContext {
    pub store: Arc<dyn MessageStore>,
    pub gate: Arc<AuthorizationGate>,
    pub sessions: Arc<dyn SessionResolver>,
    /// `None` when no directory is configured; names are then never resolved
    pub directory: Option<Arc<dyn UserDirectory>>,
    pub status: DependencyStatus,
    pub config: Arc<Config>,
}

impl ServiceContext {
    pub fn new(
        config: Arc<Config>,
        store: Arc<dyn MessageStore>,
        sessions: Arc<dyn SessionResolver>,
        policy: Arc<dyn PolicyDecider>,
        directory: Option<Arc<dyn UserDirectory>>,
    ) -> Self {
        let status = if directory.is_some() {
            DependencyStatus::with_dependencies(&[SESSION, POLICY, DIRECTORY])
        } else {
            DependencyStatus::with_dependencies(&[SESSION, POLICY])
        };

        let gate = Arc::new(AuthorizationGate::new(
            policy,
            store.clone(),
            status.clone(),
            config.logging.hash_salt.clone(),
        ));

        Self {
            store,
            gate,
            sessions,
            directory,
            status,
            config,
        }
    }
}
