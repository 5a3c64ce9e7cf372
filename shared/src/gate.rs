// ============================================================================
// Authorization Gate
// ============================================================================
//
// Every message route passes through here before touching storage.
//
// - Group checks ask the policy service whether the actor may view the group.
// - Message checks resolve the message first and run the group check against
//   the message's own `groupid`. A message that does not exist (or whose id
//   is malformed) is reported as not found without consulting the policy.
// - The gate fails closed: no decision from the policy service is an error,
//   never an allow.
//
// ============================================================================

use std::sync::Arc;

use msgstore_db::MessageStore;
use msgstore_error::{AppError, AppResult};
use msgstore_metrics::AUTHORIZATION_DECISIONS_TOTAL;
use msgstore_types::Message;

use crate::clients::{PolicyDecider, PolicyDecision};
use crate::routes::extractors::Actor;
use crate::status::{DependencyStatus, POLICY};
use crate::utils::log_safe_id;

fn record(outcome: &str) {
    AUTHORIZATION_DECISIONS_TOTAL
        .with_label_values(&[outcome])
        .inc();
}

pub struct AuthorizationGate {
    policy: Arc<dyn PolicyDecider>,
    store: Arc<dyn MessageStore>,
    status: DependencyStatus,
    hash_salt: String,
}

impl AuthorizationGate {
    pub fn new(
        policy: Arc<dyn PolicyDecider>,
        store: Arc<dyn MessageStore>,
        status: DependencyStatus,
        hash_salt: impl Into<String>,
    ) -> Self {
        Self {
            policy,
            store,
            status,
            hash_salt: hash_salt.into(),
        }
    }

    pub async fn authorize_for_group(&self, actor: &Actor, group_id: &str) -> AppResult<()> {
        let actor_hash = log_safe_id(&actor.user_id, &self.hash_salt);

        let decision = match self.policy.can_view(&actor.user_id, group_id).await {
            Ok(decision) => decision,
            Err(e) => {
                self.status.mark_down(POLICY, &e.to_string()).await;
                record("unavailable");
                tracing::error!(
                    actor_hash = %actor_hash,
                    group_id = %group_id,
                    error = %e,
                    "Policy decision unavailable, denying"
                );
                return Err(match e {
                    AppError::PolicyUnavailable(_) => e,
                    other => AppError::policy_unavailable(other.to_string()),
                });
            }
        };
        self.status.mark_up(POLICY).await;

        match decision {
            PolicyDecision::Allow => {
                record("allow");
                tracing::debug!(actor_hash = %actor_hash, group_id = %group_id, "Access allowed");
                Ok(())
            }
            PolicyDecision::Deny => {
                record("deny");
                tracing::warn!(actor_hash = %actor_hash, group_id = %group_id, "Access denied");
                Err(AppError::Unauthorized)
            }
        }
    }

    /// Returns the resolved message on success so callers need not refetch it
    pub async fn authorize_for_message(&self, actor: &Actor, message_id: &str) -> AppResult<Message> {
        let Some(message) = self.store.get_message(message_id).await? else {
            record("not_found");
            tracing::debug!(message_id = %message_id, "Message not found, policy not consulted");
            return Err(AppError::not_found("message"));
        };

        self.authorize_for_group(actor, &message.group_id).await?;
        Ok(message)
    }
}
