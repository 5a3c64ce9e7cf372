// ============================================================================
// Display Name Resolution
// ============================================================================
//
// Thread listings can carry the authors' display names. Lookups for a batch
// run concurrently and are all awaited before the response is built. One
// failing lookup does not fail the batch; the batch is flagged degraded and
// the directory is recorded as down.
//
// ============================================================================

use std::collections::{BTreeMap, BTreeSet};

use futures_util::future::join_all;
use msgstore_metrics::NAME_RESOLUTION_DEGRADED_TOTAL;

use crate::clients::UserDirectory;
use crate::status::{DependencyStatus, DIRECTORY};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameResolution {
    /// user id -> display name, for ids the directory knows
    pub names: BTreeMap<String, String>,
    /// ids whose lookup failed
    pub unresolved: Vec<String>,
    pub degraded: bool,
}

pub async fn resolve_names<'a, I>(
    directory: &dyn UserDirectory,
    status: &DependencyStatus,
    user_ids: I,
) -> NameResolution
where
    I: IntoIterator<Item = &'a str>,
{
    let ids: BTreeSet<&str> = user_ids.into_iter().collect();

    let lookups = ids.iter().map(|id| async move {
        let result = directory.display_name(id).await;
        (*id, result)
    });
    let results = join_all(lookups).await;

    let mut resolution = NameResolution::default();
    let mut last_error = None;
    for (id, result) in results {
        match result {
            Ok(Some(name)) => {
                resolution.names.insert(id.to_string(), name);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Display name lookup failed");
                resolution.unresolved.push(id.to_string());
                last_error = Some(e.to_string());
            }
        }
    }

    match last_error {
        Some(error) => {
            resolution.degraded = true;
            NAME_RESOLUTION_DEGRADED_TOTAL.inc();
            status.mark_down(DIRECTORY, &error).await;
        }
        None if !ids.is_empty() => status.mark_up(DIRECTORY).await,
        None => {}
    }

    resolution
}
