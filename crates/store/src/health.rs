//! Data store health checks.

use tracing::{debug, error};

use crate::client::RestStore;

/// Check data API reachability.
pub async fn check_connection(store: &RestStore) -> bool {
    match store.ping().await {
        Ok(()) => {
            debug!("data store connection healthy");
            true
        }
        Err(e) => {
            error!("data store health check failed: {}", e);
            false
        }
    }
}
