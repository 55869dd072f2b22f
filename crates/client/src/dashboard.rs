//! Dashboard data.

use tracing::debug;

use crate::api::ApiClient;

/// Status shown when the health check cannot be completed.
pub const OFFLINE: &str = "offline";

/// The API's self-reported health, or [`OFFLINE`] if it cannot be reached.
pub async fn backend_health(api: &ApiClient) -> String {
    match api.health().await {
        Ok(health) => health.status,
        Err(e) => {
            debug!(error = %e, "Health check failed");
            OFFLINE.to_string()
        }
    }
}
