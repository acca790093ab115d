//! Storage implementations for different backends

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::InMemoryEdtoyStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresEdtoyStore;

use crate::core::error::{StoreError, StoreResult};
use std::future::Future;
use std::time::Duration;

/// Time budget for a single store call.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(3);

/// Run one store call under `after`, classifying expiry as a timeout.
///
/// The future is dropped on expiry; whatever it already sent to the
/// backend may or may not have been applied.
pub(crate) async fn bounded<T, F>(operation: &'static str, after: Duration, call: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    match tokio::time::timeout(after, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                operation,
                timeout_ms = after.as_millis() as u64,
                "store call timed out"
            );
            Err(StoreError::Timeout { operation, after })
        }
    }
}
