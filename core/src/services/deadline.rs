//! Optional per-call deadline applied to repository calls.

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;
use tracing::warn;

use crate::errors::{DomainError, DomainResult};

/// Await `future`, failing with `DomainError::Timeout` once `limit` elapses
///
/// With no limit the future is awaited as-is. On expiry the inner future is
/// dropped, which cancels the in-flight call.
pub(crate) async fn with_deadline<F, T>(
    limit: Option<Duration>,
    operation: &'static str,
    future: F,
) -> DomainResult<T>
where
    F: Future<Output = DomainResult<T>>,
{
    match limit {
        None => future.await,
        Some(limit) => match timeout(limit, future).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    operation,
                    limit_ms = limit.as_millis() as u64,
                    "Repository call timed out"
                );
                Err(DomainError::Timeout)
            }
        },
    }
}
