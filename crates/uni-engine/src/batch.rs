//! Batch Transform: order-preserving fan-out over many records.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Serialize, Serializer};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use uni_core::{Transformed, UnifyError};

/// Outcome for one input of a batch, at the input's index.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchItem<T> {
    Succeeded(Transformed<T>),
    Failed(ItemFailure),
}

/// Marker left in place of an item whose transform failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub index: usize,
    #[serde(serialize_with = "display")]
    pub error: UnifyError,
}

fn display<S: Serializer>(error: &UnifyError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

impl<T> BatchItem<T> {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Succeeded(transformed) => Some(&transformed.value),
            Self::Failed(_) => None,
        }
    }

    /// # Errors
    ///
    /// Returns the [`ItemFailure`] if this item failed.
    pub fn into_result(self) -> Result<Transformed<T>, ItemFailure> {
        match self {
            Self::Succeeded(transformed) => Ok(transformed),
            Self::Failed(failure) => Err(failure),
        }
    }
}

/// Run `task` for every item with at most `concurrency` in flight, and return
/// results in input order.
///
/// A failed or aborted task becomes a [`BatchItem::Failed`] at its index; it
/// never shortens the output.
pub async fn run_batch<I, T, F, Fut>(items: Vec<I>, concurrency: usize, task: F) -> Vec<BatchItem<T>>
where
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<Transformed<T>, UnifyError>> + Send + 'static,
    T: Send + 'static,
{
    let count = items.len();
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut set = JoinSet::new();

    for (idx, item) in items.into_iter().enumerate() {
        let fut = task(item);
        let sem = Arc::clone(&semaphore);
        set.spawn(async move {
            let Ok(_permit) = sem.acquire().await else {
                return (idx, Err(UnifyError::Cancelled("batch scheduler closed".into())));
            };
            (idx, fut.await)
        });
    }

    let mut slots: Vec<Option<BatchItem<T>>> = (0..count).map(|_| None).collect();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((idx, Ok(transformed))) => slots[idx] = Some(BatchItem::Succeeded(transformed)),
            Ok((idx, Err(error))) => {
                tracing::warn!(index = idx, %error, "batch item failed");
                slots[idx] = Some(BatchItem::Failed(ItemFailure { index: idx, error }));
            }
            Err(error) => tracing::warn!(%error, "batch task did not complete"),
        }
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.unwrap_or_else(|| {
                BatchItem::Failed(ItemFailure {
                    index,
                    error: UnifyError::Cancelled("item task did not complete".into()),
                })
            })
        })
        .collect()
}

/// Await `fut`, giving up after `deadline`.
///
/// On timeout the future is dropped, which aborts any tasks it still owns;
/// partial results are discarded.
///
/// # Errors
///
/// Returns [`UnifyError::Cancelled`] when the deadline elapses.
pub async fn with_deadline<T>(deadline: Option<Duration>, fut: impl Future<Output = T>) -> Result<T, UnifyError> {
    match deadline {
        None => Ok(fut.await),
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| UnifyError::Cancelled(format!("batch did not finish within {limit:?}"))),
    }
}
