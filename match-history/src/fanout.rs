//! Join-all helpers over a `JoinSet`.
//!
//! Every future is spawned at once and its output is stored at its input
//! position, so the result order never depends on completion order.

use std::future::Future;
use tokio::task::{JoinError, JoinSet};

/// Runs all futures concurrently and returns their outputs in input order.
///
/// The first error (or task panic) is returned immediately; dropping the
/// `JoinSet` aborts every task still in flight.
pub async fn try_join_ordered<I, F, T, E>(futures: I) -> Result<Vec<T>, E>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: From<JoinError> + Send + 'static,
{
    let mut join_set = JoinSet::new();
    let mut len = 0;

    for (index, future) in futures.into_iter().enumerate() {
        join_set.spawn(async move { (index, future.await) });
        len += 1;
    }

    let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(len).collect();

    while let Some(joined) = join_set.join_next().await {
        let (index, result) = joined?;
        slots[index] = Some(result?);
    }

    Ok(slots.into_iter().flatten().collect())
}

/// Like [`try_join_ordered`] for futures that cannot fail. Only a panicking
/// task produces an error.
pub async fn join_ordered<I, F, T>(futures: I) -> Result<Vec<T>, JoinError>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    try_join_ordered(
        futures
            .into_iter()
            .map(|future| async move { Ok::<_, JoinError>(future.await) }),
    )
    .await
}
