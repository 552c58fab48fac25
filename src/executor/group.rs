//! Task group with first-error join
//!
//! A [`TaskGroup`] owns one cancellation scope. Every future pushed into it
//! runs concurrently once [`TaskGroup::wait`] is awaited. The first failure
//! cancels the scope's token and is kept; later failures are discarded.
//! Cancellation is advisory: `wait` keeps polling until every future has
//! returned on its own.

use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct TaskGroup<Fut> {
    token: CancellationToken,
    tasks: FuturesUnordered<Fut>,
}

impl<Fut> TaskGroup<Fut> {
    /// Create a group with its own root token
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            tasks: FuturesUnordered::new(),
        }
    }

    /// Create a group whose token is cancelled along with `parent`.
    ///
    /// Cancelling the group never cancels the parent.
    pub fn with_parent(parent: &CancellationToken) -> Self {
        Self {
            token: parent.child_token(),
            tasks: FuturesUnordered::new(),
        }
    }

    /// Token shared by every member of the group
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<Fut> Default for TaskGroup<Fut> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Fut, E> TaskGroup<Fut>
where
    Fut: Future<Output = Result<(), E>>,
{
    /// Add a member to the group
    pub fn spawn(&mut self, task: Fut) {
        self.tasks.push(task);
    }

    /// Drive every member to completion and return the first error by completion order
    pub async fn wait(mut self) -> Result<(), E> {
        let mut first_error = None;
        while let Some(result) = self.tasks.next().await {
            if let Err(err) = result {
                if first_error.is_none() {
                    debug!(remaining = self.tasks.len(), "member failed, cancelling task group");
                    self.token.cancel();
                    first_error = Some(err);
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_all_members_succeed() {
        let finished = AtomicUsize::new(0);
        let mut group = TaskGroup::new();
        for _ in 0..4 {
            let finished = &finished;
            group.spawn(async move {
                finished.fetch_add(1, Ordering::SeqCst);
                Ok::<(), String>(())
            });
        }
        assert_eq!(group.len(), 4);

        group.wait().await.unwrap();
        assert_eq!(finished.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_first_error_cancels_siblings() {
        let observed = AtomicUsize::new(0);
        let mut group = TaskGroup::new();
        for index in 0..3 {
            let token = group.token().clone();
            let observed = &observed;
            group.spawn(async move {
                if index == 1 {
                    return Err(format!("member {index} failed"));
                }
                token.cancelled().await;
                observed.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
        }

        let err = group.wait().await.unwrap_err();
        assert_eq!(err, "member 1 failed");
        assert_eq!(observed.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_keeps_error_that_completes_first() {
        let mut group = TaskGroup::new();
        for (delay, message) in [(50u64, "slow"), (0, "fast")] {
            group.spawn(async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Err::<(), _>(message)
            });
        }
        assert_eq!(group.wait().await, Err("fast"));
    }

    #[tokio::test]
    async fn test_group_cancel_does_not_reach_parent() {
        let parent = CancellationToken::new();
        let mut group = TaskGroup::with_parent(&parent);
        group.spawn(async { Err::<(), _>("boom") });
        let child = group.token().clone();

        assert!(group.wait().await.is_err());
        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());
    }

    #[tokio::test]
    async fn test_parent_cancel_reaches_group() {
        let parent = CancellationToken::new();
        let mut group = TaskGroup::with_parent(&parent);
        let token = group.token().clone();
        group.spawn(async move {
            token.cancelled().await;
            Ok::<(), ()>(())
        });
        parent.cancel();
        group.wait().await.unwrap();
    }
}
