use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{debug, debug_span, Instrument};

use super::group::TaskGroup;
use crate::component::{Component, ComponentGroups};

/// How [`run`] walks the dependency groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One component at a time, group order then declaration order
    DryRun,
    /// Groups in sequence, members of a group concurrently
    Ordered,
    /// Every component at once, grouping ignored
    Unordered,
}

impl ExecutionMode {
    /// Dry-run takes precedence over `respect_order`
    pub fn resolve(dry_run: bool, respect_order: bool) -> Self {
        match (dry_run, respect_order) {
            (true, _) => Self::DryRun,
            (false, true) => Self::Ordered,
            (false, false) => Self::Unordered,
        }
    }
}

/// Options for a single [`run`].
///
/// `respect_order = false` launches every component at once. Only choose it
/// when the action does not depend on startup order, e.g. collecting logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Walk the groups back to front, for teardown
    pub reverse: bool,
    pub respect_order: bool,
    /// Preview the action sequence without any concurrency
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::startup()
    }
}

impl RunOptions {
    /// Forward, ordered
    pub fn startup() -> Self {
        Self {
            reverse: false,
            respect_order: true,
            dry_run: false,
        }
    }

    /// Reverse, ordered
    pub fn teardown() -> Self {
        Self {
            reverse: true,
            respect_order: true,
            dry_run: false,
        }
    }

    /// Forward, every component at once
    pub fn unordered() -> Self {
        Self {
            reverse: false,
            respect_order: false,
            dry_run: false,
        }
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn respect_order(mut self, respect_order: bool) -> Self {
        self.respect_order = respect_order;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn mode(&self) -> ExecutionMode {
        ExecutionMode::resolve(self.dry_run, self.respect_order)
    }
}

/// Run `action` against every component in `groups`.
///
/// Returns `Ok(())` only if every invoked action succeeded, otherwise the
/// first error to surface, unchanged.
///
/// Members of a group are polled concurrently on the calling task, not in
/// parallel. An action that blocks the thread stalls its siblings and their
/// cancellation checks, so blocking work belongs in
/// `tokio::task::spawn_blocking` or a spawned task awaited by the action.
pub async fn run<F, Fut, E>(
    groups: ComponentGroups,
    action: F,
    options: RunOptions,
) -> Result<(), E>
where
    F: Fn(Component, CancellationToken) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    run_with_cancel(groups, action, options, &CancellationToken::new()).await
}

/// Like [`run`], with every cancellation scope nested under `parent`
pub async fn run_with_cancel<F, Fut, E>(
    mut groups: ComponentGroups,
    action: F,
    options: RunOptions,
    parent: &CancellationToken,
) -> Result<(), E>
where
    F: Fn(Component, CancellationToken) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    if options.reverse {
        groups.reverse();
    }

    let mode = options.mode();
    let span = debug_span!(
        "run_components",
        ?mode,
        reverse = options.reverse,
        groups = groups.len()
    );

    async move {
        match mode {
            ExecutionMode::DryRun => run_sequential(groups, &action, parent).await,
            ExecutionMode::Ordered => run_ordered(groups, &action, parent).await,
            ExecutionMode::Unordered => run_unordered(groups, &action, parent).await,
        }
    }
    .instrument(span)
    .await
}

async fn run_sequential<F, Fut, E>(
    groups: ComponentGroups,
    action: &F,
    parent: &CancellationToken,
) -> Result<(), E>
where
    F: Fn(Component, CancellationToken) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    for component in groups.into_iter().flatten() {
        debug!(component = %component.name, "dry run");
        action(component, parent.clone()).await?;
    }
    Ok(())
}

async fn run_ordered<F, Fut, E>(
    groups: ComponentGroups,
    action: &F,
    parent: &CancellationToken,
) -> Result<(), E>
where
    F: Fn(Component, CancellationToken) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    for (index, mut group) in groups.into_iter().enumerate() {
        if group.len() <= 1 {
            if let Some(component) = group.pop() {
                debug!(group = index, component = %component.name, "running single component");
                action(component, parent.clone()).await?;
            }
            continue;
        }

        debug!(group = index, members = group.len(), "running group concurrently");
        let mut tasks = TaskGroup::with_parent(parent);
        for component in group {
            let token = tasks.token().clone();
            tasks.spawn(action(component, token));
        }
        tasks.wait().await?;
    }
    Ok(())
}

async fn run_unordered<F, Fut, E>(
    groups: ComponentGroups,
    action: &F,
    parent: &CancellationToken,
) -> Result<(), E>
where
    F: Fn(Component, CancellationToken) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    let mut tasks = TaskGroup::with_parent(parent);
    for component in groups.into_iter().flatten() {
        let token = tasks.token().clone();
        tasks.spawn(action(component, token));
    }
    debug!(members = tasks.len(), "running all components concurrently");
    tasks.wait().await
}
