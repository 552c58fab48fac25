//! Cluster orchestration entry point
//!
//! Ties the pieces together: configured components are grouped by the
//! dependency solver, then the executor drives an action over the groups.
//! [`Orchestrator::up`] and [`Orchestrator::down`] cover the common
//! start/stop flows for a [`ComponentRuntime`].

use async_trait::async_trait;
use std::future::Future;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::component::{
    apply_patches, find_patch, Component, ComponentGroups, ComponentPatch, GroupComponents,
    LinkGrouper, Volume,
};
use crate::core::config::ClusterConfig;
use crate::core::errors::{Result, StagehandError};
use crate::executor::{self, RunOptions};
use crate::volume::derive_log_volumes;

/// Failure of an orchestration run
#[derive(Debug, Error)]
pub enum OrchestrationError<E> {
    /// Components could not be grouped; no action was invoked
    #[error(transparent)]
    Dependency(StagehandError),

    /// First error returned by the component action
    #[error("{0}")]
    Action(E),
}

impl<E> OrchestrationError<E> {
    /// The action's error, if the run got that far
    pub fn into_action(self) -> Option<E> {
        match self {
            Self::Action(err) => Some(err),
            Self::Dependency(_) => None,
        }
    }
}

/// Starts and stops individual components
#[async_trait]
pub trait ComponentRuntime: Send + Sync {
    type Error: Send;

    /// Start a component whose patches have already been applied
    async fn start(
        &self,
        component: Component,
        cancel: CancellationToken,
    ) -> std::result::Result<(), Self::Error>;

    async fn stop(
        &self,
        component: Component,
        cancel: CancellationToken,
    ) -> std::result::Result<(), Self::Error>;
}

pub struct Orchestrator<G = LinkGrouper> {
    config: ClusterConfig,
    grouper: G,
}

impl Orchestrator<LinkGrouper> {
    /// Validate `config` and group components by their links
    pub fn new(config: ClusterConfig) -> Result<Self> {
        Self::with_grouper(config, LinkGrouper::new())
    }
}

impl<G: GroupComponents> Orchestrator<G> {
    /// Validate `config` and group components with `grouper`
    pub fn with_grouper(config: ClusterConfig, grouper: G) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, grouper })
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    pub fn is_dry_run(&self) -> bool {
        self.config.options.dry_run
    }

    /// Configured components in dependency order
    pub fn groups(&self) -> Result<ComponentGroups> {
        self.grouper.group(&self.config.components)
    }

    /// First configured patch for `name`
    pub fn component_patches(&self, name: &str) -> Option<&ComponentPatch> {
        find_patch(&self.config.components_patches, name)
    }

    /// A configured component with every patch applied
    pub fn resolve_component(&self, name: &str) -> Option<Component> {
        let mut component = self.config.component(name)?.clone();
        apply_patches(&mut component, &self.config.components_patches);
        Some(component)
    }

    /// Read-only volumes for the configured log and attach resources
    pub fn log_volumes(&self) -> Vec<Volume> {
        derive_log_volumes(&self.config.resources)
    }

    /// Run `action` over every configured component.
    ///
    /// `reverse` walks the dependency groups back to front. `respect_order`
    /// set to false runs everything at once and must only be used for
    /// actions that are indifferent to startup order.
    pub async fn for_each_component<F, Fut, E>(
        &self,
        reverse: bool,
        respect_order: bool,
        action: F,
    ) -> std::result::Result<(), OrchestrationError<E>>
    where
        F: Fn(Component, CancellationToken) -> Fut,
        Fut: Future<Output = std::result::Result<(), E>>,
    {
        let groups = self.groups().map_err(OrchestrationError::Dependency)?;
        let options = RunOptions {
            reverse,
            respect_order,
            dry_run: self.is_dry_run(),
        };
        debug!(?options, groups = groups.len(), "running action over components");

        executor::run(groups, action, options)
            .await
            .map_err(OrchestrationError::Action)
    }

    /// Start every component in dependency order, patches applied
    pub async fn up<R: ComponentRuntime>(
        &self,
        runtime: &R,
    ) -> std::result::Result<(), OrchestrationError<R::Error>> {
        info!(components = self.config.components.len(), "starting components");
        let patches = &self.config.components_patches;
        self.for_each_component(false, true, |mut component, cancel| {
            apply_patches(&mut component, patches);
            runtime.start(component, cancel)
        })
        .await
    }

    /// Stop every component in reverse dependency order
    pub async fn down<R: ComponentRuntime>(
        &self,
        runtime: &R,
    ) -> std::result::Result<(), OrchestrationError<R::Error>> {
        info!(components = self.config.components.len(), "stopping components");
        self.for_each_component(true, true, |component, cancel| {
            runtime.stop(component, cancel)
        })
        .await
    }
}
