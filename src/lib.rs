//! # Stagehand
//!
//! Brings the components of a multi-process cluster up and down in
//! dependency order, and merges site-specific argument patches into each
//! component's baseline arguments.
//!
//! ```rust,no_run
//! use stagehand::{ClusterConfig, Orchestrator};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClusterConfig::load("cluster.yaml")?;
//! let orchestrator = Orchestrator::new(config)?;
//!
//! orchestrator
//!     .for_each_component(false, true, |component, _cancel| async move {
//!         println!("starting {} {:?}", component.name, component.args);
//!         Ok::<(), anyhow::Error>(())
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

// Core infrastructure modules
pub mod core;

pub mod component; // Components, patches, dependency grouping
pub mod executor; // Dependency-grouped concurrent execution
pub mod orchestrator;
pub mod volume; // Host path expansion, log volumes

// Re-exports for convenience
pub use crate::core::{ClusterConfig, ClusterOptions, Result, StagehandError};
pub use component::{
    apply_patch, apply_patches, find_patch, group_by_links, Component, ComponentGroups,
    ComponentPatch, Env, ExtraArg, GroupComponents, HostPathType, LinkGrouper, Volume,
};
pub use executor::{run, run_with_cancel, ExecutionMode, RunOptions, TaskGroup};
pub use orchestrator::{ComponentRuntime, OrchestrationError, Orchestrator};
pub use volume::{derive_log_volumes, expand_host_paths, expand_path, ResourceSet};

pub use tokio_util::sync::CancellationToken;
