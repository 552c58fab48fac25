use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

use super::errors::{Result, StagehandError};
use crate::component::{Component, ComponentPatch};
use crate::volume::ResourceSet;

/// Cluster-wide switches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterOptions {
    /// Visit components one by one instead of running the action concurrently
    #[serde(default)]
    pub dry_run: bool,
}

impl ClusterOptions {
    /// Create a new builder for ClusterOptions
    pub fn builder() -> ClusterOptionsBuilder {
        ClusterOptionsBuilder::new()
    }
}

/// Builder for ClusterOptions
#[derive(Debug, Default)]
pub struct ClusterOptionsBuilder {
    options: ClusterOptions,
}

impl ClusterOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.options.dry_run = dry_run;
        self
    }

    pub fn build(self) -> ClusterOptions {
        self.options
    }
}

/// Everything one orchestration run reads from configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    #[serde(default)]
    pub options: ClusterOptions,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub components_patches: Vec<ComponentPatch>,
    #[serde(default)]
    pub resources: ResourceSet,
}

impl ClusterConfig {
    pub fn new(components: Vec<Component>) -> Self {
        Self {
            components,
            ..Default::default()
        }
    }

    pub fn with_options(mut self, options: ClusterOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_patch(mut self, patch: ComponentPatch) -> Self {
        self.components_patches.push(patch);
        self
    }

    pub fn with_resources(mut self, resources: ResourceSet) -> Self {
        self.resources = resources;
        self
    }

    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config file, JSON when the extension is `.json` and YAML otherwise
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| StagehandError::io(format!("read {}", path.display()), e))?;

        let is_json = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };

        debug!(
            path = %path.display(),
            components = config.components.len(),
            patches = config.components_patches.len(),
            "loaded cluster config"
        );
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// Component names must be present and unique. Patches for unknown
    /// components and repeated patch names are allowed but reported.
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::with_capacity(self.components.len());
        for component in &self.components {
            if component.name.is_empty() {
                return Err(StagehandError::configuration_field(
                    "component name must not be empty",
                    "components",
                ));
            }
            if !names.insert(component.name.as_str()) {
                return Err(StagehandError::configuration_field(
                    format!("duplicate component name {:?}", component.name),
                    "components",
                ));
            }
        }

        let mut patched = HashSet::with_capacity(self.components_patches.len());
        for patch in &self.components_patches {
            if !names.contains(patch.name.as_str()) {
                warn!(patch = %patch.name, "patch targets a component that is not configured");
            }
            if !patched.insert(patch.name.as_str()) {
                warn!(patch = %patch.name, "duplicate patch, only the first is used for lookup");
            }
        }

        Ok(())
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|component| component.name == name)
    }
}
