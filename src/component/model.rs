//! Component and patch records
//!
//! These are the in-memory shapes the executor and the merge resolver work
//! on. Field names serialize in camelCase so they read the same as the
//! cluster configuration files they are loaded from.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A named unit of deployable work
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// Unique within a configuration; the join key for patches
    pub name: String,
    /// Names of the components this one must start after
    #[serde(default)]
    pub links: Vec<String>,
    /// Flag tokens of the form `--key=value`
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub envs: Vec<Env>,
    #[serde(default)]
    pub volumes: Vec<Volume>,
}

impl Component {
    /// Create a component with no links, args, envs or volumes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a dependency on another component
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.links.push(link.into());
        self
    }

    /// Set the baseline arguments
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Add an environment entry
    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push(Env::new(name, value));
        self
    }

    /// Add a volume
    pub fn with_volume(mut self, volume: Volume) -> Self {
        self.volumes.push(volume);
        self
    }

    /// Apply every patch targeting this component and return the result
    pub fn with_patches(mut self, patches: &[ComponentPatch]) -> Self {
        super::patch::apply_patches(&mut self, patches);
        self
    }
}

/// An environment entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Env {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl Env {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Kind of host path backing a volume
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostPathType {
    /// No check is performed before mounting
    #[default]
    #[serde(rename = "")]
    Unset,
    DirectoryOrCreate,
    Directory,
    FileOrCreate,
    File,
    Socket,
    CharDevice,
    BlockDevice,
}

/// A mount descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    #[serde(default)]
    pub name: String,
    pub host_path: PathBuf,
    pub mount_path: PathBuf,
    #[serde(default)]
    pub path_type: HostPathType,
    #[serde(default)]
    pub read_only: bool,
}

impl Volume {
    /// Create a writable volume with no path type check
    pub fn new(
        name: impl Into<String>,
        host_path: impl Into<PathBuf>,
        mount_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            host_path: host_path.into(),
            mount_path: mount_path.into(),
            path_type: HostPathType::Unset,
            read_only: false,
        }
    }

    pub fn with_path_type(mut self, path_type: HostPathType) -> Self {
        self.path_type = path_type;
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}

/// One argument directive inside a patch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraArg {
    pub key: String,
    pub value: String,
    /// Replace every value currently held by `key` instead of appending
    #[serde(default)]
    pub r#override: bool,
}

impl ExtraArg {
    /// A directive that appends `value` to whatever `key` already holds
    pub fn append(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            r#override: false,
        }
    }

    /// A directive that replaces the current values of `key`
    pub fn replace(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            r#override: true,
        }
    }
}

/// Override record targeting exactly one component by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPatch {
    pub name: String,
    #[serde(default)]
    pub extra_args: Vec<ExtraArg>,
    #[serde(default)]
    pub extra_volumes: Vec<Volume>,
    #[serde(default)]
    pub extra_envs: Vec<Env>,
}

impl ComponentPatch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_arg(mut self, arg: ExtraArg) -> Self {
        self.extra_args.push(arg);
        self
    }

    pub fn with_volume(mut self, volume: Volume) -> Self {
        self.extra_volumes.push(volume);
        self
    }

    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_envs.push(Env::new(name, value));
        self
    }
}
