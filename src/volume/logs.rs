//! Log and attach resources, and the read-only volumes they need
//!
//! Every log or attach entry names a file on the host. The directories
//! holding those files are mounted into the components read-only, one
//! volume per distinct directory.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::expand::clean;
use crate::component::{HostPathType, Volume};

/// Anything that points at host log files
pub trait LogsFileSource {
    fn logs_files(&self) -> Vec<&Path>;
}

/// A single log file to stream for a set of containers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    #[serde(default)]
    pub containers: Vec<String>,
    pub logs_file: PathBuf,
    #[serde(default)]
    pub follow: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogsSpec {
    #[serde(default)]
    pub logs: Vec<Log>,
}

/// Namespaced log resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logs {
    #[serde(default)]
    pub name: String,
    pub spec: LogsSpec,
}

/// Cluster-wide log resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterLogs {
    #[serde(default)]
    pub name: String,
    pub spec: LogsSpec,
}

/// A single log file to attach to for a set of containers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachConfig {
    #[serde(default)]
    pub containers: Vec<String>,
    pub logs_file: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachSpec {
    #[serde(default)]
    pub attaches: Vec<AttachConfig>,
}

/// Namespaced attach resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attach {
    #[serde(default)]
    pub name: String,
    pub spec: AttachSpec,
}

/// Cluster-wide attach resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterAttach {
    #[serde(default)]
    pub name: String,
    pub spec: AttachSpec,
}

impl LogsFileSource for LogsSpec {
    fn logs_files(&self) -> Vec<&Path> {
        self.logs.iter().map(|log| log.logs_file.as_path()).collect()
    }
}

impl LogsFileSource for AttachSpec {
    fn logs_files(&self) -> Vec<&Path> {
        self.attaches
            .iter()
            .map(|attach| attach.logs_file.as_path())
            .collect()
    }
}

impl LogsFileSource for Logs {
    fn logs_files(&self) -> Vec<&Path> {
        self.spec.logs_files()
    }
}

impl LogsFileSource for ClusterLogs {
    fn logs_files(&self) -> Vec<&Path> {
        self.spec.logs_files()
    }
}

impl LogsFileSource for Attach {
    fn logs_files(&self) -> Vec<&Path> {
        self.spec.logs_files()
    }
}

impl LogsFileSource for ClusterAttach {
    fn logs_files(&self) -> Vec<&Path> {
        self.spec.logs_files()
    }
}

/// The log and attach resources of one cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSet {
    #[serde(default)]
    pub logs: Vec<Logs>,
    #[serde(default)]
    pub cluster_logs: Vec<ClusterLogs>,
    #[serde(default)]
    pub attaches: Vec<Attach>,
    #[serde(default)]
    pub cluster_attaches: Vec<ClusterAttach>,
}

impl ResourceSet {
    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
            && self.cluster_logs.is_empty()
            && self.attaches.is_empty()
            && self.cluster_attaches.is_empty()
    }

    /// Every resource as a log file source
    pub fn sources(&self) -> Vec<&dyn LogsFileSource> {
        let mut sources: Vec<&dyn LogsFileSource> = Vec::new();
        sources.extend(self.logs.iter().map(|r| r as &dyn LogsFileSource));
        sources.extend(self.cluster_logs.iter().map(|r| r as &dyn LogsFileSource));
        sources.extend(self.attaches.iter().map(|r| r as &dyn LogsFileSource));
        sources.extend(self.cluster_attaches.iter().map(|r| r as &dyn LogsFileSource));
        sources
    }
}

/// Read-only volumes for the directories of every log file in `resources`
pub fn derive_log_volumes(resources: &ResourceSet) -> Vec<Volume> {
    log_volumes_from(resources.sources())
}

/// Read-only volumes for the directories of every log file in `sources`.
///
/// Directories are deduplicated and sorted, and volume `i` is named
/// `log-volume-<i>`.
pub fn log_volumes_from<'a, I>(sources: I) -> Vec<Volume>
where
    I: IntoIterator<Item = &'a dyn LogsFileSource>,
{
    let dirs: BTreeSet<PathBuf> = sources
        .into_iter()
        .flat_map(|source| source.logs_files())
        .map(parent_dir)
        .collect();

    dirs.into_iter()
        .enumerate()
        .map(|(index, dir)| Volume {
            name: format!("log-volume-{index}"),
            host_path: dir.clone(),
            mount_path: dir,
            path_type: HostPathType::DirectoryOrCreate,
            read_only: true,
        })
        .collect()
}

/// Cleaned directory of a file path, `.` when nothing is left
fn parent_dir(file: &Path) -> PathBuf {
    let dir = clean(file.parent().unwrap_or(file));
    if dir.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        dir
    }
}
