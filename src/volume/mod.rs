//! Host path expansion and log volume derivation

pub mod expand;
pub mod logs;

pub use expand::{expand_host_paths, expand_path};
pub use logs::{
    derive_log_volumes, log_volumes_from, Attach, AttachConfig, AttachSpec, ClusterAttach,
    ClusterLogs, Log, Logs, LogsFileSource, LogsSpec, ResourceSet,
};
