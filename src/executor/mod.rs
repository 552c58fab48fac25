//! Dependency-grouped concurrent executor
//!
//! Drives a caller-supplied action over dependency groups in one of three
//! modes (see [`ExecutionMode`]). Every action receives a
//! [`CancellationToken`](tokio_util::sync::CancellationToken) it is expected
//! to watch; the executor only signals it and never aborts running work.

pub mod group;
pub mod run;

pub use group::TaskGroup;
pub use run::{run, run_with_cancel, ExecutionMode, RunOptions};
