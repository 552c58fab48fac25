// Core infrastructure shared by the executor and the resolvers

pub mod config;
pub mod errors;

// Re-export commonly used types
pub use config::{ClusterConfig, ClusterOptions, ClusterOptionsBuilder};
pub use errors::{Result, StagehandError};
