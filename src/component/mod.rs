//! Components, their patches and dependency grouping

pub mod links;
pub mod model;
pub mod patch;

pub use links::{group_by_links, ComponentGroups, GroupComponents, LinkGrouper};
pub use model::{Component, ComponentPatch, Env, ExtraArg, HostPathType, Volume};
pub use patch::{apply_patch, apply_patches, find_patch, merge_args, parse_arg};
