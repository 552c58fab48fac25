use std::path::{Component as PathComponent, Path, PathBuf};

use crate::component::Volume;
use crate::core::errors::{Result, StagehandError};

const HOME_MARKER: &str = "~";

/// Source of the home directory used to expand `~`
type HomeDir<'a> = &'a dyn Fn() -> Option<PathBuf>;

/// Expand every volume's host path to an absolute path.
///
/// The first path that cannot be expanded fails the whole batch.
pub fn expand_host_paths(volumes: &[Volume]) -> Result<Vec<Volume>> {
    expand_host_paths_with(volumes, &dirs::home_dir)
}

fn expand_host_paths_with(volumes: &[Volume], home_dir: HomeDir<'_>) -> Result<Vec<Volume>> {
    volumes
        .iter()
        .map(|volume| {
            Ok(Volume {
                host_path: expand_path_with(&volume.host_path, home_dir)?,
                ..volume.clone()
            })
        })
        .collect()
}

/// Expand a leading `~` to the home directory and make the path absolute.
///
/// Empty paths are returned unchanged. The result is cleaned lexically,
/// without touching the filesystem.
pub fn expand_path(path: impl AsRef<Path>) -> Result<PathBuf> {
    expand_path_with(path.as_ref(), &dirs::home_dir)
}

fn expand_path_with(path: &Path, home_dir: HomeDir<'_>) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Ok(PathBuf::new());
    }

    let expanded = expand_home(path, home_dir)?;
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        let cwd = std::env::current_dir().map_err(|e| {
            StagehandError::path_resolution_with_source(path, "current directory is unavailable", e)
        })?;
        cwd.join(expanded)
    };
    Ok(clean(&absolute))
}

fn expand_home(path: &Path, home_dir: HomeDir<'_>) -> Result<PathBuf> {
    let mut components = path.components();
    match components.next() {
        Some(PathComponent::Normal(first)) if first == HOME_MARKER => {
            let home = home_dir().ok_or_else(|| {
                StagehandError::path_resolution(path, "home directory could not be determined")
            })?;
            Ok(home.join(components.as_path()))
        }
        _ => Ok(path.to_path_buf()),
    }
}

/// Drop `.` segments and resolve `..` against the preceding segment
pub(crate) fn clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            PathComponent::CurDir => {}
            PathComponent::ParentDir => {
                if matches!(cleaned.components().next_back(), Some(PathComponent::Normal(_))) {
                    cleaned.pop();
                } else if !cleaned.has_root() {
                    cleaned.push("..");
                }
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    cleaned
}
