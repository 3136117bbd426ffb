//! Package and executable lookup over the ament prefix layout

use crate::substitution::LaunchContext;
use std::path::{Path, PathBuf};

const FALLBACK_DISTROS: &[&str] = &["jazzy", "iron", "humble", "galactic", "foxy"];

/// Install prefixes in lookup order: `AMENT_PREFIX_PATH`, the sourced
/// `ROS_DISTRO` under `/opt/ros`, then the common distributions.
pub fn ament_prefixes(context: &LaunchContext) -> Vec<PathBuf> {
    let mut prefixes: Vec<PathBuf> = Vec::new();

    if let Some(prefix_path) = context.env_var("AMENT_PREFIX_PATH") {
        prefixes.extend(
            std::env::split_paths(&prefix_path).filter(|p| !p.as_os_str().is_empty()),
        );
    }

    if let Some(distro) = context.env_var("ROS_DISTRO") {
        prefixes.push(PathBuf::from(format!("/opt/ros/{}", distro)));
    }

    for distro in FALLBACK_DISTROS {
        let prefix = PathBuf::from(format!("/opt/ros/{}", distro));
        if !prefixes.contains(&prefix) {
            prefixes.push(prefix);
        }
    }

    prefixes
}

/// Find ROS 2 package share directory
pub fn find_package_share(context: &LaunchContext, package_name: &str) -> Option<PathBuf> {
    let found = ament_prefixes(context)
        .into_iter()
        .map(|prefix| prefix.join("share").join(package_name))
        .find(|share| share.is_dir());

    match &found {
        Some(share) => log::debug!("Package {} found at {}", package_name, share.display()),
        None => log::debug!("Package {} not found in any prefix", package_name),
    }
    found
}

/// Find `<prefix>/lib/<package>/<executable>` in the first prefix that has it
pub fn find_package_executable(
    context: &LaunchContext,
    package_name: &str,
    executable: &str,
) -> Option<PathBuf> {
    ament_prefixes(context)
        .into_iter()
        .map(|prefix| prefix.join("lib").join(package_name).join(executable))
        .find(|path| is_executable(path))
}

/// Find an executable by name on `PATH`
pub fn find_executable(context: &LaunchContext, name: &str) -> Option<PathBuf> {
    let path_var = context.env_var("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
