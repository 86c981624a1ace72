//! Workspace-relative path resolution with traversal guarding
//!
//! Every directory an action touches is derived from the workspace root and
//! a caller-supplied relative path. Resolution is lexical (the target may not
//! exist yet), followed by a check that any existing ancestor does not leave
//! the workspace through a symlink.

use std::path::{Component, Path, PathBuf};

use crate::domain::error::ActionError;

/// Lexically normalize a path: drop `.` and fold `..` into the preceding segment.
///
/// Leading `..` segments of a relative path are kept; `..` directly under the
/// root of an absolute path is dropped.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component)
            },
            other => parts.push(other)
        }
    }

    parts.iter().map(|c| c.as_os_str()).collect()
}

/// Whether `child` lies at or below `base`, after normalizing both
pub fn is_child_path(base: &Path, child: &Path) -> bool {
    let base = normalize(base);
    let child = normalize(child);

    match child.strip_prefix(&base) {
        Ok(rest) if !rest.components().any(|c| c == Component::ParentDir) => {
            stays_inside_after_symlinks(&base, &child)
        }
        _ => false
    }
}

/// Resolve `path` against the workspace, failing when the result leaves it
pub fn resolve_safe_child_path(workspace: &Path, path: &str) -> Result<PathBuf, ActionError> {
    let target = normalize(&workspace.join(path));

    if !is_child_path(workspace, &target) {
        return Err(ActionError::invalid_path(path));
    }

    Ok(target)
}

/// Resolve the directory holding the repository to push.
///
/// Leading `../` segments are stripped before joining, so a source path can
/// never climb above the workspace; anything still escaping it is rejected.
pub fn repo_source_directory(workspace: &Path, source_path: Option<&str>) -> Result<PathBuf, ActionError> {
    let Some(source_path) = source_path.filter(|p| !p.is_empty()) else {
        return Ok(workspace.to_path_buf());
    };

    let safe_suffix: PathBuf =
        normalize(Path::new(source_path)).components().skip_while(|c| matches!(c, Component::ParentDir)).collect();
    let target = normalize(&workspace.join(safe_suffix));

    if !is_child_path(workspace, &target) {
        return Err(ActionError::invalid_source_path(source_path));
    }

    Ok(target)
}

/// Canonicalize the deepest existing ancestor of `child` and make sure it is
/// still under the canonical workspace root.
fn stays_inside_after_symlinks(base: &Path, child: &Path) -> bool {
    let Ok(canonical_base) = base.canonicalize() else {
        return true;
    };

    let existing = child.ancestors().find(|p| p.exists());
    match existing.map(Path::canonicalize) {
        Some(Ok(canonical)) => canonical.starts_with(&canonical_base),
        _ => true
    }
}
