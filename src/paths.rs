//! Lexical path helpers: joining, normalization, and relative formatting.
//! Nothing here touches the filesystem.

use std::path::{Component, Path, PathBuf};

/// Directory containing `document`. Empty for a bare file name.
pub fn document_dir(document: &Path) -> PathBuf {
    return document.parent().map(Path::to_path_buf).unwrap_or_default();
}

/// Join `target` onto `base` and normalize. A leading `/` on the target marks
/// it as rooted at `base`, so it is stripped rather than replacing the base.
pub fn join_target(base: &Path, target: &str) -> PathBuf {
    let rooted = target.trim_start_matches('/');
    return normalize_path(&base.join(rooted));
}

/// Collapse `.` and `..` components in a path without touching the filesystem.
/// Preserves leading `..` on relative paths and never pops past the root.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        push_normalized_component(&mut components, component);
    }
    return components.iter().collect();
}

/// Handle a single path component during normalization.
fn push_normalized_component<'a>(components: &mut Vec<Component<'a>>, component: Component<'a>) {
    match component {
        Component::CurDir => {},
        Component::ParentDir => match components.last() {
            Some(Component::Normal(_)) => {
                components.pop();
            },
            Some(Component::RootDir | Component::Prefix(_)) => {},
            Some(Component::CurDir | Component::ParentDir) | None => components.push(component),
        },
        other => components.push(other),
    }
    return;
}

/// Express `path` relative to `anchor` with `/` separators.
/// Returns `None` when `path` does not lie under `anchor`. The test is
/// per component, so `/ws/docs2` is not under `/ws/docs`.
pub fn relative_to(path: &Path, anchor: &Path) -> Option<String> {
    let rest = path.strip_prefix(anchor).ok()?;
    let segments: Vec<String> = rest
        .components()
        .map(|c| return c.as_os_str().to_string_lossy().into_owned())
        .collect();
    return Some(segments.join("/"));
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test code")]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_dots() {
        let path = normalize_path(Path::new("/ws/docs/./a/../b"));
        assert_eq!(path, PathBuf::from("/ws/docs/b"));
    }

    #[test]
    fn normalize_stops_at_root() {
        let path = normalize_path(Path::new("/ws/../../etc"));
        assert_eq!(path, PathBuf::from("/etc"));
    }

    #[test]
    fn normalize_keeps_leading_parent_on_relative() {
        let path = normalize_path(Path::new("../a/./b/.."));
        assert_eq!(path, PathBuf::from("../a"));
    }

    #[test]
    fn join_target_never_replaces_base() {
        let path = join_target(Path::new("/ws"), "/docs/page.md");
        assert_eq!(path, PathBuf::from("/ws/docs/page.md"));
    }

    #[test]
    fn relative_to_requires_component_prefix() {
        assert_eq!(relative_to(Path::new("/ws/docs2/a.md"), Path::new("/ws/docs")), None);
        assert_eq!(
            relative_to(Path::new("/ws/docs/sub/a.md"), Path::new("/ws/docs")),
            Some("sub/a.md".to_string())
        );
    }

    #[test]
    fn document_dir_of_bare_name_is_empty() {
        assert_eq!(document_dir(Path::new("page.md")), PathBuf::new());
        assert_eq!(document_dir(Path::new("/ws/docs/page.md")), PathBuf::from("/ws/docs"));
    }
}
