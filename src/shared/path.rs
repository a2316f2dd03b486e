use std::path::{Component, Path, PathBuf};

/// Joins `path` onto `base` and normalizes the result lexically.
///
/// `.` and `..` components are collapsed without touching the filesystem,
/// so symlinks are not resolved and the path does not need to exist.
/// An absolute `path` ignores `base`.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in base.join(path).components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                // `/..` stays `/`
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }

    normalized
}
