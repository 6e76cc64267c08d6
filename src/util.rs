use std::path::{Component, Path, PathBuf};

/// Collapse `.` and `..` components without touching the filesystem.
///
/// `..` above the root is dropped; `..` at the head of a relative path is kept.
pub fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Join `rel` onto `base` and clean the result.
pub fn join_clean(base: &Path, rel: &str) -> PathBuf {
    clean(&base.join(rel))
}

/// Render a path as the string form used by lookups.
pub fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Make `path` absolute against `cwd`, cleaning it either way.
pub fn absolutize(cwd: &Path, path: &str) -> PathBuf {
    if Path::new(path).is_absolute() {
        clean(Path::new(path))
    } else {
        join_clean(cwd, path)
    }
}

/// Path of `target` relative to the directory containing `from_file`.
///
/// Returns `.` when both point at the same directory and falls back to
/// `target` itself when no relative form exists.
pub fn relative_from_file(from_file: &Path, target: &Path) -> String {
    let base = from_file.parent().unwrap_or(Path::new(""));
    match pathdiff::diff_paths(target, base) {
        Some(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Some(rel) => path_string(&rel),
        None => path_string(target),
    }
}
