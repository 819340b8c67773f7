//! Lexical path helpers. These never touch the filesystem.

use std::path::{Component, Path, PathBuf};

/// Resolve `path` against `base` (the document's directory) unless it is absolute
pub fn resolve(base: Option<&Path>, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return normalize(path);
    }
    match base {
        Some(base) => normalize(&base.join(path)),
        None => normalize(path),
    }
}

/// Drop `.` components and fold `..` into its parent where possible
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_dots() {
        assert_eq!(normalize(Path::new("./output")), PathBuf::from("output"));
        assert_eq!(normalize(Path::new("a/./b/../c")), PathBuf::from("a/c"));
        assert_eq!(normalize(Path::new("../x/..")), PathBuf::from(".."));
        assert_eq!(normalize(Path::new("./")), PathBuf::from("."));
    }

    #[cfg(unix)]
    #[test]
    fn resolves_against_base() {
        let base = Path::new("/repo/storepix");
        assert_eq!(resolve(Some(base), Path::new("./output")), PathBuf::from("/repo/storepix/output"));
        assert_eq!(resolve(Some(base), Path::new("../shots/a.png")), PathBuf::from("/repo/shots/a.png"));
        assert_eq!(resolve(Some(base), Path::new("/abs/out")), PathBuf::from("/abs/out"));
        assert_eq!(resolve(None, Path::new("./output/")), PathBuf::from("output"));
        assert_eq!(normalize(Path::new("/../etc")), PathBuf::from("/etc"));
    }
}
