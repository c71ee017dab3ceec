use std::path::{Path, PathBuf};

/// Walk up from `base_dir` to the first directory containing a `.git` entry.
pub fn find_repository_root(base_dir: &Path) -> Option<PathBuf> {
    let current_dir = base_dir.canonicalize().ok()?;

    for ancestor in current_dir.ancestors() {
        if ancestor.join(".git").exists() {
            return Some(ancestor.to_path_buf());
        }
    }

    log::debug!(
        "Could not find a repository root above {}",
        current_dir.display()
    );

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_repository_root() {
        // a package nested deep inside a module whose root holds the .git directory
        let tmp_dir = tempfile::tempdir().unwrap();
        let module_dir = tmp_dir.path().join("apm-server");
        std::fs::create_dir_all(module_dir.join(".git")).unwrap();
        let package_dir = module_dir.join("systemtest").join("benchtest");
        std::fs::create_dir_all(&package_dir).unwrap();

        let repository_root = find_repository_root(&package_dir).unwrap();
        assert_eq!(repository_root, module_dir.canonicalize().unwrap());

        tmp_dir.close().unwrap();
    }

    #[test]
    fn test_find_repository_root_no_git_dir() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let package_dir = tmp_dir.path().join("vendor").join("pkg");
        std::fs::create_dir_all(&package_dir).unwrap();

        assert_eq!(find_repository_root(&package_dir), None);

        tmp_dir.close().unwrap();
    }

    #[test]
    fn test_find_repository_root_missing_dir() {
        assert_eq!(find_repository_root(Path::new("/nonexistent/gobench/pkg")), None);
    }
}
