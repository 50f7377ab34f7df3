//! Disk usage of install trees

use crate::error::{DepchainError, DepchainResult};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::debug;
use walkdir::WalkDir;

/// Total size in bytes of regular files below `root`.
///
/// Unreadable entries are skipped; a missing root is zero.
pub fn tree_size(root: &Path) -> u64 {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|metadata| metadata.len())
        .sum()
}

/// Remove a directory tree; a missing tree is not an error
pub async fn remove_tree(path: &Path) -> DepchainResult<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => {
            debug!("Removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(DepchainError::io(format!("removing {}", path.display()), e)),
    }
}

/// Bytes as MiB with one decimal
pub fn format_mib(bytes: u64) -> String {
    format!("{:.1} MiB", bytes as f64 / (1024.0 * 1024.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn sums_nested_files() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("lib/cmake")).unwrap();
        std::fs::write(dir.path().join("lib/a.lib"), vec![0u8; 1000]).unwrap();
        std::fs::write(dir.path().join("lib/cmake/a.cmake"), vec![0u8; 24]).unwrap();

        assert_eq!(tree_size(dir.path()), 1024);
    }

    #[test]
    fn missing_root_is_empty() {
        assert_eq!(tree_size(Path::new("/definitely/not/here")), 0);
    }

    #[tokio::test]
    async fn remove_tree_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let tree = dir.path().join("zlib");
        std::fs::create_dir_all(tree.join("lib")).unwrap();
        std::fs::write(tree.join("lib/z.lib"), b"z").unwrap();

        remove_tree(&tree).await.unwrap();
        assert!(!tree.exists());
        remove_tree(&tree).await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn remove_tree_reports_other_errors() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();

        // remove_dir_all on a regular file fails with something other than NotFound
        let err = remove_tree(&file).await.unwrap_err();
        assert!(matches!(err, DepchainError::Io { .. }));
        assert!(file.exists());
    }

    #[test]
    fn mib_formatting() {
        assert_eq!(format_mib(0), "0.0 MiB");
        assert_eq!(format_mib(3 * 1024 * 1024 + 512 * 1024), "3.5 MiB");
    }
}
