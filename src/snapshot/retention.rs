//! Retention rules
//!
//! The newest snapshot of a target can never be deleted, and neither can a
//! lone snapshot. Both functions require the delete lock, which callers prove
//! by passing its guard.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::catalog::list_snapshots;
use super::locks::DeleteGuard;
use super::name::SnapshotName;
use crate::error::{SaveError, SaveResult};

/// Delete every snapshot in `dir` except the newest
///
/// Returns the paths that were removed.
pub fn delete_all_but_newest(_lock: &DeleteGuard<'_>, dir: &Path) -> SaveResult<Vec<PathBuf>> {
    let saves = list_snapshots(dir)?;
    if saves.len() <= 1 {
        return Err(nothing_to_delete());
    }

    let mut deleted = Vec::with_capacity(saves.len() - 1);
    for save in saves.iter().skip(1) {
        let path = dir.join(save);
        info!("- removing {} ...", path.display());
        fs::remove_file(&path)
            .map_err(|e| SaveError::Io(format!("Failed to delete {}: {}", path.display(), e)))?;
        deleted.push(path);
    }

    Ok(deleted)
}

/// Delete exactly one snapshot from `dir`
pub fn delete_one(_lock: &DeleteGuard<'_>, dir: &Path, name: &str) -> SaveResult<PathBuf> {
    SnapshotName::parse(name)?;

    let saves = list_snapshots(dir)?;
    if saves.len() <= 1 {
        return Err(nothing_to_delete());
    }
    if saves[0] == name {
        return Err(SaveError::Retention(
            "the first save cannot be deleted".into(),
        ));
    }
    if !saves.iter().any(|save| save == name) {
        return Err(SaveError::snapshot_not_found(name));
    }

    let path = dir.join(name);
    info!("- removing {} ...", path.display());
    fs::remove_file(&path)
        .map_err(|e| SaveError::Io(format!("Failed to delete {}: {}", path.display(), e)))?;

    Ok(path)
}

fn nothing_to_delete() -> SaveError {
    SaveError::Retention("no save to be deleted".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::locks::OperationLocks;
    use tempfile::TempDir;

    const A: &str = "20240102000000.zip";
    const B: &str = "20240101120005.zip";
    const C: &str = "20240101120000.zip";

    fn create_test_dir(names: &[&str]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for name in names {
            fs::write(temp.path().join(name), name).unwrap();
        }
        fs::write(temp.path().join("config.json"), "{}").unwrap();
        temp
    }

    #[test]
    fn test_single_snapshot_is_protected() {
        let temp = create_test_dir(&[A]);
        let locks = OperationLocks::new();
        let guard = locks.delete();

        let err = delete_all_but_newest(&guard, temp.path()).unwrap_err();
        assert!(err.is_retention());
        assert_eq!(err.to_string(), "Retention violation: no save to be deleted");

        let err = delete_one(&guard, temp.path(), A).unwrap_err();
        assert!(err.is_retention());
        assert!(temp.path().join(A).exists());
    }

    #[test]
    fn test_newest_is_protected() {
        let temp = create_test_dir(&[A, B, C]);
        let locks = OperationLocks::new();
        let guard = locks.delete();

        let err = delete_one(&guard, temp.path(), A).unwrap_err();
        assert!(err.is_retention());
        assert!(err.to_string().contains("the first save cannot be deleted"));

        delete_one(&guard, temp.path(), B).unwrap();
        assert_eq!(list_snapshots(temp.path()).unwrap(), vec![A, C]);
    }

    #[test]
    fn test_delete_all_but_newest() {
        let temp = create_test_dir(&[A, B, C]);
        let locks = OperationLocks::new();
        let guard = locks.delete();

        let deleted = delete_all_but_newest(&guard, temp.path()).unwrap();

        assert_eq!(deleted, vec![temp.path().join(B), temp.path().join(C)]);
        assert_eq!(list_snapshots(temp.path()).unwrap(), vec![A]);
        assert!(temp.path().join("config.json").exists());
    }

    #[test]
    fn test_delete_one_rejects_foreign_names() {
        let temp = create_test_dir(&[A, B]);
        let locks = OperationLocks::new();
        let guard = locks.delete();

        let err = delete_one(&guard, temp.path(), "config.json").unwrap_err();
        assert!(err.is_validation());
        let err = delete_one(&guard, temp.path(), "../20240101000000.zip").unwrap_err();
        assert!(err.is_validation());
        assert!(temp.path().join("config.json").exists());
    }

    #[test]
    fn test_delete_one_unknown_snapshot() {
        let temp = create_test_dir(&[A, B]);
        let locks = OperationLocks::new();
        let guard = locks.delete();

        let err = delete_one(&guard, temp.path(), C).unwrap_err();
        assert!(err.is_not_found());
    }
}
