use std::{
    io,
    path::{Path, PathBuf},
};

use chrono::Local;
use tokio::fs;

use crate::storage::{CART_FILE, ORDERS_FILE, PRODUCTS_FILE, PURCHASE_LOG_FILE};

/// Files mirrored into each backup directory, when present.
pub const TRACKED_FILES: [&str; 4] = [PRODUCTS_FILE, CART_FILE, ORDERS_FILE, PURCHASE_LOG_FILE];

/// Copy the current store files into `backups/<timestamp>` under the data
/// directory. Runs after every completed purchase; the purchase itself is
/// already committed, so the caller only logs a failure here.
///
/// There is no retention policy: backups accumulate for the life of the
/// deployment.
pub async fn backup_files(data_dir: &Path) -> io::Result<PathBuf> {
    let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    let backup_dir = data_dir.join("backups").join(stamp);
    fs::create_dir_all(&backup_dir).await?;

    for name in TRACKED_FILES {
        let source = data_dir.join(name);
        if fs::try_exists(&source).await? {
            fs::copy(&source, backup_dir.join(name)).await?;
        }
    }
    Ok(backup_dir)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_backup_copies_existing_tracked_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PRODUCTS_FILE), "[]").await.unwrap();
        fs::write(dir.path().join(ORDERS_FILE), "{}").await.unwrap();

        let backup_dir = backup_files(dir.path()).await.unwrap();
        assert!(backup_dir.starts_with(dir.path().join("backups")));
        assert!(backup_dir.join(PRODUCTS_FILE).exists());
        assert!(backup_dir.join(ORDERS_FILE).exists());
        // Absent files are skipped, not errors
        assert!(!backup_dir.join(CART_FILE).exists());

        let copied = fs::read_to_string(backup_dir.join(PRODUCTS_FILE))
            .await
            .unwrap();
        assert_eq!(copied, "[]");
    }
}
