use std::{io, path::Path};

use teloxide::types::UserId;
use tokio::{fs::OpenOptions, io::AsyncWriteExt};

use crate::{
    storage::PURCHASE_LOG_FILE,
    storage_traits::Product,
};

/// Append a human-readable record of a completed purchase to `purchase.log`.
/// Unlike the JSON stores, the log is append-only and never rewritten.
pub async fn log_purchase(data_dir: &Path, user_id: UserId, items: &[Product]) -> io::Result<()> {
    let mut record = format!("User {} - Order:\n", user_id.0);
    for item in items {
        record.push_str(&format!("  - {} (${:.2})\n", item.name, item.price));
    }
    record.push('\n');

    tokio::fs::create_dir_all(data_dir).await?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join(PURCHASE_LOG_FILE))
        .await?;
    file.write_all(record.as_bytes()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn mango() -> Product {
        Product {
            id: 1,
            name: "Mango".into(),
            description: String::new(),
            price: 5.0,
            image: String::new(),
            category: String::new(),
        }
    }

    #[tokio::test]
    async fn test_log_is_append_only() {
        let dir = TempDir::new().unwrap();
        let user = UserId(42);

        log_purchase(dir.path(), user, &[mango()]).await.unwrap();
        log_purchase(dir.path(), user, &[mango()]).await.unwrap();

        let content = tokio::fs::read_to_string(dir.path().join(PURCHASE_LOG_FILE))
            .await
            .unwrap();
        assert_eq!(content.matches("User 42 - Order:").count(), 2);
        assert!(content.contains("  - Mango ($5.00)"));
    }
}
