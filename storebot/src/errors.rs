use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by store operations and admin commands.
///
/// Every variant is converted into a user-visible reply at the handler
/// boundary; none of them terminate the process. Corruption is the
/// exception: it is logged and the affected store starts empty.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not authorized")]
    Authorization,

    #[error("Product ID {0} not found.")]
    NotFound(u64),

    #[error("Storage file {} is corrupted", .0.display())]
    Corrupted(PathBuf),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, StoreError>;
