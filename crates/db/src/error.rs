use brigade_core::error::CoreError;

/// Error type for repository operations that mix domain rules with database
/// access. Plain CRUD methods keep returning `sqlx::Error` directly; methods
/// that can fail validation or existence checks return this.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;
