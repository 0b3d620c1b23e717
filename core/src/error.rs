use thiserror::Error;

pub type PicklockResult<T> = std::result::Result<T, PicklockError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PicklockError {
    #[error("hashes of kind `{0}` cannot be mapped to a crackable digest")]
    UnsupportedAlgorithm(String),

    #[error("expected a non-empty input string")]
    InvalidInput,
}
