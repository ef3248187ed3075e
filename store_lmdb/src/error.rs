use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<heed::Error> for LmdbError {
    fn from(e: heed::Error) -> Self {
        LmdbError::Heed(e.to_string())
    }
}

impl From<LmdbError> for solvault_store::StoreError {
    fn from(e: LmdbError) -> Self {
        match e {
            LmdbError::Io(io) => solvault_store::StoreError::Io(io),
            other => solvault_store::StoreError::Backend(other.to_string()),
        }
    }
}
