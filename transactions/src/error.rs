use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error("amount must be positive")]
    ZeroAmount,

    #[error("transaction needs {0} signatures, only single-signer transfers are supported")]
    UnsupportedSigners(usize),

    #[error("too many accounts in message: {0}")]
    TooManyAccounts(usize),

    #[error("length {0} does not fit a compact-u16")]
    LengthOverflow(usize),

    #[error("signing key does not match fee payer {payer}")]
    WrongSigner { payer: String },
}
