//! Transfer instructions and the legacy single-signer transaction encoding.
//!
//! The wallet emits exactly two kinds of instruction:
//! - **System transfer**: move lamports between two accounts
//! - **SPL token transfer**: move token base units between two token accounts
//!
//! Instructions are compiled into a legacy message (header, account table,
//! recent blockhash, compiled instructions), signed by the fee payer, and
//! serialised to the wire form accepted by `sendTransaction`.

pub mod error;
pub mod instruction;
pub mod message;
pub mod shortvec;
pub mod system;
pub mod token;
pub mod transaction;

pub use error::TransactionError;
pub use instruction::{AccountMeta, Instruction};
pub use message::Message;
pub use transaction::SignedTransaction;
