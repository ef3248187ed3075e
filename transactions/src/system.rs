//! System program transfer.

use solvault_types::PublicKey;

use crate::{AccountMeta, Instruction, TransactionError};

/// The system program's address (`11111111111111111111111111111111`).
pub const SYSTEM_PROGRAM_ID: PublicKey = PublicKey([0u8; 32]);

/// Index of `Transfer` in the system instruction enum.
const TRANSFER_TAG: u32 = 2;

/// Move `lamports` from `from` (signer) to `to`.
pub fn transfer(
    from: &PublicKey,
    to: &PublicKey,
    lamports: u64,
) -> Result<Instruction, TransactionError> {
    if lamports == 0 {
        return Err(TransactionError::ZeroAmount);
    }
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&TRANSFER_TAG.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());

    Ok(Instruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![AccountMeta::writable(*from, true), AccountMeta::writable(*to, false)],
        data,
    })
}
