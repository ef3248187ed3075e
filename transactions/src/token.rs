//! SPL token program transfer.

use solvault_types::PublicKey;

use crate::{AccountMeta, Instruction, TransactionError};

/// `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`
pub const TOKEN_PROGRAM_ID: PublicKey = PublicKey([
    6, 221, 246, 225, 215, 101, 161, 147, 217, 203, 225, 70, 206, 235, 121, 172, 28, 180, 133,
    237, 95, 91, 55, 145, 58, 140, 245, 133, 126, 255, 0, 169,
]);

/// Index of `Transfer` in the token instruction enum.
const TRANSFER_TAG: u8 = 3;

/// Move `amount` base units from token account `source` to token account
/// `destination`, authorised by `owner` (signer).
pub fn transfer(
    source: &PublicKey,
    destination: &PublicKey,
    owner: &PublicKey,
    amount: u64,
) -> Result<Instruction, TransactionError> {
    if amount == 0 {
        return Err(TransactionError::ZeroAmount);
    }
    let mut data = Vec::with_capacity(9);
    data.push(TRANSFER_TAG);
    data.extend_from_slice(&amount.to_le_bytes());

    Ok(Instruction {
        program_id: TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::writable(*source, false),
            AccountMeta::writable(*destination, false),
            AccountMeta::readonly(*owner, true),
        ],
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_id_matches_base58() {
        assert_eq!(
            TOKEN_PROGRAM_ID.to_base58(),
            "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"
        );
    }

    #[test]
    fn transfer_layout() {
        let ix = transfer(
            &PublicKey([1u8; 32]),
            &PublicKey([2u8; 32]),
            &PublicKey([3u8; 32]),
            1_500_000,
        )
        .unwrap();
        assert_eq!(ix.data, vec![3, 0x60, 0xe3, 0x16, 0, 0, 0, 0, 0]);
        assert_eq!(ix.accounts.len(), 3);
        assert!(ix.accounts[2].is_signer);
        assert!(!ix.accounts[2].is_writable);
    }
}
