//! Legacy message compilation.
//!
//! Account table order: fee payer, remaining writable signers, readonly
//! signers, writable non-signers, readonly non-signers. Program ids are
//! readonly non-signers. Instructions refer to accounts by table index.

use solvault_types::{Blockhash, PublicKey};

use crate::shortvec::encode_len;
use crate::{Instruction, TransactionError};

/// Account table limit imposed by the one-byte instruction indices.
const MAX_ACCOUNTS: usize = 256;

/// The three counters at the start of every message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed: u8,
    pub num_readonly_unsigned: u8,
}

/// An instruction whose accounts have been replaced by table indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

/// A compiled message ready to be signed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    pub account_keys: Vec<PublicKey>,
    pub recent_blockhash: Blockhash,
    pub instructions: Vec<CompiledInstruction>,
}

struct KeyEntry {
    pubkey: PublicKey,
    is_signer: bool,
    is_writable: bool,
}

impl Message {
    /// Compile `instructions` with `payer` as fee payer.
    pub fn compile(
        payer: &PublicKey,
        instructions: &[Instruction],
        recent_blockhash: Blockhash,
    ) -> Result<Self, TransactionError> {
        let mut entries = vec![KeyEntry {
            pubkey: *payer,
            is_signer: true,
            is_writable: true,
        }];

        let mut upsert = |pubkey: &PublicKey, is_signer: bool, is_writable: bool| {
            match entries.iter_mut().find(|e| e.pubkey == *pubkey) {
                Some(entry) => {
                    entry.is_signer |= is_signer;
                    entry.is_writable |= is_writable;
                }
                None => entries.push(KeyEntry {
                    pubkey: *pubkey,
                    is_signer,
                    is_writable,
                }),
            }
        };
        for ix in instructions {
            for meta in &ix.accounts {
                upsert(&meta.pubkey, meta.is_signer, meta.is_writable);
            }
            upsert(&ix.program_id, false, false);
        }

        if entries.len() > MAX_ACCOUNTS {
            return Err(TransactionError::TooManyAccounts(entries.len()));
        }

        // Stable sort keeps the payer ahead of any other writable signer.
        entries.sort_by_key(|e| (!e.is_signer, !e.is_writable));

        let count = |pred: fn(&KeyEntry) -> bool| entries.iter().filter(|e| pred(e)).count() as u8;
        let header = MessageHeader {
            num_required_signatures: count(|e| e.is_signer),
            num_readonly_signed: count(|e| e.is_signer && !e.is_writable),
            num_readonly_unsigned: count(|e| !e.is_signer && !e.is_writable),
        };

        let account_keys: Vec<PublicKey> = entries.iter().map(|e| e.pubkey).collect();
        let index_of = |pk: &PublicKey| {
            account_keys
                .iter()
                .position(|k| k == pk)
                .map(|i| i as u8)
                .unwrap_or_default()
        };

        let instructions = instructions
            .iter()
            .map(|ix| CompiledInstruction {
                program_id_index: index_of(&ix.program_id),
                accounts: ix.accounts.iter().map(|m| index_of(&m.pubkey)).collect(),
                data: ix.data.clone(),
            })
            .collect();

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions,
        })
    }

    /// The fee payer, always the first account.
    pub fn payer(&self) -> Option<&PublicKey> {
        self.account_keys.first()
    }

    /// Serialise to the bytes that get signed.
    pub fn serialize(&self) -> Result<Vec<u8>, TransactionError> {
        let mut buf = Vec::with_capacity(3 + 1 + self.account_keys.len() * 32 + 32 + 64);
        buf.push(self.header.num_required_signatures);
        buf.push(self.header.num_readonly_signed);
        buf.push(self.header.num_readonly_unsigned);

        encode_len(&mut buf, self.account_keys.len())?;
        for key in &self.account_keys {
            buf.extend_from_slice(key.as_bytes());
        }
        buf.extend_from_slice(self.recent_blockhash.as_bytes());

        encode_len(&mut buf, self.instructions.len())?;
        for ix in &self.instructions {
            buf.push(ix.program_id_index);
            encode_len(&mut buf, ix.accounts.len())?;
            buf.extend_from_slice(&ix.accounts);
            encode_len(&mut buf, ix.data.len())?;
            buf.extend_from_slice(&ix.data);
        }
        Ok(buf)
    }
}
