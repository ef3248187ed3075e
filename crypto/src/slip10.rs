//! SLIP-0010 hierarchical derivation for Ed25519.
//!
//! Ed25519 only supports hardened children: every path segment must carry the
//! `'` (or `h`) marker. The master node is `HMAC-SHA512("ed25519 seed", seed)`;
//! each child is `HMAC-SHA512(chain_code, 0x00 || key || ser32(index))`, with
//! the left half becoming the child key and the right half its chain code.

use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::mnemonic::MnemonicError;

type HmacSha512 = Hmac<Sha512>;

const ED25519_CURVE_KEY: &[u8] = b"ed25519 seed";

/// Offset added to an index to mark it hardened.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// A node in the derivation tree: 32-byte secret key plus chain code.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ExtendedKey {
    pub key: [u8; 32],
    pub chain_code: [u8; 32],
}

impl ExtendedKey {
    fn from_hmac(key: &[u8], data: &[&[u8]]) -> Result<Self, MnemonicError> {
        let mut mac = HmacSha512::new_from_slice(key)
            .map_err(|e| MnemonicError::DerivationFailed(e.to_string()))?;
        for part in data {
            mac.update(part);
        }
        let mut out = [0u8; 64];
        out.copy_from_slice(&mac.finalize().into_bytes());

        let mut node = Self {
            key: [0u8; 32],
            chain_code: [0u8; 32],
        };
        node.key.copy_from_slice(&out[..32]);
        node.chain_code.copy_from_slice(&out[32..]);
        out.zeroize();
        Ok(node)
    }

    /// Master node for a BIP39 (or any) seed.
    pub fn master(seed: &[u8]) -> Result<Self, MnemonicError> {
        Self::from_hmac(ED25519_CURVE_KEY, &[seed])
    }

    /// Derive a hardened child. `index` must already include [`HARDENED_OFFSET`].
    pub fn child(&self, index: u32) -> Result<Self, MnemonicError> {
        if index < HARDENED_OFFSET {
            return Err(MnemonicError::InvalidPath(format!(
                "ed25519 supports hardened derivation only, got index {index}"
            )));
        }
        Self::from_hmac(&self.chain_code, &[&[0u8], &self.key, &index.to_be_bytes()])
    }
}

/// Parse a path such as `m/44'/501'/0'/0'` into hardened child indices.
pub fn parse_derivation_path(path: &str) -> Result<Vec<u32>, MnemonicError> {
    let mut segments = path.trim().split('/');
    if segments.next() != Some("m") {
        return Err(MnemonicError::InvalidPath(format!(
            "{path}: path must start with 'm'"
        )));
    }

    segments
        .map(|segment| {
            let digits = segment
                .strip_suffix('\'')
                .or_else(|| segment.strip_suffix('h'))
                .or_else(|| segment.strip_suffix('H'))
                .ok_or_else(|| {
                    MnemonicError::InvalidPath(format!(
                        "{path}: segment '{segment}' is not hardened"
                    ))
                })?;
            let index: u32 = digits.parse().map_err(|_| {
                MnemonicError::InvalidPath(format!("{path}: bad segment '{segment}'"))
            })?;
            if index >= HARDENED_OFFSET {
                return Err(MnemonicError::InvalidPath(format!(
                    "{path}: index {index} out of range"
                )));
            }
            Ok(index + HARDENED_OFFSET)
        })
        .collect()
}

/// Walk `path` from the master node of `seed`.
pub fn derive_ed25519(seed: &[u8], path: &[u32]) -> Result<ExtendedKey, MnemonicError> {
    let mut node = ExtendedKey::master(seed)?;
    for &index in path {
        node = node.child(index)?;
    }
    Ok(node)
}
