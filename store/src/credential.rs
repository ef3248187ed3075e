//! Credential storage trait.

use solvault_crypto::Mnemonic;

use crate::StoreError;

/// Fixed key under which the single credential record is stored.
pub const CREDENTIAL_KEY: &str = "mnemonic";

/// Persists the one mnemonic an installation owns.
///
/// Implementations must make `save` atomic: after a crash mid-write, `load`
/// returns either the previous record, the new record, or nothing, never a
/// truncated phrase. A stored value that does not validate as a mnemonic is
/// reported as absent.
pub trait CredentialStore: Send + Sync {
    /// Store `mnemonic`, replacing any existing record.
    fn save(&self, mnemonic: &Mnemonic) -> Result<(), StoreError>;

    /// Return the stored mnemonic, or `None` if there is none (or it is unreadable).
    fn load(&self) -> Result<Option<Mnemonic>, StoreError>;

    /// Delete the record. Succeeds when there is nothing to delete.
    fn clear(&self) -> Result<(), StoreError>;

    /// Whether a valid record exists.
    fn exists(&self) -> Result<bool, StoreError> {
        Ok(self.load()?.is_some())
    }
}
