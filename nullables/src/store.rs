//! Nullable credential store: thread-safe in-memory storage for testing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use solvault_crypto::Mnemonic;
use solvault_store::{CredentialStore, StoreError};

/// An in-memory [`CredentialStore`] with failure injection.
#[derive(Default)]
pub struct NullCredentialStore {
    record: Mutex<Option<String>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl NullCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `mnemonic`.
    pub fn with_mnemonic(mnemonic: &Mnemonic) -> Self {
        let store = Self::new();
        store.put_raw(mnemonic.as_str());
        store
    }

    /// Store an arbitrary string, bypassing validation.
    pub fn put_raw(&self, phrase: &str) {
        *self.record.lock().unwrap() = Some(phrase.to_string());
    }

    /// The raw stored record, if any.
    pub fn raw(&self) -> Option<String> {
        self.record.lock().unwrap().clone()
    }

    /// Make `save` and `clear` fail until reset.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make `load` fail until reset.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool, op: &str) -> Result<(), StoreError> {
        if flag.load(Ordering::SeqCst) {
            Err(StoreError::Backend(format!("injected {op} failure")))
        } else {
            Ok(())
        }
    }
}

impl CredentialStore for NullCredentialStore {
    fn save(&self, mnemonic: &Mnemonic) -> Result<(), StoreError> {
        Self::check(&self.fail_writes, "write")?;
        self.put_raw(mnemonic.as_str());
        Ok(())
    }

    fn load(&self) -> Result<Option<Mnemonic>, StoreError> {
        Self::check(&self.fail_reads, "read")?;
        Ok(self
            .record
            .lock()
            .unwrap()
            .as_deref()
            .and_then(|raw| Mnemonic::parse(raw).ok()))
    }

    fn clear(&self) -> Result<(), StoreError> {
        Self::check(&self.fail_writes, "write")?;
        self.record.lock().unwrap().take();
        Ok(())
    }
}
