//! LMDB implementation of CredentialStore.

use std::path::Path;

use heed::types::{Bytes, Str};
use heed::{Database, Env};

use solvault_crypto::Mnemonic;
use solvault_store::{CredentialStore, StoreError, CREDENTIAL_KEY};

use crate::environment::{LmdbEnvironment, DEFAULT_MAP_SIZE};
use crate::LmdbError;

const CREDENTIALS_DB: &str = "credentials";

pub struct LmdbCredentialStore {
    env: Env,
    db: Database<Str, Bytes>,
}

impl LmdbCredentialStore {
    /// Open (or create) the credential database inside `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        let environment = LmdbEnvironment::open(data_dir, DEFAULT_MAP_SIZE)?;
        Self::from_environment(&environment)
    }

    pub fn from_environment(environment: &LmdbEnvironment) -> Result<Self, StoreError> {
        let env = environment.env().clone();
        let mut wtxn = env.write_txn().map_err(LmdbError::from)?;
        let db: Database<Str, Bytes> = env
            .create_database(&mut wtxn, Some(CREDENTIALS_DB))
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(Self { env, db })
    }

    /// Write raw bytes under the credential key, bypassing validation.
    #[cfg(test)]
    fn put_raw(&self, value: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.db
            .put(&mut wtxn, CREDENTIAL_KEY, value)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

impl CredentialStore for LmdbCredentialStore {
    fn save(&self, mnemonic: &Mnemonic) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.db
            .put(&mut wtxn, CREDENTIAL_KEY, mnemonic.as_str().as_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        tracing::debug!("credential record saved");
        Ok(())
    }

    fn load(&self) -> Result<Option<Mnemonic>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let Some(bytes) = self
            .db
            .get(&rtxn, CREDENTIAL_KEY)
            .map_err(LmdbError::from)?
        else {
            return Ok(None);
        };

        let Ok(phrase) = std::str::from_utf8(bytes) else {
            tracing::warn!("credential record is not UTF-8, treating as absent");
            return Ok(None);
        };
        match Mnemonic::parse(phrase) {
            Ok(mnemonic) => Ok(Some(mnemonic)),
            Err(e) => {
                tracing::warn!(error = %e, "credential record failed validation, treating as absent");
                Ok(None)
            }
        }
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let existed = self
            .db
            .delete(&mut wtxn, CREDENTIAL_KEY)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        tracing::debug!(existed, "credential record cleared");
        Ok(())
    }
}
