//! Signing and wire serialisation.

use solvault_crypto::sign_message;
use solvault_types::{KeyPair, Signature};

use crate::shortvec::encode_len;
use crate::{Message, TransactionError};

/// A message together with the fee payer's signature.
#[derive(Clone, Debug)]
pub struct SignedTransaction {
    signatures: Vec<Signature>,
    message: Vec<u8>,
}

impl SignedTransaction {
    /// Sign `message` with `signer`, which must be the message's fee payer and
    /// its only required signer.
    pub fn sign(message: &Message, signer: &KeyPair) -> Result<Self, TransactionError> {
        let required = message.header.num_required_signatures as usize;
        if required != 1 {
            return Err(TransactionError::UnsupportedSigners(required));
        }
        if message.payer() != Some(&signer.public) {
            return Err(TransactionError::WrongSigner {
                payer: message
                    .payer()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            });
        }

        let bytes = message.serialize()?;
        let signature = sign_message(&bytes, &signer.private);
        Ok(Self {
            signatures: vec![signature],
            message: bytes,
        })
    }

    /// The fee payer's signature, which is also the transaction id.
    pub fn signature(&self) -> Signature {
        self.signatures[0]
    }

    pub fn message_bytes(&self) -> &[u8] {
        &self.message
    }

    /// Wire form: compact signature array followed by the message.
    pub fn to_wire(&self) -> Result<Vec<u8>, TransactionError> {
        let mut buf = Vec::with_capacity(1 + self.signatures.len() * 64 + self.message.len());
        encode_len(&mut buf, self.signatures.len())?;
        for sig in &self.signatures {
            buf.extend_from_slice(sig.as_bytes());
        }
        buf.extend_from_slice(&self.message);
        Ok(buf)
    }
}
