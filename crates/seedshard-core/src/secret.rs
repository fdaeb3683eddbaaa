//! The master secret: raw entropy that roots one split.

use crate::memory::SecretBuffer;
use rand::{CryptoRng, RngCore};
use std::fmt;
use thiserror::Error;

/// Minimum master secret length in bytes (128 bits)
pub const MIN_SECRET_LEN: usize = 16;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecretError {
    #[error("Master secret must be an even number of bytes, at least {MIN_SECRET_LEN} (got {0})")]
    Length(usize),
}

/// Raw master secret bytes.
///
/// Always an even number of bytes and at least 128 bits. The bytes live in a
/// [`SecretBuffer`], so they are locked in memory where the platform allows
/// and zeroized when the value is dropped. `Debug` never prints the bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct MasterSecret(SecretBuffer);

impl MasterSecret {
    /// Wrap existing entropy, checking the length rules.
    pub fn new(bytes: &[u8]) -> Result<Self, SecretError> {
        check_len(bytes.len())?;
        Ok(Self(SecretBuffer::from_slice(bytes)))
    }

    /// Draw `len` fresh bytes from a cryptographically secure source.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R, len: usize) -> Result<Self, SecretError> {
        check_len(len)?;
        let mut buf = SecretBuffer::new(len);
        rng.fill_bytes(buf.as_mut_slice());
        Ok(Self(buf))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bit strength of the secret.
    pub fn bits(&self) -> usize {
        self.0.len() * 8
    }
}

impl AsRef<[u8]> for MasterSecret {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MasterSecret(<{} bytes redacted>)", self.len())
    }
}

fn check_len(len: usize) -> Result<(), SecretError> {
    if len < MIN_SECRET_LEN || len % 2 != 0 {
        return Err(SecretError::Length(len));
    }
    Ok(())
}
