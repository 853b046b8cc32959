use std::fmt;

use aes_gcm::{
    aead::{generic_array::GenericArray, Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use anyhow::{anyhow, Result};
use chacha20poly1305::ChaCha20Poly1305;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};

// Both ciphers take a 256-bit key and a 96-bit nonce.
pub const KEY_LEN: usize = 32;
pub const NONCE_LEN: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AeadAlgorithm {
    #[serde(rename = "aes-256-gcm")]
    Aes256Gcm,
    #[serde(rename = "chacha20-poly1305")]
    ChaCha20Poly1305,
}

impl fmt::Display for AeadAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AeadAlgorithm::Aes256Gcm => write!(f, "aes-256-gcm"),
            AeadAlgorithm::ChaCha20Poly1305 => write!(f, "chacha20-poly1305"),
        }
    }
}

impl AeadAlgorithm {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "aes-256-gcm" => Some(AeadAlgorithm::Aes256Gcm),
            "chacha20-poly1305" => Some(AeadAlgorithm::ChaCha20Poly1305),
            _ => None,
        }
    }

    pub fn key_size_bits(&self) -> u32 {
        (KEY_LEN * 8) as u32
    }

    /// Fresh random key material from the OS RNG.
    pub fn generate_key(&self) -> Vec<u8> {
        let mut key = vec![0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        key
    }

    /// Seals `plain_text` under `key`. The random nonce is prepended to the
    /// ciphertext so the payload is self-contained.
    pub fn seal(&self, key: &[u8], plain_text: &[u8]) -> Result<Vec<u8>> {
        if key.len() != KEY_LEN {
            return Err(anyhow!("key must be {} bytes, got {}", KEY_LEN, key.len()));
        }

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = match self {
            AeadAlgorithm::Aes256Gcm => {
                let cipher = Aes256Gcm::new(GenericArray::from_slice(key));
                cipher
                    .encrypt(nonce, plain_text)
                    .map_err(|_| anyhow!("aes-256-gcm encryption failed"))?
            }
            AeadAlgorithm::ChaCha20Poly1305 => {
                let cipher = ChaCha20Poly1305::new(GenericArray::from_slice(key));
                cipher
                    .encrypt(nonce, plain_text)
                    .map_err(|_| anyhow!("chacha20-poly1305 encryption failed"))?
            }
        };

        let mut full_ciphertext = nonce_bytes.to_vec();
        full_ciphertext.extend(ciphertext);
        Ok(full_ciphertext)
    }

    /// Opens a payload produced by [`seal`](Self::seal). Fails if the tag does
    /// not verify, so tampered ciphertext never yields output.
    pub fn open(&self, key: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
        if key.len() != KEY_LEN {
            return Err(anyhow!("key must be {} bytes, got {}", KEY_LEN, key.len()));
        }
        if payload.len() < NONCE_LEN {
            return Err(anyhow!("ciphertext too short"));
        }

        let (nonce_bytes, encrypted_data) = payload.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        match self {
            AeadAlgorithm::Aes256Gcm => {
                let cipher = Aes256Gcm::new(GenericArray::from_slice(key));
                cipher
                    .decrypt(nonce, encrypted_data)
                    .map_err(|_| anyhow!("ciphertext rejected: authentication failed"))
            }
            AeadAlgorithm::ChaCha20Poly1305 => {
                let cipher = ChaCha20Poly1305::new(GenericArray::from_slice(key));
                cipher
                    .decrypt(nonce, encrypted_data)
                    .map_err(|_| anyhow!("ciphertext rejected: authentication failed"))
            }
        }
    }
}
