use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::crypto::aead::AeadAlgorithm;

/// A symmetric key held by the in-memory registry. Material lives only in
/// process memory and is never serialized.
#[derive(Debug, Clone)]
pub struct ManagedKey {
    pub id: Uuid,
    pub name: String,
    pub algorithm: AeadAlgorithm,
    pub material: Vec<u8>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub owner: String,
}

impl ManagedKey {
    pub fn new(
        name: String,
        algorithm: AeadAlgorithm,
        material: Vec<u8>,
        expires_at: Option<DateTime<Utc>>,
        owner: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            algorithm,
            material,
            is_active: true,
            created_at: Utc::now(),
            expires_at,
            owner,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| at <= now).unwrap_or(false)
    }
}

/// Wire representation of a managed key, without the secret material.
#[derive(Debug, Serialize)]
pub struct KeyResponse {
    pub id: Uuid,
    pub name: String,
    pub algorithm: AeadAlgorithm,
    pub key_size: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<&ManagedKey> for KeyResponse {
    fn from(key: &ManagedKey) -> Self {
        Self {
            id: key.id,
            name: key.name.clone(),
            algorithm: key.algorithm,
            key_size: key.algorithm.key_size_bits(),
            is_active: key.is_active,
            created_at: key.created_at,
            expires_at: key.expires_at,
        }
    }
}
