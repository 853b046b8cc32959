use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Encrypt,
    Decrypt,
}

/// Audit record for a single encrypt or decrypt request. Payloads are
/// recorded as SHA-256 digests, never as plaintext.
#[derive(Debug, Clone, Serialize)]
pub struct EncryptionOperation {
    pub id: Uuid,
    pub operation: OperationKind,
    pub algorithm: String,
    pub input_hash: String,
    pub output_hash: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub owner: String,
}

impl EncryptionOperation {
    pub fn new(
        operation: OperationKind,
        algorithm: &str,
        input_hash: String,
        output_hash: String,
        owner: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            operation,
            algorithm: algorithm.to_string(),
            input_hash,
            output_hash,
            status: "success".to_string(),
            timestamp: Utc::now(),
            owner,
        }
    }
}
