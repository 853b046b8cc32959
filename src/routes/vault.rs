use base64::engine::general_purpose;
use base64::Engine;
use chrono::{DateTime, Utc};
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::State;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crypto::aead::AeadAlgorithm;
use crate::crypto::digest::sha256_hex;
use crate::errors::ApiError;
use crate::models::key::{KeyResponse, ManagedKey};
use crate::models::operation::{EncryptionOperation, OperationKind};
use crate::routes::auth::AuthenticatedUser;
use crate::store::{KeyStore, OperationLog};

#[derive(Debug, Deserialize)]
pub struct CreateKeyRequest {
    name: String,
    algorithm: String,
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct VaultEncryptRequest {
    data: String,
    algorithm: String,
    key_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct VaultEncryptResponse {
    encrypted_data: String,
    algorithm: AeadAlgorithm,
    key_id: Uuid,
    timestamp: DateTime<Utc>,
    status: String,
    input_hash: String,
    output_hash: String,
}

#[derive(Debug, Deserialize)]
pub struct VaultDecryptRequest {
    encrypted_data: String,
    algorithm: String,
    key_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct VaultDecryptResponse {
    decrypted_data: String,
    algorithm: AeadAlgorithm,
    key_id: Uuid,
    timestamp: DateTime<Utc>,
    status: String,
    input_hash: String,
    output_hash: String,
}

#[derive(Debug, Serialize)]
pub struct OperationListResponse {
    pub operations: Vec<EncryptionOperation>,
    pub total: usize,
}

fn parse_algorithm(name: &str) -> Result<AeadAlgorithm, ApiError> {
    AeadAlgorithm::parse(name).ok_or_else(|| {
        ApiError::BadRequest(format!(
            "Algorithm '{name}' is not supported for authenticated encryption"
        ))
    })
}

/// Looks up a key the caller may use: owned, active, not expired, and of
/// the requested algorithm.
fn usable_key(
    keys: &KeyStore,
    id: Uuid,
    owner: &str,
    algorithm: AeadAlgorithm,
) -> Result<ManagedKey, ApiError> {
    let key = keys
        .find(id)
        .filter(|k| k.owner == owner)
        .ok_or_else(|| ApiError::NotFound(format!("Key '{id}' not found")))?;
    if !key.is_active {
        return Err(ApiError::BadRequest(format!("Key '{id}' is deactivated")));
    }
    if key.is_expired(Utc::now()) {
        return Err(ApiError::BadRequest(format!("Key '{id}' has expired")));
    }
    if key.algorithm != algorithm {
        return Err(ApiError::BadRequest(format!(
            "Key '{id}' is a {} key, not {algorithm}",
            key.algorithm
        )));
    }
    Ok(key)
}

#[post("/keys", format = "json", data = "<req>")]
pub fn create_key(
    req: Json<CreateKeyRequest>,
    auth: AuthenticatedUser,
    keys: &State<KeyStore>,
) -> Result<status::Custom<Json<KeyResponse>>, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Key name must not be empty".to_string()));
    }
    let algorithm = parse_algorithm(&req.algorithm)?;

    let key = ManagedKey::new(
        req.name.trim().to_string(),
        algorithm,
        algorithm.generate_key(),
        req.expires_at,
        auth.user.username.clone(),
    );
    let response = KeyResponse::from(&key);

    log::info!("minted {algorithm} key {} for {}", key.id, key.owner);
    keys.insert(key);

    Ok(status::Custom(Status::Created, Json(response)))
}

#[get("/keys")]
pub fn list_keys(auth: AuthenticatedUser, keys: &State<KeyStore>) -> Json<Vec<KeyResponse>> {
    Json(
        keys.list_for(&auth.user.username)
            .iter()
            .map(KeyResponse::from)
            .collect(),
    )
}

#[delete("/keys/<id>")]
pub fn delete_key(
    id: &str,
    auth: AuthenticatedUser,
    keys: &State<KeyStore>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let key_id = Uuid::parse_str(id)
        .map_err(|_| ApiError::BadRequest(format!("'{id}' is not a valid key id")))?;

    if keys.deactivate(key_id, &auth.user.username) {
        Ok(Json(serde_json::json!({ "message": "Key deactivated" })))
    } else {
        Err(ApiError::NotFound(format!("Key '{key_id}' not found")))
    }
}

/// Authenticated encryption. Without a `key_id` a fresh key is minted and
/// stored, so the ciphertext stays decryptable through the registry.
#[post("/encrypt", format = "json", data = "<req>")]
pub fn encrypt(
    req: Json<VaultEncryptRequest>,
    auth: AuthenticatedUser,
    keys: &State<KeyStore>,
    operations: &State<OperationLog>,
) -> Result<Json<VaultEncryptResponse>, ApiError> {
    let algorithm = parse_algorithm(&req.algorithm)?;
    let owner = &auth.user.username;

    let key = match req.key_id {
        Some(id) => usable_key(keys, id, owner, algorithm)?,
        None => {
            let key = ManagedKey::new(
                format!("auto-{}", Utc::now().format("%Y%m%dT%H%M%S")),
                algorithm,
                algorithm.generate_key(),
                None,
                owner.clone(),
            );
            keys.insert(key.clone());
            key
        }
    };

    let sealed = algorithm.seal(&key.material, req.data.as_bytes())?;
    let encrypted = general_purpose::STANDARD.encode(&sealed);

    let input_hash = sha256_hex(req.data.as_bytes());
    let output_hash = sha256_hex(encrypted.as_bytes());
    operations.record(EncryptionOperation::new(
        OperationKind::Encrypt,
        &algorithm.to_string(),
        input_hash.clone(),
        output_hash.clone(),
        owner.clone(),
    ));

    Ok(Json(VaultEncryptResponse {
        encrypted_data: encrypted,
        algorithm,
        key_id: key.id,
        timestamp: Utc::now(),
        status: "success".to_string(),
        input_hash,
        output_hash,
    }))
}

/// Authenticated decryption. Tampered ciphertext or the wrong key fails
/// closed with a 400, never with garbage plaintext.
#[post("/decrypt", format = "json", data = "<req>")]
pub fn decrypt(
    req: Json<VaultDecryptRequest>,
    auth: AuthenticatedUser,
    keys: &State<KeyStore>,
    operations: &State<OperationLog>,
) -> Result<Json<VaultDecryptResponse>, ApiError> {
    let algorithm = parse_algorithm(&req.algorithm)?;
    let owner = &auth.user.username;

    let key = usable_key(keys, req.key_id, owner, algorithm)?;

    let payload = general_purpose::STANDARD
        .decode(&req.encrypted_data)
        .map_err(|_| ApiError::BadRequest("Encrypted data is not valid base64".to_string()))?;

    let plaintext = algorithm
        .open(&key.material, &payload)
        .map_err(|e| ApiError::BadRequest(format!("Decryption failed: {e}")))?;
    let decrypted = String::from_utf8(plaintext)
        .map_err(|_| ApiError::BadRequest("Decrypted payload is not valid UTF-8".to_string()))?;

    let input_hash = sha256_hex(req.encrypted_data.as_bytes());
    let output_hash = sha256_hex(decrypted.as_bytes());
    operations.record(EncryptionOperation::new(
        OperationKind::Decrypt,
        &algorithm.to_string(),
        input_hash.clone(),
        output_hash.clone(),
        owner.clone(),
    ));

    Ok(Json(VaultDecryptResponse {
        decrypted_data: decrypted,
        algorithm,
        key_id: key.id,
        timestamp: Utc::now(),
        status: "success".to_string(),
        input_hash,
        output_hash,
    }))
}

#[get("/operations")]
pub fn operations(
    auth: AuthenticatedUser,
    operations: &State<OperationLog>,
) -> Json<OperationListResponse> {
    let ops = operations.list_for(&auth.user.username);
    let total = ops.len();
    Json(OperationListResponse {
        operations: ops,
        total,
    })
}
