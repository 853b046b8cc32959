use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};

use crate::crypto::digest::sha256_hex;
use crate::errors::ApiError;

#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmInfo {
    pub name: &'static str,
    pub value: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

lazy_static! {
    // Fixed catalog, order is part of the contract.
    static ref ALGORITHM_CATALOG: Vec<AlgorithmInfo> = vec![
        AlgorithmInfo { name: "AES-256-GCM", value: "aes-256-gcm", kind: "symmetric" },
        AlgorithmInfo { name: "ChaCha20-Poly1305", value: "chacha20-poly1305", kind: "symmetric" },
        AlgorithmInfo { name: "RSA-4096", value: "rsa-4096", kind: "asymmetric" },
        AlgorithmInfo { name: "Ed25519", value: "ed25519", kind: "asymmetric" },
    ];
}

#[derive(Debug, Serialize)]
pub struct AlgorithmListResponse {
    pub algorithms: Vec<AlgorithmInfo>,
}

// Optional fields so a missing key surfaces as our own 400 instead of a
// deserialization failure.
#[derive(Debug, Deserialize)]
pub struct DemoEncryptRequest {
    data: Option<String>,
    algorithm: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DemoEncryptResponse {
    encrypted_data: String,
    algorithm: String,
    timestamp: DateTime<Utc>,
    status: String,
}

#[derive(Debug, Deserialize)]
pub struct DemoDecryptRequest {
    encrypted_data: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DemoDecryptResponse {
    decrypted_data: String,
    timestamp: DateTime<Utc>,
    status: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    service: String,
    timestamp: DateTime<Utc>,
}

// Preflight requests land here with an empty 200 body; the CORS fairing
// attaches the access-control headers on the way out. Without this route
// the fairing would answer 204 instead.
#[options("/<_..>")]
pub fn preflight() {}

#[get("/")]
pub fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Welcome to CipherCanary API",
        "version": "1.0.0",
    }))
}

#[get("/algorithms")]
pub fn algorithms() -> Json<AlgorithmListResponse> {
    Json(AlgorithmListResponse {
        algorithms: ALGORITHM_CATALOG.clone(),
    })
}

/// Demo-grade "encryption": a one-way SHA-256 digest of plaintext and
/// algorithm name. Deterministic, irreversible, and deliberately not a
/// cipher. Stateless like the rest of the demo surface, so nothing is
/// audit-logged here.
#[post("/encrypt", format = "json", data = "<req>")]
pub fn encrypt(req: Json<DemoEncryptRequest>) -> Result<Json<DemoEncryptResponse>, ApiError> {
    let (data, algorithm) = match (&req.data, &req.algorithm) {
        (Some(data), Some(algorithm)) => (data, algorithm),
        _ => {
            return Err(ApiError::BadRequest(
                "Missing data or algorithm".to_string(),
            ))
        }
    };

    let encrypted = sha256_hex(format!("{data}{algorithm}").as_bytes());

    Ok(Json(DemoEncryptResponse {
        encrypted_data: encrypted,
        algorithm: algorithm.clone(),
        timestamp: Utc::now(),
        status: "success".to_string(),
    }))
}

#[get("/encrypt")]
pub fn encrypt_wrong_method() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Demo-grade "decryption": echoes the input behind a fixed prefix. Never
/// recovers plaintext; the inverse of nothing.
#[post("/decrypt", format = "json", data = "<req>")]
pub fn decrypt(req: Json<DemoDecryptRequest>) -> Result<Json<DemoDecryptResponse>, ApiError> {
    let encrypted_data = match &req.encrypted_data {
        Some(encrypted_data) => encrypted_data,
        None => return Err(ApiError::BadRequest("Missing encrypted data".to_string())),
    };

    let decrypted = format!("Decrypted: {encrypted_data}");

    Ok(Json(DemoDecryptResponse {
        decrypted_data: decrypted,
        timestamp: Utc::now(),
        status: "success".to_string(),
    }))
}

#[get("/decrypt")]
pub fn decrypt_wrong_method() -> ApiError {
    ApiError::MethodNotAllowed
}

#[get("/health")]
pub fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "CipherCanary API".to_string(),
        timestamp: Utc::now(),
    })
}
