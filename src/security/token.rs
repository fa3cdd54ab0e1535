//! Session tokens: base64url-encoded claims signed with HMAC-SHA256.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
}

pub fn issue(user_id: Uuid, secret: &str, ttl_hours: i64) -> Result<String, AppError> {
    let claims = Claims {
        sub: user_id,
        exp: (Utc::now() + Duration::hours(ttl_hours)).timestamp(),
    };
    let payload = serde_json::to_vec(&claims)
        .map_err(|e| AppError::Internal(format!("error firmando token: {e}")))?;
    let encoded = URL_SAFE_NO_PAD.encode(payload);
    let signature = sign(secret, encoded.as_bytes())?;

    Ok(format!("{encoded}.{signature}"))
}

/// Verifies the signature in constant time, then checks expiry.
pub fn verify(token: &str, secret: &str) -> Result<Claims, AppError> {
    let (encoded, signature) = token
        .split_once('.')
        .ok_or_else(|| AppError::Unauthorized("token mal formado".to_string()))?;

    let expected = hex::decode(signature)
        .map_err(|_| AppError::Unauthorized("token mal formado".to_string()))?;

    let mut mac = new_mac(secret)?;
    mac.update(encoded.as_bytes());
    mac.verify_slice(&expected)
        .map_err(|_| AppError::Unauthorized("firma de token invalida".to_string()))?;

    let payload = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|_| AppError::Unauthorized("token mal formado".to_string()))?;
    let claims: Claims = serde_json::from_slice(&payload)
        .map_err(|_| AppError::Unauthorized("token mal formado".to_string()))?;

    if claims.exp <= Utc::now().timestamp() {
        return Err(AppError::Unauthorized("token expirado".to_string()));
    }

    Ok(claims)
}

fn new_mac(secret: &str) -> Result<HmacSha256, AppError> {
    HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| AppError::Internal("secreto de token invalido".to_string()))
}

fn sign(secret: &str, data: &[u8]) -> Result<String, AppError> {
    let mut mac = new_mac(secret)?;
    mac.update(data);
    Ok(hex::encode(mac.finalize().into_bytes()))
}
