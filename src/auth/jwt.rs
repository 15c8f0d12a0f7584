use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    error::{AttendanceError, Result},
    model::employee::Employee,
    models::Claims,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as usize)
        .unwrap_or_default()
}

pub fn generate_access_token(employee: &Employee, secret: &str, ttl: usize) -> Result<String> {
    let claims = Claims {
        sub: employee.id,
        email: employee.email.clone(),
        role: employee.role,
        exp: now().saturating_add(ttl),
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AttendanceError::Internal(format!("token encoding failed: {e}")))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}
