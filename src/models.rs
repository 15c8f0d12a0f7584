use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{employee::Employee, role::Role};

/// Registration body. Fields are optional so that a missing field is
/// reported as a validation error rather than a deserialization failure.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterReq {
    #[schema(example = "John Doe")]
    pub name: Option<String>,
    #[schema(example = "john.doe@company.com")]
    pub email: Option<String>,
    #[schema(example = "s3cret")]
    pub password: Option<String>,
    #[schema(example = "DevOps")]
    pub department: Option<String>,
}

/// `email` accepts either an email address or an employee code.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginReq {
    #[schema(example = "EMP001")]
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub employee: Employee,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Employee row id.
    pub sub: u64,
    pub email: String,
    pub role: Role,
    pub exp: usize,
    pub jti: String,
}
