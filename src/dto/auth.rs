use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// New accounts always start as customers; courier and admin roles are
/// granted out of band.
#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    /// At least 8 characters.
    pub password: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Ready-to-use `Authorization` header value (`Bearer ...`).
    pub token: String,
    /// customer, admin or delivery; decides which surfaces the token opens.
    pub role: String,
}

/// JWT claims. `sub` is the user id; `role` is re-checked against the
/// role enum on every extraction, not trusted as a free string.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}
