use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload issued by the external identity service. The backend only
/// verifies and reads it; it never signs tokens itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,   // user ID
    pub iat: usize,  // issued at (unix timestamp)
    pub exp: usize,  // expires at (unix timestamp)
    pub iss: String, // issuer
    pub aud: String, // audience
}
