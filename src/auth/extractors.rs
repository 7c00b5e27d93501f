use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use uuid::Uuid;

use super::claims::Claims;
use crate::state::AppState;

/// Extracts and validates JWT, returning the user ID.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Read Authorization header
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or((StatusCode::UNAUTHORIZED, "missing Authorization header".into()))?;

        // Expect "Bearer <token>"
        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or((StatusCode::UNAUTHORIZED, "invalid auth scheme".into()))?;

        let claims = verify_token(token, &state.config.jwt)
            .map_err(|_| (StatusCode::UNAUTHORIZED, "invalid or expired token".into()))?;

        Ok(AuthUser(claims.sub))
    }
}

pub fn verify_token(token: &str, cfg: &crate::config::JwtConfig) -> anyhow::Result<Claims> {
    let mut validation = Validation::default();
    validation.set_audience(std::slice::from_ref(&cfg.audience));
    validation.set_issuer(std::slice::from_ref(&cfg.issuer));
    let decoding = DecodingKey::from_secret(cfg.secret.as_bytes());

    let data = decode::<Claims>(token, &decoding, &validation)?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use time::OffsetDateTime;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("sign test token")
    }

    fn claims_for(cfg: &JwtConfig, user_id: Uuid) -> Claims {
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        Claims {
            sub: user_id,
            iat: now,
            exp: now + 300,
            iss: cfg.issuer.clone(),
            aud: cfg.audience.clone(),
        }
    }

    #[test]
    fn verifies_token_from_the_identity_service() {
        let cfg = test_config();
        let user_id = Uuid::new_v4();
        let token = sign(&claims_for(&cfg, user_id), &cfg.secret);

        let claims = verify_token(&token, &cfg).expect("verify token");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
    }

    #[test]
    fn rejects_wrong_issuer_or_audience() {
        let cfg = test_config();
        let mut claims = claims_for(&cfg, Uuid::new_v4());
        claims.iss = "someone-else".into();
        let token = sign(&claims, &cfg.secret);

        assert!(verify_token(&token, &cfg).is_err());
    }

    #[test]
    fn rejects_wrong_secret() {
        let cfg = test_config();
        let token = sign(&claims_for(&cfg, Uuid::new_v4()), "other-secret");

        assert!(verify_token(&token, &cfg).is_err());
    }
}
