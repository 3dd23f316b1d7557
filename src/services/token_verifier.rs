use chrono::DateTime;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use tracing::debug;

use crate::config::settings::AuthConfig;
use crate::models::AuthenticatedUser;

/// Token verification failures, all mapped to 401 at the HTTP boundary
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Malformed token")]
    Malformed,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token signature")]
    BadSignature,

    #[error("Token missing required claim: {0}")]
    MissingClaim(String),
}

/// Stateless bearer-token verification.
///
/// Tokens are issued by a separate identity service; this side only
/// verifies the shared-secret signature and extracts the minimal identity
/// used for audit attribution.
#[cfg_attr(test, mockall::automock)]
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

/// JWT verifier with an algorithm allow-list, clock-skew leeway and a
/// configurable claim-name mapping
pub struct JwtTokenVerifier {
    key: DecodingKey,
    validation: Validation,
    subject_claim: String,
    role_claim: String,
}

impl JwtTokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let algorithms = config.parsed_algorithms();

        // Config validation guarantees a non-empty, symmetric allow-list
        let mut validation =
            Validation::new(algorithms.first().copied().unwrap_or(Algorithm::HS256));
        if !algorithms.is_empty() {
            validation.algorithms = algorithms;
        }
        validation.leeway = config.leeway_seconds;
        validation.validate_exp = true;

        Self {
            key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            subject_claim: config.subject_claim.clone(),
            role_claim: config.role_claim.clone(),
        }
    }

    fn claim_as_string(claims: &serde_json::Value, name: &str) -> Option<String> {
        match claims.get(name)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl TokenVerifier for JwtTokenVerifier {
    fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<serde_json::Value>(token, &self.key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AuthError::BadSignature
                }
                _ => AuthError::Malformed,
            },
        )?;

        let claims = data.claims;

        let subject = Self::claim_as_string(&claims, &self.subject_claim)
            .ok_or_else(|| AuthError::MissingClaim(self.subject_claim.clone()))?;
        let role = Self::claim_as_string(&claims, &self.role_claim)
            .ok_or_else(|| AuthError::MissingClaim(self.role_claim.clone()))?;

        let expires_at = claims
            .get("exp")
            .and_then(|v| v.as_i64())
            .and_then(|seconds| DateTime::from_timestamp(seconds, 0));

        debug!(subject = %subject, role = %role, "Token verified");

        Ok(AuthenticatedUser {
            subject,
            role,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "test-secret";

    fn config() -> AuthConfig {
        AuthConfig {
            secret: SECRET.to_string(),
            algorithms: vec!["HS256".to_string(), "HS512".to_string()],
            leeway_seconds: 30,
            subject_claim: "sub".to_string(),
            role_claim: "role".to_string(),
        }
    }

    fn sign(claims: &serde_json::Value, algorithm: Algorithm, secret: &str) -> String {
        encode(
            &Header::new(algorithm),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_yields_identity() {
        let verifier = JwtTokenVerifier::new(&config());
        let exp = Utc::now().timestamp() + 3600;
        let token = sign(
            &json!({"sub": "user-42", "role": "ADMIN", "exp": exp}),
            Algorithm::HS256,
            SECRET,
        );

        let user = verifier.verify(&token).unwrap();
        assert_eq!(user.subject, "user-42");
        assert_eq!(user.role, "ADMIN");
        assert!(user.expires_at.is_some());
    }

    #[test]
    fn every_allow_listed_algorithm_is_accepted() {
        let verifier = JwtTokenVerifier::new(&config());
        let exp = Utc::now().timestamp() + 3600;
        let claims = json!({"sub": "user-42", "role": "COACH", "exp": exp});

        for algorithm in [Algorithm::HS256, Algorithm::HS512] {
            let token = sign(&claims, algorithm, SECRET);
            assert!(verifier.verify(&token).is_ok());
        }
    }

    #[test]
    fn algorithm_outside_allow_list_is_rejected() {
        let mut cfg = config();
        cfg.algorithms = vec!["HS256".to_string()];
        let verifier = JwtTokenVerifier::new(&cfg);

        let exp = Utc::now().timestamp() + 3600;
        let token = sign(
            &json!({"sub": "user-42", "role": "ADMIN", "exp": exp}),
            Algorithm::HS384,
            SECRET,
        );

        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected_beyond_leeway() {
        let verifier = JwtTokenVerifier::new(&config());
        let exp = Utc::now().timestamp() - 120;
        let token = sign(
            &json!({"sub": "user-42", "role": "ADMIN", "exp": exp}),
            Algorithm::HS256,
            SECRET,
        );

        assert!(matches!(verifier.verify(&token), Err(AuthError::Expired)));
    }

    #[test]
    fn leeway_absorbs_small_clock_drift() {
        let verifier = JwtTokenVerifier::new(&config());
        let exp = Utc::now().timestamp() - 10;
        let token = sign(
            &json!({"sub": "user-42", "role": "ADMIN", "exp": exp}),
            Algorithm::HS256,
            SECRET,
        );

        assert!(verifier.verify(&token).is_ok());
    }

    #[test]
    fn wrong_secret_fails_signature_check() {
        let verifier = JwtTokenVerifier::new(&config());
        let exp = Utc::now().timestamp() + 3600;
        let token = sign(
            &json!({"sub": "user-42", "role": "ADMIN", "exp": exp}),
            Algorithm::HS256,
            "other-secret",
        );

        assert!(matches!(verifier.verify(&token), Err(AuthError::BadSignature)));
    }

    #[test]
    fn garbage_token_is_malformed() {
        let verifier = JwtTokenVerifier::new(&config());
        assert!(matches!(verifier.verify("not.a.jwt"), Err(AuthError::Malformed)));
    }

    #[test]
    fn claim_mapping_follows_configuration() {
        let mut cfg = config();
        cfg.subject_claim = "account_id".to_string();
        cfg.role_claim = "rol".to_string();
        let verifier = JwtTokenVerifier::new(&cfg);

        let exp = Utc::now().timestamp() + 3600;
        let token = sign(
            &json!({"account_id": 7, "rol": "COACH", "exp": exp}),
            Algorithm::HS256,
            SECRET,
        );

        let user = verifier.verify(&token).unwrap();
        assert_eq!(user.subject, "7");
        assert_eq!(user.role, "COACH");
    }

    #[test]
    fn missing_role_claim_is_reported() {
        let verifier = JwtTokenVerifier::new(&config());
        let exp = Utc::now().timestamp() + 3600;
        let token = sign(&json!({"sub": "user-42", "exp": exp}), Algorithm::HS256, SECRET);

        assert!(matches!(
            verifier.verify(&token),
            Err(AuthError::MissingClaim(claim)) if claim == "role"
        ));
    }
}
