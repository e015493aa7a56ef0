use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

use crate::config::ConfigError;

// Errors returned by access-token verification + subject extraction.
//
// Every variant maps to a plain 401 at the HTTP layer; the split only exists
// so the server log can tell a garbled token from a forged one.
#[derive(Debug, Error)]
pub enum AccessJwtError {
    #[error("malformed token: {0}")]
    Malformed(#[source] jsonwebtoken::errors::Error),
    #[error("signature rejected")]
    BadSignature,
    #[error("token expired or not yet valid")]
    Expired,
    #[error("missing or empty 'sub' claim")]
    MissingSubject,
}

impl From<jsonwebtoken::errors::Error> for AccessJwtError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            // InvalidAlgorithm covers downgrade attempts: a token whose header
            // declares RS256/ES256/... never reaches signature comparison.
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Self::BadSignature,
            ErrorKind::ExpiredSignature | ErrorKind::ImmatureSignature => Self::Expired,
            // Bad segment count, undecodable base64/JSON, unknown alg name, etc.
            _ => Self::Malformed(e),
        }
    }
}

/// Access token (JWT) claims.
///
/// NOTE:
/// - `sub` is kept optional so its absence surfaces as `MissingSubject`
///   instead of a deserialization error.
/// - `exp` is optional but enforced (with leeway) whenever present, matching
///   the issuer's tokens which always carry it.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    #[serde(default)]
    pub sub: Option<String>,

    #[serde(default)]
    pub exp: Option<u64>,
    #[serde(default)]
    pub iat: Option<u64>,
}

/// AuthService が返す「検証済み・アプリ側で使う型」
///
/// - `user_id` は `sub` をそのまま持つ opaque な文字列
///   (DB 側も text として比較するので UUID には昇格させない)
#[derive(Debug, Clone)]
pub struct VerifiedAccessToken {
    pub user_id: String,
}

/// HMAC (shared-secret) access-token verifier.
///
/// - Stateless and cheap to call: verification is pure in-memory work on the
///   token plus the secret loaded at startup.
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct AuthService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("AuthService")
            .field("validation", &self.validation)
            .finish()
    }
}

impl AuthService {
    /// Build a verifier over the shared secret.
    ///
    /// An empty secret is a deployment mistake, not a per-request condition,
    /// so it fails construction (and therefore startup).
    pub fn new(secret: &str, leeway_seconds: u64) -> Result<Self, ConfigError> {
        if secret.trim().is_empty() {
            return Err(ConfigError::Invalid("SUPABASE_JWT_SECRET"));
        }

        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        // HMAC family only: a header declaring any other algorithm is
        // rejected before signature comparison.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = leeway_seconds;
        // `exp` is not required, but is still enforced whenever present.
        validation.required_spec_claims = Default::default();
        // No expected audience is configured, and jsonwebtoken's default
        // rejects any token that carries `aud` in that case. Issued tokens
        // always carry `aud: "authenticated"`, so skip the check entirely;
        // only `sub` is consumed here.
        validation.validate_aud = false;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    // Verify structure + signature (+ exp when present) and decode the claims.
    pub fn verify(&self, token: &str) -> Result<AccessTokenClaims, AccessJwtError> {
        let data = jsonwebtoken::decode::<AccessTokenClaims>(
            token,
            &self.decoding_key,
            &self.validation,
        )?;

        Ok(data.claims)
    }

    /// Verify, then require a usable identity.
    ///
    /// This is the entry-point for middleware: a token that passes signature
    /// checks but names nobody (`sub` missing or blank) is still rejected,
    /// and nothing gets bound to the request.
    pub fn verify_subject(&self, token: &str) -> Result<VerifiedAccessToken, AccessJwtError> {
        let claims = self.verify(token)?;

        let user_id = match claims.sub {
            Some(sub) if !sub.trim().is_empty() => sub,
            _ => return Err(AccessJwtError::MissingSubject),
        };

        Ok(VerifiedAccessToken { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    // Fixed instants keep the tests deterministic: one far in the future
    // (2100-01-01), one safely in the past.
    const FUTURE_EXP: u64 = 4_102_444_800;
    const PAST_EXP: u64 = 1_600_000_000;

    fn sign(secret: &str, alg: Algorithm, claims: &serde_json::Value) -> String {
        jsonwebtoken::encode(
            &Header::new(alg),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn service(secret: &str) -> AuthService {
        AuthService::new(secret, 0).unwrap()
    }

    #[test]
    fn accepts_correctly_signed_token_and_returns_subject() {
        let token = sign("s3cret", Algorithm::HS256, &json!({"sub": "user-42", "exp": FUTURE_EXP}));

        let verified = service("s3cret").verify_subject(&token).unwrap();
        assert_eq!(verified.user_id, "user-42");
    }

    #[test]
    fn accepts_token_carrying_an_audience_claim() {
        // Issued tokens always include `aud: "authenticated"`; with no
        // expected audience configured, its presence must not reject.
        let token = sign(
            "s3cret",
            Algorithm::HS256,
            &json!({"sub": "user-42", "aud": "authenticated", "exp": FUTURE_EXP}),
        );

        let verified = service("s3cret").verify_subject(&token).unwrap();
        assert_eq!(verified.user_id, "user-42");
    }

    #[test]
    fn accepts_any_hmac_family_algorithm() {
        let token = sign("s3cret", Algorithm::HS512, &json!({"sub": "user-42", "exp": FUTURE_EXP}));

        let verified = service("s3cret").verify_subject(&token).unwrap();
        assert_eq!(verified.user_id, "user-42");
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = sign("wrong", Algorithm::HS256, &json!({"sub": "user-42", "exp": FUTURE_EXP}));

        let err = service("s3cret").verify_subject(&token).unwrap_err();
        assert!(matches!(err, AccessJwtError::BadSignature));
    }

    #[test]
    fn rejects_asymmetric_algorithm_regardless_of_signature() {
        // Hand-rolled token declaring RS256. The payload and signature are
        // irrelevant: the algorithm check must fire first.
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(
            json!({"sub": "user-42", "exp": FUTURE_EXP}).to_string(),
        );
        let token = format!("{header}.{payload}.{}", URL_SAFE_NO_PAD.encode("junk"));

        let err = service("s3cret").verify_subject(&token).unwrap_err();
        assert!(matches!(err, AccessJwtError::BadSignature));
    }

    #[test]
    fn rejects_none_algorithm() {
        // "none" is not a parsable algorithm for this verifier at all, so the
        // header fails structural parsing. Either way: no acceptance path.
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(json!({"sub": "user-42"}).to_string());
        let token = format!("{header}.{payload}.");

        let err = service("s3cret").verify_subject(&token).unwrap_err();
        assert!(matches!(err, AccessJwtError::Malformed(_)));
    }

    #[test]
    fn rejects_tampered_payload() {
        let token = sign("s3cret", Algorithm::HS256, &json!({"sub": "user-42", "exp": FUTURE_EXP}));

        // Swap the payload for one claiming a different subject, keeping the
        // original signature.
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_payload = URL_SAFE_NO_PAD.encode(
            json!({"sub": "user-1", "exp": FUTURE_EXP}).to_string(),
        );
        parts[1] = &forged_payload;
        let forged = parts.join(".");

        let err = service("s3cret").verify_subject(&forged).unwrap_err();
        assert!(matches!(err, AccessJwtError::BadSignature));
    }

    #[test]
    fn rejects_expired_token() {
        let token = sign("s3cret", Algorithm::HS256, &json!({"sub": "user-42", "exp": PAST_EXP}));

        let err = service("s3cret").verify_subject(&token).unwrap_err();
        assert!(matches!(err, AccessJwtError::Expired));
    }

    #[test]
    fn accepts_token_without_exp() {
        // The issuer always sets exp, but a missing claim is not a violation;
        // only a present-and-elapsed one is.
        let token = sign("s3cret", Algorithm::HS256, &json!({"sub": "user-42"}));

        let verified = service("s3cret").verify_subject(&token).unwrap();
        assert_eq!(verified.user_id, "user-42");
    }

    #[test]
    fn rejects_valid_signature_with_missing_subject() {
        let token = sign("s3cret", Algorithm::HS256, &json!({"exp": FUTURE_EXP}));

        let err = service("s3cret").verify_subject(&token).unwrap_err();
        assert!(matches!(err, AccessJwtError::MissingSubject));
    }

    #[test]
    fn rejects_blank_subject() {
        for sub in ["", "   "] {
            let token =
                sign("s3cret", Algorithm::HS256, &json!({"sub": sub, "exp": FUTURE_EXP}));

            let err = service("s3cret").verify_subject(&token).unwrap_err();
            assert!(matches!(err, AccessJwtError::MissingSubject));
        }
    }

    #[test]
    fn rejects_garbage_input() {
        let err = service("s3cret").verify_subject("not-a-jwt").unwrap_err();
        assert!(matches!(err, AccessJwtError::Malformed(_)));
    }

    #[test]
    fn refuses_empty_secret() {
        assert!(AuthService::new("", 0).is_err());
        assert!(AuthService::new("   ", 0).is_err());
    }
}
