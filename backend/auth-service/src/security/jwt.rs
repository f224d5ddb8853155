/// JWT token issuance and validation using HS512 (HMAC with SHA-512).
///
/// Tokens are fully self-contained: the payload embeds the caller's
/// [`Identity`] under the `user` claim next to the standard `sub`/`iat`/`exp`
/// claims, so no server-side session state exists. The signing secret is
/// loaded once at startup and immutable thereafter.
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::models::Identity;

/// Token validity window, in seconds (5 hours).
pub const TOKEN_VALIDITY_SECS: i64 = 5 * 60 * 60;

const JWT_ALGORITHM: Algorithm = Algorithm::HS512;

/// JWT claims structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the identity's username.
    pub sub: String,
    /// Issued at (Unix timestamp, seconds).
    pub iat: i64,
    /// Expiration time (Unix timestamp, seconds); `iat + TOKEN_VALIDITY_SECS`.
    pub exp: i64,
    /// The embedded identity this token was issued for.
    pub user: Identity,
}

/// Thread-safe storage for the HMAC keys derived from the shared secret.
///
/// Initialized once at startup; the first successful call wins and the
/// secret is immutable for the life of the process.
static JWT_KEYS: OnceCell<(EncodingKey, DecodingKey)> = OnceCell::new();

/// Install the shared signing secret.
///
/// Must be called during application startup before any token operation.
/// An empty secret is rejected: refusing to start beats silently minting
/// unverifiable tokens.
pub fn initialize_secret(secret: &str) -> Result<(), AuthError> {
    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let keys = (
        EncodingKey::from_secret(secret.as_bytes()),
        DecodingKey::from_secret(secret.as_bytes()),
    );
    let _ = JWT_KEYS.set(keys);

    Ok(())
}

fn keys() -> Result<&'static (EncodingKey, DecodingKey), AuthError> {
    JWT_KEYS.get().ok_or(AuthError::MissingSecret)
}

/// Issue a signed token for the given identity.
pub fn issue(identity: &Identity) -> Result<String, AuthError> {
    let (encoding_key, _) = keys()?;
    let now = Utc::now().timestamp();

    let claims = Claims {
        sub: identity.username.clone(),
        iat: now,
        exp: now + TOKEN_VALIDITY_SECS,
        user: identity.clone(),
    };

    Ok(encode(&Header::new(JWT_ALGORITHM), &claims, encoding_key)?)
}

/// Verify a token's signature, structure, and expiry, returning its claims.
///
/// An expired token fails here, not only in [`validate`]: callers holding a
/// parsed `Claims` are guaranteed the token was live at parse time.
pub fn parse(token: &str) -> Result<Claims, AuthError> {
    let (_, decoding_key) = keys()?;

    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.leeway = 0;

    let data = decode::<Claims>(token, decoding_key, &validation)?;
    Ok(data.claims)
}

/// Deserialize the identity embedded in the `user` claim.
pub fn extract_identity(token: &str) -> Result<Identity, AuthError> {
    Ok(parse(token)?.user)
}

/// Projection of the `sub` claim.
pub fn extract_username(token: &str) -> Result<String, AuthError> {
    Ok(parse(token)?.sub)
}

/// Projection of the `exp` claim (Unix timestamp, seconds).
pub fn extract_expiration(token: &str) -> Result<i64, AuthError> {
    Ok(parse(token)?.exp)
}

/// Check parsed claims against an identity.
///
/// Operates on already-parsed claims so the signature is never verified a
/// second time. The username is the sole consistency field.
pub fn check(claims: &Claims, identity: &Identity) -> Result<(), AuthError> {
    if claims.sub != identity.username {
        return Err(AuthError::IdentityMismatch);
    }
    if Utc::now().timestamp() >= claims.exp {
        return Err(AuthError::Expired);
    }
    Ok(())
}

/// True iff the claims name the identity's username and have not expired.
pub fn validate(claims: &Claims, identity: &Identity) -> bool {
    check(claims, identity).is_ok()
}

#[cfg(test)]
pub(crate) const TEST_SECRET: &str = "unit-test-signing-secret";

#[cfg(test)]
pub(crate) fn init_test_secret() {
    let _ = initialize_secret(TEST_SECRET);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_identity() -> Identity {
        Identity {
            username: "alice".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Doe".to_string(),
            mobile_no: "+15550100".to_string(),
            email: "alice@example.com".to_string(),
            role_id: 3,
            time_zone_difference: -300,
            org_code: "ORG-7".to_string(),
            authorities: vec!["ADMIN".to_string()],
        }
    }

    fn encode_raw(claims: &Claims) -> String {
        encode(
            &Header::new(JWT_ALGORITHM),
            claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        assert_eq!(initialize_secret(""), Err(AuthError::MissingSecret));
    }

    #[test]
    fn test_issued_token_has_three_segments() {
        init_test_secret();
        let token = issue(&sample_identity()).unwrap();

        assert_eq!(token.matches('.').count(), 2);
    }

    #[test]
    fn test_identity_round_trips_through_token() {
        init_test_secret();
        let identity = sample_identity();

        let token = issue(&identity).unwrap();
        let extracted = extract_identity(&token).unwrap();

        assert_eq!(extracted, identity);
    }

    #[test]
    fn test_username_and_expiration_projections() {
        init_test_secret();
        let identity = sample_identity();

        let token = issue(&identity).unwrap();
        let claims = parse(&token).unwrap();

        assert_eq!(extract_username(&token).unwrap(), "alice");
        assert_eq!(extract_expiration(&token).unwrap(), claims.exp);
        assert_eq!(claims.exp, claims.iat + TOKEN_VALIDITY_SECS);
    }

    #[test]
    fn test_fresh_token_validates() {
        init_test_secret();
        let identity = sample_identity();

        let token = issue(&identity).unwrap();
        let claims = parse(&token).unwrap();

        assert!(validate(&claims, &identity));
    }

    #[test]
    fn test_expired_claims_do_not_validate() {
        init_test_secret();
        let identity = sample_identity();
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: identity.username.clone(),
            iat: now - TOKEN_VALIDITY_SECS - 10,
            exp: now - 10,
            user: identity.clone(),
        };

        assert!(!validate(&claims, &identity));
        assert_eq!(check(&claims, &identity), Err(AuthError::Expired));
    }

    #[test]
    fn test_expired_token_fails_to_parse() {
        init_test_secret();
        let identity = sample_identity();
        let now = Utc::now().timestamp();

        let token = encode_raw(&Claims {
            sub: identity.username.clone(),
            iat: now - TOKEN_VALIDITY_SECS - 10,
            exp: now - 10,
            user: identity,
        });

        assert_eq!(parse(&token), Err(AuthError::Expired));
    }

    #[test]
    fn test_subject_mismatch_is_detected() {
        init_test_secret();
        let identity = sample_identity();
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: "mallory".to_string(),
            iat: now,
            exp: now + TOKEN_VALIDITY_SECS,
            user: identity.clone(),
        };

        assert_eq!(check(&claims, &identity), Err(AuthError::IdentityMismatch));
        assert!(!validate(&claims, &identity));
    }

    #[test]
    fn test_tampered_signature_fails_to_parse() {
        init_test_secret();
        let token = issue(&sample_identity()).unwrap();

        let (body, signature) = token.rsplit_once('.').unwrap();
        let flipped = if signature.starts_with('A') { "B" } else { "A" };
        let tampered = format!("{}.{}{}", body, flipped, &signature[1..]);

        assert_eq!(parse(&tampered), Err(AuthError::SignatureInvalid));
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        init_test_secret();

        assert_eq!(parse("not-a-token"), Err(AuthError::MalformedToken));
        assert_eq!(parse("a.b.c"), Err(AuthError::MalformedToken));
    }
}
