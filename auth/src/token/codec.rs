use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::claims::TokenPayload;
use super::errors::TokenError;

/// A freshly signed token: the wire string plus the claims it encodes.
#[derive(Debug, Clone)]
pub struct SignedToken {
    pub encoded: String,
    pub claims: Claims,
}

/// Signs and verifies kind-tagged tokens.
///
/// Uses HS256 (HMAC with SHA-256) over a process-wide secret. The codec is
/// kind-agnostic: it guarantees integrity and expiry, while interpreting
/// the kind is the caller's job.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    leeway_seconds: u64,
}

impl TokenCodec {
    /// Create a new token codec with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Returns
    /// TokenCodec configured with HS256 and no expiry leeway
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    /// - Rotate secrets periodically
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            leeway_seconds: 0,
        }
    }

    /// Set the clock-skew grace window applied to expiry checks.
    ///
    /// Signature verification is never relaxed.
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    /// Sign a payload into an encoded token.
    ///
    /// Stamps `iat = now` and `exp = now + ttl` before signing, so the
    /// signature covers the kind, the payload and both timestamps.
    ///
    /// # Arguments
    /// * `payload` - Kind-tagged payload to embed
    /// * `ttl` - Lifetime of the token
    ///
    /// # Returns
    /// The encoded token string together with the claims it carries
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn sign(&self, payload: TokenPayload, ttl: Duration) -> Result<SignedToken, TokenError> {
        let claims = Claims::new(payload, ttl);
        let header = Header::new(self.algorithm);

        let encoded = encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))?;

        Ok(SignedToken { encoded, claims })
    }

    /// Decode and validate an encoded token.
    ///
    /// The signature is checked before any claim is inspected; a tampered
    /// token is rejected without leaking whether its contents parse.
    ///
    /// # Arguments
    /// * `encoded` - Encoded token string to verify
    ///
    /// # Returns
    /// The decoded claims
    ///
    /// # Errors
    /// * `InvalidSignature` - Signature does not match the token contents
    /// * `Expired` - Token is past its expiry (beyond the leeway window)
    /// * `Malformed` - Token structure or claims cannot be decoded
    pub fn verify(&self, encoded: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = self.leeway_seconds;

        let token_data =
            decode::<Claims>(encoded, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Malformed(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::super::claims::InvitePayload;
    use super::super::claims::MailIdentityPayload;
    use super::super::claims::RefreshPayload;
    use super::super::claims::TokenIdentity;
    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    fn sample_payloads() -> Vec<TokenPayload> {
        vec![
            TokenPayload::Access {
                identity: TokenIdentity {
                    id: 42,
                    user_name: "alice".to_string(),
                    group_id: 1,
                },
            },
            TokenPayload::Refresh(RefreshPayload {
                user_id: 42,
                session_id: Uuid::new_v4(),
            }),
            TokenPayload::EmailVerify(MailIdentityPayload {
                user_id: 42,
                user_name: "alice".to_string(),
            }),
            TokenPayload::PasswordReset(MailIdentityPayload {
                user_id: 42,
                user_name: "alice".to_string(),
            }),
            TokenPayload::Invite(InvitePayload {
                puzzle_id: 9,
                mail_id: 3,
            }),
        ]
    }

    /// Reassemble a token from one token's header+payload and another's
    /// signature segment.
    fn splice(body_from: &str, signature_from: &str) -> String {
        let body = body_from.rsplit_once('.').unwrap().0;
        let signature = signature_from.rsplit_once('.').unwrap().1;
        format!("{}.{}", body, signature)
    }

    #[test]
    fn test_sign_and_verify_round_trip_every_kind() {
        let codec = TokenCodec::new(SECRET);

        for payload in sample_payloads() {
            let token = codec
                .sign(payload.clone(), Duration::minutes(5))
                .expect("Failed to sign token");

            let claims = codec.verify(&token.encoded).expect("Failed to verify token");
            assert_eq!(claims, token.claims);
            assert_eq!(claims.payload, payload);
        }
    }

    #[test]
    fn test_verify_expired_token() {
        let codec = TokenCodec::new(SECRET);

        let token = codec
            .sign(sample_payloads().remove(0), Duration::seconds(-60))
            .expect("Failed to sign token");

        assert_eq!(codec.verify(&token.encoded), Err(TokenError::Expired));
    }

    #[test]
    fn test_leeway_applies_to_expiry_only() {
        let strict = TokenCodec::new(SECRET);
        let lenient = TokenCodec::new(SECRET).with_leeway(120);

        let expired = strict
            .sign(sample_payloads().remove(0), Duration::seconds(-60))
            .expect("Failed to sign token");

        assert_eq!(strict.verify(&expired.encoded), Err(TokenError::Expired));
        assert!(lenient.verify(&expired.encoded).is_ok());

        // A tampered token stays rejected no matter the leeway.
        let other = TokenCodec::new(b"another_secret_32_bytes_long_key!!!")
            .sign(sample_payloads().remove(0), Duration::minutes(5))
            .expect("Failed to sign token");
        let forged = splice(&expired.encoded, &other.encoded);
        assert_eq!(
            lenient.verify(&forged),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let codec = TokenCodec::new(SECRET);
        let other = TokenCodec::new(b"another_secret_32_bytes_long_key!!!");

        let token = codec
            .sign(sample_payloads().remove(0), Duration::minutes(5))
            .expect("Failed to sign token");

        assert_eq!(
            other.verify(&token.encoded),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_verify_rejects_tampered_payload() {
        let codec = TokenCodec::new(SECRET);
        let mut payloads = sample_payloads().into_iter();

        let first = codec
            .sign(payloads.next().unwrap(), Duration::minutes(5))
            .expect("Failed to sign token");
        let second = codec
            .sign(payloads.next().unwrap(), Duration::minutes(5))
            .expect("Failed to sign token");

        // Contents of one token with the signature of another.
        let forged = splice(&first.encoded, &second.encoded);
        assert_eq!(codec.verify(&forged), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_verify_rejects_malformed_strings() {
        let codec = TokenCodec::new(SECRET);

        for garbage in ["", "garbage", "not.a.token", "a.b.c.d"] {
            assert!(matches!(
                codec.verify(garbage),
                Err(TokenError::Malformed(_))
            ));
        }
    }

    #[test]
    fn test_signature_check_precedes_expiry_check() {
        let codec = TokenCodec::new(SECRET);
        let other = TokenCodec::new(b"another_secret_32_bytes_long_key!!!");

        let expired = other
            .sign(sample_payloads().remove(0), Duration::seconds(-60))
            .expect("Failed to sign token");

        // Expired AND foreign-signed: the signature failure wins.
        assert_eq!(
            codec.verify(&expired.encoded),
            Err(TokenError::InvalidSignature)
        );
    }
}
