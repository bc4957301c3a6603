// src/infrastructure/security/token.rs
use crate::application::{
    dto::IssuedToken,
    error::{ApplicationError, ApplicationResult, AuthRejection},
    ports::{security::TokenCodec, time::Clock},
};
use crate::domain::session::{CLAIMS_VERSION, SubjectId, TokenClaims};
use chrono::{DateTime, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, decode_header, encode,
    errors::ErrorKind,
};
use std::{sync::Arc, time::Duration};
use uuid::Uuid;

const MIN_SECRET_LEN: usize = 16;

/// HS256 JWT codec.
///
/// Expiry is judged against the injected clock rather than the library's
/// wall clock, so `verify` accepts expired tokens and `decode` does not.
#[derive(Clone)]
pub struct JwtTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
    clock: Arc<dyn Clock>,
}

impl JwtTokenCodec {
    pub fn new(secret: &str, ttl: Duration, clock: Arc<dyn Clock>) -> ApplicationResult<Self> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(ApplicationError::infrastructure(format!(
                "signing secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        let ttl_secs = i64::try_from(ttl.as_secs())
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| ApplicationError::infrastructure("token ttl must be a positive number of seconds"))?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
            clock,
        })
    }
}

fn has_compact_shape(token: &str) -> bool {
    let mut parts = token.split('.');
    matches!(
        (parts.next(), parts.next(), parts.next(), parts.next()),
        (Some(header), Some(claims), Some(signature), None)
            if !header.is_empty() && !claims.is_empty() && !signature.is_empty()
    )
}

/// Claims are only parsed once the signature checks out, so any failure
/// before that point (an unreadable header, a bad signature encoding, a MAC
/// mismatch) counts as a signature failure.
fn rejection_for(token: &str, kind: &ErrorKind) -> AuthRejection {
    if decode_header(token).is_err() {
        return AuthRejection::SignatureInvalid;
    }
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::Base64(_) => AuthRejection::SignatureInvalid,
        _ => AuthRejection::Malformed,
    }
}

fn timestamp(secs: i64) -> ApplicationResult<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .ok_or_else(|| ApplicationError::infrastructure("token timestamp out of range"))
}

impl TokenCodec for JwtTokenCodec {
    fn issue(&self, subject: &SubjectId) -> ApplicationResult<IssuedToken> {
        let claims = TokenClaims::new(
            subject.clone(),
            self.clock.unix_now(),
            self.ttl_secs,
            Uuid::new_v4().to_string(),
        );
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        Ok(IssuedToken {
            token,
            issued_at: timestamp(claims.issued_at)?,
            expires_at: timestamp(claims.expires_at)?,
            expires_in: self.ttl_secs,
        })
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, AuthRejection> {
        if !has_compact_shape(token) {
            return Err(AuthRejection::Malformed);
        }

        let claims = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|err| rejection_for(token, err.kind()))?
            .claims;

        if claims.version == 0 || claims.version > CLAIMS_VERSION {
            return Err(AuthRejection::Malformed);
        }
        Ok(claims)
    }

    fn decode(&self, token: &str) -> Result<TokenClaims, AuthRejection> {
        let claims = self.verify(token)?;
        if claims.is_expired_at(self.clock.unix_now()) {
            return Err(AuthRejection::Expired);
        }
        Ok(claims)
    }

    fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicI64, Ordering};

    const SECRET: &str = "unit-test-signing-secret";

    struct ManualClock(AtomicI64);

    impl ManualClock {
        fn set(&self, secs: i64) {
            self.0.store(secs, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            DateTime::<Utc>::from_timestamp(self.0.load(Ordering::SeqCst), 0).unwrap()
        }
    }

    fn codec_at(secs: i64) -> (Arc<ManualClock>, JwtTokenCodec) {
        let clock = Arc::new(ManualClock(AtomicI64::new(secs)));
        let codec = JwtTokenCodec::new(SECRET, Duration::from_secs(3600), clock.clone()).unwrap();
        (clock, codec)
    }

    fn sign_raw(algorithm: Algorithm, claims: &Value) -> String {
        encode(
            &Header::new(algorithm),
            claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn claims_json(version: u16) -> Value {
        json!({"ver": version, "sub": "1", "iat": 1_700_000_000, "exp": 1_700_003_600, "jti": "x"})
    }

    #[test]
    fn decode_returns_issued_subject() {
        let (_clock, codec) = codec_at(1_700_000_000);
        let subject = SubjectId::new("42").unwrap();
        let issued = codec.issue(&subject).unwrap();

        let claims = codec.decode(&issued.token).unwrap();
        assert_eq!(claims.subject, subject);
        assert_eq!(claims.version, CLAIMS_VERSION);
        assert_eq!(claims.expires_at - claims.issued_at, 3600);
        assert_eq!(issued.expires_at.timestamp(), claims.expires_at);
        assert_eq!(issued.expires_in, 3600);
    }

    #[test]
    fn issued_header_is_hs256() {
        let (_clock, codec) = codec_at(1_700_000_000);
        let token = codec.issue(&SubjectId::from(1)).unwrap().token;
        assert_eq!(decode_header(&token).unwrap().alg, Algorithm::HS256);
    }

    #[test]
    fn tokens_for_same_subject_and_second_differ() {
        let (_clock, codec) = codec_at(1_700_000_000);
        let subject = SubjectId::from(7);
        let a = codec.issue(&subject).unwrap().token;
        let b = codec.issue(&subject).unwrap().token;
        assert_ne!(a, b);
    }

    #[test]
    fn expires_exactly_at_ttl() {
        let (clock, codec) = codec_at(0);
        let token = codec.issue(&SubjectId::from(42)).unwrap().token;

        clock.set(3599);
        assert!(codec.decode(&token).is_ok());
        clock.set(3600);
        assert_eq!(codec.decode(&token), Err(AuthRejection::Expired));
        // verify ignores expiry
        assert!(codec.verify(&token).is_ok());
    }

    #[test]
    fn any_tampered_character_breaks_the_signature() {
        let (_clock, codec) = codec_at(1_700_000_000);
        let token = codec.issue(&SubjectId::from(42)).unwrap().token;

        for idx in [0, token.len() / 2, token.len() - 1] {
            let mut bytes = token.clone().into_bytes();
            if bytes[idx] == b'.' {
                continue;
            }
            bytes[idx] = if bytes[idx] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();
            assert_eq!(
                codec.decode(&tampered),
                Err(AuthRejection::SignatureInvalid),
                "tampered at {idx}"
            );
        }
    }

    #[test]
    fn other_secret_is_rejected() {
        let (clock, codec) = codec_at(1_700_000_000);
        let other = JwtTokenCodec::new("another-signing-secret", Duration::from_secs(3600), clock).unwrap();
        let token = other.issue(&SubjectId::from(1)).unwrap().token;
        assert_eq!(codec.decode(&token), Err(AuthRejection::SignatureInvalid));
    }

    #[test]
    fn structural_garbage_is_malformed() {
        let (_clock, codec) = codec_at(1_700_000_000);
        for token in ["", "abc", "a.b", "a..c", "a.b.c.d"] {
            assert_eq!(codec.verify(token), Err(AuthRejection::Malformed), "{token:?}");
        }
    }

    #[test]
    fn signed_but_unparsable_claims_are_malformed() {
        let (_clock, codec) = codec_at(1_700_000_000);
        let token = sign_raw(Algorithm::HS256, &json!({"exp": 1_700_003_600, "hello": "world"}));
        assert_eq!(codec.verify(&token), Err(AuthRejection::Malformed));
    }

    #[test]
    fn foreign_algorithm_header_is_malformed() {
        let (_clock, codec) = codec_at(1_700_000_000);
        let token = sign_raw(Algorithm::HS384, &claims_json(1));
        assert_eq!(codec.verify(&token), Err(AuthRejection::Malformed));
    }

    #[test]
    fn newer_claim_versions_are_refused_but_extra_claims_are_ignored() {
        let (_clock, codec) = codec_at(1_700_000_000);
        assert_eq!(
            codec.verify(&sign_raw(Algorithm::HS256, &claims_json(2))),
            Err(AuthRejection::Malformed)
        );

        let mut extended = claims_json(1);
        extended["scope"] = json!("all");
        let claims = codec.verify(&sign_raw(Algorithm::HS256, &extended)).unwrap();
        assert_eq!(claims.subject.as_str(), "1");
    }

    #[test]
    fn rejects_short_secret_and_zero_ttl() {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock(AtomicI64::new(0)));
        assert!(JwtTokenCodec::new("short", Duration::from_secs(60), clock.clone()).is_err());
        assert!(JwtTokenCodec::new(SECRET, Duration::ZERO, clock).is_err());
    }
}
