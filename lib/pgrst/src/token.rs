//! Bearer token signing and caching.
//!
//! PostgREST authenticates requests with a JWT carrying a `role` claim. A
//! [`TokenCache`] signs such a token with a [`TokenSigner`] and hands the
//! same token out until its renewal watermark, set at 80% of the token
//! lifetime, has passed.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Share of the token lifetime after which the token is signed again, in
/// tenths.
const RENEWAL_TENTHS: u64 = 8;

/// Claims of a PostgREST bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Database role PostgREST switches to for the request.
    pub role: String,
    /// Issued at, epoch seconds.
    pub iat: u64,
    /// Not before, epoch seconds.
    pub nbf: u64,
    /// Expiry, epoch seconds.
    pub exp: u64,
}

impl Claims {
    /// Claims for `role`, valid from `now` for `lifetime`.
    #[must_use]
    pub fn new(role: impl Into<String>, now: u64, lifetime: Duration) -> Self {
        Self {
            role: role.into(),
            iat: now,
            nbf: now,
            exp: now.saturating_add(lifetime.as_secs()),
        }
    }
}

/// Produces compact signed tokens from claims.
///
/// [`SigningKey`] is the JWT implementation; other implementations let
/// tests observe how often a token is actually signed.
pub trait TokenSigner: Send + Sync {
    /// Sign the claims into a compact token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Signing`] if the token cannot be produced.
    fn sign(&self, claims: &Claims) -> Result<String>;
}

// ============================================================================
// Signing Key
// ============================================================================

/// A private key able to sign JWTs.
///
/// Only signing-capable material is accepted: an empty HMAC secret or a
/// public-key PEM is rejected when the key is built.
#[derive(Clone)]
pub struct SigningKey {
    algorithm: Algorithm,
    key: EncodingKey,
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

impl SigningKey {
    /// HS256 key from a shared secret (PostgREST's `jwt-secret`).
    pub fn hmac(secret: impl AsRef<[u8]>) -> Result<Self> {
        Self::hmac_with(Algorithm::HS256, secret)
    }

    /// HMAC key with an explicit `HS256`/`HS384`/`HS512` algorithm.
    pub fn hmac_with(algorithm: Algorithm, secret: impl AsRef<[u8]>) -> Result<Self> {
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(Error::signing(format!(
                "{algorithm:?} is not an HMAC algorithm"
            )));
        }

        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(Error::signing("empty HMAC secret"));
        }

        Ok(Self {
            algorithm,
            key: EncodingKey::from_secret(secret),
        })
    }

    /// Asymmetric key from a PEM-encoded private key.
    ///
    /// The PEM must match the algorithm family: RSA for `RS*`/`PS*`, EC for
    /// `ES*`, Ed25519 for `EdDSA`.
    pub fn from_pem(algorithm: Algorithm, pem: impl AsRef<[u8]>) -> Result<Self> {
        let pem = pem.as_ref();
        if is_public_pem(pem) {
            return Err(Error::signing("a public key cannot sign tokens"));
        }

        let key = match algorithm {
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => EncodingKey::from_rsa_pem(pem),
            Algorithm::ES256 | Algorithm::ES384 => EncodingKey::from_ec_pem(pem),
            Algorithm::EdDSA => EncodingKey::from_ed_pem(pem),
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                return Err(Error::signing(format!(
                    "{algorithm:?} takes a shared secret, not a PEM key"
                )));
            }
        }
        .map_err(|e| Error::signing(e.to_string()))?;

        Ok(Self { algorithm, key })
    }

    /// Algorithm written in the token header.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

fn is_public_pem(pem: &[u8]) -> bool {
    String::from_utf8_lossy(pem)
        .lines()
        .any(|line| line.starts_with("-----BEGIN") && line.contains("PUBLIC KEY"))
}

impl TokenSigner for SigningKey {
    fn sign(&self, claims: &Claims) -> Result<String> {
        jsonwebtoken::encode(&Header::new(self.algorithm), claims, &self.key)
            .map_err(|e| Error::signing(e.to_string()))
    }
}

// ============================================================================
// Token Cache
// ============================================================================

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    role: String,
    lifetime: Duration,
    renew_at: u64,
    expires_at: u64,
}

/// Caches the last signed token until its renewal watermark.
///
/// A cached token is reused only for the same role and lifetime, and only
/// while the current time is before `iat + 0.8 * lifetime`.
///
/// The cache itself is not synchronised; share it through
/// [`SharedTokenCache`].
pub struct TokenCache {
    signer: Arc<dyn TokenSigner>,
    cached: Option<CachedToken>,
}

impl fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCache")
            .field("renew_at", &self.cached.as_ref().map(|c| c.renew_at))
            .field("expires_at", &self.cached.as_ref().map(|c| c.expires_at))
            .finish_non_exhaustive()
    }
}

impl TokenCache {
    /// Create an empty cache around a signer.
    #[must_use]
    pub fn new(signer: Arc<dyn TokenSigner>) -> Self {
        Self {
            signer,
            cached: None,
        }
    }

    /// Token for `role`, signed now if the cached one is stale.
    pub fn token(&mut self, role: &str, lifetime: Duration) -> Result<String> {
        self.token_at(role, lifetime, jsonwebtoken::get_current_timestamp())
    }

    /// Token for `role` as seen at `now` (epoch seconds).
    pub fn token_at(&mut self, role: &str, lifetime: Duration, now: u64) -> Result<String> {
        if let Some(cached) = &self.cached
            && now < cached.renew_at
            && cached.role == role
            && cached.lifetime == lifetime
        {
            return Ok(cached.token.clone());
        }

        let claims = Claims::new(role, now, lifetime);
        let token = self.signer.sign(&claims)?;
        let renew_at = now.saturating_add(lifetime.as_secs().saturating_mul(RENEWAL_TENTHS) / 10);
        debug!(role, exp = claims.exp, renew_at, "signed new bearer token");

        self.cached = Some(CachedToken {
            token: token.clone(),
            role: role.to_string(),
            lifetime,
            renew_at,
            expires_at: claims.exp,
        });
        Ok(token)
    }

    /// Drop the cached token; the next call signs a fresh one.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Epoch second after which the cached token is signed again.
    #[must_use]
    pub fn renew_at(&self) -> Option<u64> {
        self.cached.as_ref().map(|cached| cached.renew_at)
    }
}

/// A [`TokenCache`] shared between a session and every builder derived
/// from it.
///
/// The lock is held while signing, never across an `.await`.
#[derive(Debug, Clone)]
pub struct SharedTokenCache {
    inner: Arc<Mutex<TokenCache>>,
}

impl SharedTokenCache {
    /// Share a cache around a signer.
    #[must_use]
    pub fn new(signer: Arc<dyn TokenSigner>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TokenCache::new(signer))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TokenCache> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// See [`TokenCache::token`].
    pub fn token(&self, role: &str, lifetime: Duration) -> Result<String> {
        self.lock().token(role, lifetime)
    }

    /// See [`TokenCache::token_at`].
    pub fn token_at(&self, role: &str, lifetime: Duration, now: u64) -> Result<String> {
        self.lock().token_at(role, lifetime, now)
    }

    /// See [`TokenCache::invalidate`].
    pub fn invalidate(&self) {
        self.lock().invalidate();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert2::{check, let_assert};
    use jsonwebtoken::{DecodingKey, Validation};

    use super::*;

    const SECRET: &str = "reallyreallyreallyreallyverysafe";
    const LIFETIME: Duration = Duration::from_secs(100);

    /// Records every claim set it is asked to sign.
    #[derive(Default)]
    struct RecordingSigner {
        signed: Mutex<Vec<Claims>>,
        calls: AtomicUsize,
    }

    impl TokenSigner for RecordingSigner {
        fn sign(&self, claims: &Claims) -> Result<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            self.signed
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(claims.clone());
            Ok(format!("token-{call}"))
        }
    }

    fn recording_cache() -> (Arc<RecordingSigner>, TokenCache) {
        let signer = Arc::new(RecordingSigner::default());
        let cache = TokenCache::new(signer.clone());
        (signer, cache)
    }

    #[test]
    fn reuses_token_before_watermark() {
        let (signer, mut cache) = recording_cache();

        let first = cache.token_at("web_anon", LIFETIME, 1_000).expect("token");
        let second = cache.token_at("web_anon", LIFETIME, 1_079).expect("token");

        check!(first == second);
        check!(signer.calls.load(Ordering::SeqCst) == 1);
        check!(cache.renew_at() == Some(1_080));
    }

    #[test]
    fn signs_again_after_watermark_with_later_expiry() {
        let (signer, mut cache) = recording_cache();

        let first = cache.token_at("web_anon", LIFETIME, 1_000).expect("token");
        let second = cache.token_at("web_anon", LIFETIME, 1_080).expect("token");

        check!(first != second);
        let signed = signer.signed.lock().unwrap_or_else(PoisonError::into_inner);
        let_assert!([early, late] = signed.as_slice());
        check!(early.exp == 1_100);
        check!(late.exp == 1_180);
        check!(late.exp > early.exp);
    }

    #[test]
    fn unbounded_lifetime_saturates() {
        let (signer, mut cache) = recording_cache();

        let first = cache.token_at("web_anon", Duration::MAX, 1_000).expect("token");
        let second = cache.token_at("web_anon", Duration::MAX, 2_000).expect("token");

        check!(first == second);
        check!(signer.calls.load(Ordering::SeqCst) == 1);
        check!(cache.renew_at() == Some(1_000 + u64::MAX / 10));

        let signed = signer.signed.lock().unwrap_or_else(PoisonError::into_inner);
        let_assert!([claims] = signed.as_slice());
        check!(claims.exp == u64::MAX);
    }

    #[test]
    fn role_change_forces_new_token() {
        let (signer, mut cache) = recording_cache();

        cache.token_at("web_anon", LIFETIME, 1_000).expect("token");
        cache.token_at("todo_user", LIFETIME, 1_001).expect("token");
        cache.token_at("todo_user", LIFETIME, 1_002).expect("token");

        check!(signer.calls.load(Ordering::SeqCst) == 2);
        let signed = signer.signed.lock().unwrap_or_else(PoisonError::into_inner);
        let_assert!(Some(last) = signed.last());
        check!(last.role == "todo_user");
    }

    #[test]
    fn invalidate_forces_new_token() {
        let (signer, mut cache) = recording_cache();

        cache.token_at("web_anon", LIFETIME, 1_000).expect("token");
        cache.invalidate();
        check!(cache.renew_at().is_none());
        cache.token_at("web_anon", LIFETIME, 1_001).expect("token");

        check!(signer.calls.load(Ordering::SeqCst) == 2);
    }

    #[test]
    fn claims_carry_time_window() {
        let claims = Claims::new("web_anon", 500, Duration::from_secs(60));

        check!(claims.iat == 500);
        check!(claims.nbf == 500);
        check!(claims.exp == 560);
    }

    #[test]
    fn hmac_token_verifies_with_secret() {
        let key = SigningKey::hmac(SECRET).expect("key");
        let now = jsonwebtoken::get_current_timestamp();
        let token = key
            .sign(&Claims::new("web_anon", now, LIFETIME))
            .expect("signed");

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "nbf"]);
        let decoded = jsonwebtoken::decode::<Claims>(
            &token,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &validation,
        )
        .expect("valid token");

        check!(decoded.claims.role == "web_anon");
        check!(decoded.claims.exp == now + 100);
    }

    #[test]
    fn empty_secret_is_rejected() {
        let_assert!(Err(Error::Signing(message)) = SigningKey::hmac(""));
        check!(message.contains("empty"));
    }

    #[test]
    fn hmac_requires_hmac_algorithm() {
        let_assert!(Err(Error::Signing(_)) = SigningKey::hmac_with(Algorithm::RS256, SECRET));
    }

    #[test]
    fn public_pem_is_not_signing_capable() {
        let pem = "-----BEGIN PUBLIC KEY-----\nMCowBQYDK2VwAyEA\n-----END PUBLIC KEY-----\n";
        let_assert!(Err(Error::Signing(message)) = SigningKey::from_pem(Algorithm::EdDSA, pem));
        check!(message.contains("public key"));
    }

    #[test]
    fn malformed_pem_is_rejected() {
        let_assert!(
            Err(Error::Signing(_)) = SigningKey::from_pem(Algorithm::RS256, "not a pem")
        );
        let_assert!(
            Err(Error::Signing(_)) = SigningKey::from_pem(Algorithm::HS256, "not a pem")
        );
    }

    #[test]
    fn signing_failure_leaves_cache_empty() {
        struct FailingSigner;
        impl TokenSigner for FailingSigner {
            fn sign(&self, _claims: &Claims) -> Result<String> {
                Err(Error::signing("hardware token unplugged"))
            }
        }

        let mut cache = TokenCache::new(Arc::new(FailingSigner));
        let_assert!(Err(Error::Signing(_)) = cache.token_at("web_anon", LIFETIME, 1));
        check!(cache.renew_at().is_none());
    }

    #[test]
    fn shared_cache_is_shared_between_clones() {
        let signer = Arc::new(RecordingSigner::default());
        let shared = SharedTokenCache::new(signer.clone());
        let clone = shared.clone();

        let first = shared.token_at("web_anon", LIFETIME, 10).expect("token");
        let second = clone.token_at("web_anon", LIFETIME, 11).expect("token");

        check!(first == second);
        check!(signer.calls.load(Ordering::SeqCst) == 1);

        clone.invalidate();
        shared.token_at("web_anon", LIFETIME, 12).expect("token");
        check!(signer.calls.load(Ordering::SeqCst) == 2);
    }
}
