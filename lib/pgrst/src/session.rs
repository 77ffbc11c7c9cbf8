//! Session template.
//!
//! A [`Session`] holds the long-lived settings of a PostgREST connection:
//! base address, default role, signing key, token lifetime and the
//! transport. Every query starts from a session through one of the verb
//! shortcuts ([`select`](Session::select), [`insert`](Session::insert),
//! ...), which hand out an independent [`Db`] builder.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::{
    ClientConfigBuilder, Db, Error, HttpClient, HyperClient, Result, SharedTokenCache,
    SigningKey, TokenSigner, Verb,
};

/// Lifetime of signed tokens when none is configured.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(5 * 60);

/// Long-lived PostgREST connection settings.
///
/// Cloning a session is cheap; clones share the transport and the token
/// cache.
///
/// # Example
///
/// ```ignore
/// use pgrst::Session;
/// use std::time::Duration;
///
/// let session = Session::new(
///     "http://localhost:3000",
///     "web_anon",
///     "reallyreallyreallyreallyverysafe",
///     Duration::from_secs(300),
/// )?;
/// ```
pub struct Session<C = HyperClient> {
    client: C,
    base_url: Url,
    role: String,
    lifetime: Duration,
    tokens: SharedTokenCache,
    headers: BTreeMap<String, String>,
}

impl<C: Clone> Clone for Session<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            role: self.role.clone(),
            lifetime: self.lifetime,
            tokens: self.tokens.clone(),
            headers: self.headers.clone(),
        }
    }
}

impl<C> fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url.as_str())
            .field("role", &self.role)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl Session<HyperClient> {
    /// Session signing HS256 tokens with a shared secret over the default
    /// transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is not a valid URL or the secret is
    /// empty.
    pub fn new(
        address: impl AsRef<str>,
        role: impl Into<String>,
        secret: impl AsRef<[u8]>,
        lifetime: Duration,
    ) -> Result<Self> {
        Self::builder()
            .url(address.as_ref())
            .role(role)
            .signing_key(SigningKey::hmac(secret)?)
            .token_lifetime(lifetime)
            .build()
    }

    /// Create a session builder.
    #[must_use]
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }
}

impl<C> Session<C> {
    /// Base address of the API.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Role of the tokens signed for this session.
    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Lifetime of the tokens signed for this session.
    #[must_use]
    pub const fn token_lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Token cache shared by every builder of this session.
    #[must_use]
    pub const fn tokens(&self) -> &SharedTokenCache {
        &self.tokens
    }

    /// Headers sent with every request.
    #[must_use]
    pub const fn default_headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Transport used by this session.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }
}

impl<C: HttpClient + Clone> Session<C> {
    /// Builder with no verb selected yet.
    #[must_use]
    pub fn db<'a>(&self) -> Db<'a, C> {
        Db::new(self.clone())
    }

    /// Start a read (`GET`).
    #[must_use]
    pub fn select<'a>(&self) -> Db<'a, C> {
        self.db().with_verb(Verb::Select)
    }

    /// Start an insert (`POST`).
    #[must_use]
    pub fn insert<'a>(&self) -> Db<'a, C> {
        self.db().with_verb(Verb::Insert)
    }

    /// Start an upsert (`POST` merging duplicates).
    #[must_use]
    pub fn upsert<'a>(&self) -> Db<'a, C> {
        self.db().with_verb(Verb::Upsert)
    }

    /// Start an update (`PATCH`).
    #[must_use]
    pub fn update<'a>(&self) -> Db<'a, C> {
        self.db().with_verb(Verb::Update)
    }

    /// Start a delete (`DELETE`).
    #[must_use]
    pub fn delete<'a>(&self) -> Db<'a, C> {
        self.db().with_verb(Verb::Delete)
    }
}

/// Builder for [`Session`].
///
/// # Example
///
/// ```ignore
/// use pgrst::{Session, SigningKey};
/// use std::time::Duration;
///
/// let session = Session::builder()
///     .url("http://localhost:3000")
///     .role("todo_user")
///     .signing_key(SigningKey::hmac("reallyreallyreallyreallyverysafe")?)
///     .token_lifetime(Duration::from_secs(60))
///     .header("Accept-Profile", "api")
///     .build()?;
/// ```
#[derive(Default)]
pub struct SessionBuilder {
    url: Option<String>,
    role: Option<String>,
    signer: Option<Arc<dyn TokenSigner>>,
    lifetime: Option<Duration>,
    headers: BTreeMap<String, String>,
    client_config: ClientConfigBuilder,
}

impl fmt::Debug for SessionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionBuilder")
            .field("url", &self.url)
            .field("role", &self.role)
            .field("has_signer", &self.signer.is_some())
            .field("lifetime", &self.lifetime)
            .field("headers", &self.headers)
            .field("client_config", &self.client_config)
            .finish()
    }
}

impl SessionBuilder {
    /// Set the base address of the API.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the default role.
    #[must_use]
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Sign tokens with this key.
    #[must_use]
    pub fn signing_key(self, key: SigningKey) -> Self {
        self.signer(Arc::new(key))
    }

    /// Sign tokens with a custom signer.
    #[must_use]
    pub fn signer(mut self, signer: Arc<dyn TokenSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Set the token lifetime (default five minutes).
    #[must_use]
    pub const fn token_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = Some(lifetime);
        self
    }

    /// Add a header sent with every request.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|key, _| !key.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
        self
    }

    /// Configure the default transport.
    #[must_use]
    pub fn client_config(mut self, config: ClientConfigBuilder) -> Self {
        self.client_config = config;
        self
    }

    /// Set the `User-Agent` of the default transport.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.client_config = self.client_config.user_agent(user_agent);
        self
    }

    /// Build a session over the default [`HyperClient`].
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is missing or invalid, or if no signing
    /// key was set.
    pub fn build(self) -> Result<Session<HyperClient>> {
        let client = HyperClient::builder().config(self.client_config.clone()).build();
        self.build_with(client)
    }

    /// Build a session over any transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is missing or invalid, or if no signing
    /// key was set.
    pub fn build_with<C: HttpClient>(self, client: C) -> Result<Session<C>> {
        let base_url = Url::parse(self.url.as_deref().unwrap_or_default())?;
        let signer = self
            .signer
            .ok_or_else(|| Error::signing("no signing key configured"))?;

        Ok(Session {
            client,
            base_url,
            role: self.role.unwrap_or_default(),
            lifetime: self.lifetime.unwrap_or(DEFAULT_TOKEN_LIFETIME),
            tokens: SharedTokenCache::new(signer),
            headers: self.headers,
        })
    }
}
