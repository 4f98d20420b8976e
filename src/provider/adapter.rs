//! Lazily initialized OIDC provider adapter.
//!
//! [`OidcProvider`] starts [`ProviderState::Uninitialized`] and moves to
//! [`ProviderState::Ready`] exactly once, when [`OidcProvider::init`] finds complete
//! credentials and discovery succeeds. Until then every operation fails fast with
//! [`Error::NotReady`] without touching the network. The ready client is written once under
//! a lock and handed out as an `Arc`, so no reader ever holds the lock across an `.await`.

// self
use crate::{
	_prelude::*,
	auth::{ProviderId, TokenResult, UserIdentity},
	config::ProviderConfig,
	http::OidcHttpClient,
	oidc::OidcClient,
	provider::{OAuthProvider, ProviderFuture, ProviderRegistration},
	url_helper::UrlHelper,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Adapter specialized for the crate's default reqwest transport.
pub type ReqwestOidcProvider = OidcProvider<ReqwestHttpClient>;

/// Initialization state of an [`OidcProvider`].
pub enum ProviderState<C>
where
	C: OidcHttpClient,
{
	/// Discovery has not completed (or the provider is not configured).
	Uninitialized,
	/// Discovery succeeded; the client is immutable from here on.
	Ready(Arc<OidcClient<C>>),
}
impl<C> ProviderState<C>
where
	C: OidcHttpClient,
{
	/// Label-only view of the state.
	pub fn status(&self) -> ProviderStatus {
		match self {
			ProviderState::Uninitialized => ProviderStatus::Uninitialized,
			ProviderState::Ready(_) => ProviderStatus::Ready,
		}
	}
}

/// Label-only view of [`ProviderState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderStatus {
	/// Not usable; operations fail with [`Error::NotReady`].
	Uninitialized,
	/// Discovery succeeded.
	Ready,
}

/// OIDC provider adapter wiring configuration, discovery, and the readiness hook together.
pub struct OidcProvider<C>
where
	C: OidcHttpClient,
{
	name: ProviderId,
	config: ProviderConfig,
	url_helper: Arc<dyn UrlHelper>,
	http_client: Arc<C>,
	state: RwLock<ProviderState<C>>,
	init_guard: AsyncMutex<()>,
}
impl<C> OidcProvider<C>
where
	C: OidcHttpClient,
{
	/// Creates an uninitialized adapter that will use the caller-provided transport.
	pub fn with_http_client(
		name: ProviderId,
		config: ProviderConfig,
		url_helper: Arc<dyn UrlHelper>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			name,
			config,
			url_helper,
			http_client: http_client.into(),
			state: RwLock::new(ProviderState::Uninitialized),
			init_guard: AsyncMutex::new(()),
		}
	}

	/// Name tag the adapter registers under.
	pub fn name(&self) -> &ProviderId {
		&self.name
	}

	/// Current state label.
	pub fn status(&self) -> ProviderStatus {
		self.state.read().status()
	}

	/// Returns `true` once discovery has succeeded.
	pub fn is_ready(&self) -> bool {
		self.status() == ProviderStatus::Ready
	}

	/// Runs discovery and moves the adapter to [`ProviderState::Ready`].
	///
	/// A provider missing its issuer, client identifier, or client secret is simply not
	/// configured: it stays uninitialized, never signals readiness, and this returns
	/// `Ok(ProviderStatus::Uninitialized)`. Discovery failures propagate and leave the adapter
	/// uninitialized. Concurrent calls are serialized, and calling again after success is a
	/// no-op.
	pub async fn init(&self, registration: &dyn ProviderRegistration) -> Result<ProviderStatus> {
		if !self.config.is_configured() {
			return Ok(ProviderStatus::Uninitialized);
		}

		let _init = self.init_guard.lock().await;

		if self.is_ready() {
			return Ok(ProviderStatus::Ready);
		}

		let client = OidcClient::discover(
			&self.config,
			self.url_helper.clone(),
			self.http_client.clone(),
		)
		.await?;

		*self.state.write() = ProviderState::Ready(Arc::new(client));

		registration.mark_ready(&self.name);

		Ok(ProviderStatus::Ready)
	}

	/// Ready client, or [`Error::NotReady`] while uninitialized.
	pub fn client(&self) -> Result<Arc<OidcClient<C>>> {
		match &*self.state.read() {
			ProviderState::Ready(client) => Ok(client.clone()),
			ProviderState::Uninitialized => Err(Error::NotReady { provider: self.name.clone() }),
		}
	}

	/// Builds the authorization URL for `state`.
	pub fn auth_url(&self, state: &str) -> Result<Url> {
		self.client()?.authorize(state)
	}

	/// Exchanges the authorization `code`.
	pub async fn token(&self, code: &str) -> Result<TokenResult> {
		let client = self.client()?;

		client.exchange_token(code).await
	}

	/// Fetches the user behind `access_token`.
	pub async fn user(&self, access_token: &str) -> Result<UserIdentity> {
		let client = self.client()?;

		client.fetch_user(access_token).await
	}

	/// Builds the RP-initiated logout URL.
	pub fn logout_url(&self, post_logout_redirect: Option<&Url>) -> Result<Url> {
		Ok(self.client()?.end_session_url(post_logout_redirect))
	}
}
#[cfg(feature = "reqwest")]
impl OidcProvider<ReqwestHttpClient> {
	/// Creates an uninitialized adapter backed by its own reqwest transport.
	pub fn new(name: ProviderId, config: ProviderConfig, url_helper: Arc<dyn UrlHelper>) -> Self {
		Self::with_http_client(name, config, url_helper, ReqwestHttpClient::default())
	}
}
impl<C> OAuthProvider for OidcProvider<C>
where
	C: OidcHttpClient,
{
	fn provider_name(&self) -> &ProviderId {
		&self.name
	}

	fn auth_url(&self, state: &str) -> Result<Url> {
		OidcProvider::auth_url(self, state)
	}

	fn token<'a>(&'a self, code: &'a str) -> ProviderFuture<'a, TokenResult> {
		Box::pin(OidcProvider::token(self, code))
	}

	fn user<'a>(&'a self, access_token: &'a str) -> ProviderFuture<'a, UserIdentity> {
		Box::pin(OidcProvider::user(self, access_token))
	}
}
impl<C> Debug for OidcProvider<C>
where
	C: OidcHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OidcProvider")
			.field("name", &self.name)
			.field("config", &self.config)
			.field("status", &self.status())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{error::ConfigError, provider::ProviderRegistry, url_helper::BaseUrlHelper};

	fn helper() -> Arc<dyn UrlHelper> {
		Arc::new(BaseUrlHelper::new(
			Url::parse("https://app.example.com").expect("Base URL fixture should parse."),
		))
	}

	fn name() -> ProviderId {
		ProviderId::new("oidc").expect("Provider fixture should be valid.")
	}

	#[cfg(feature = "reqwest")]
	#[tokio::test]
	async fn unconfigured_provider_stays_uninitialized() {
		let registry = ProviderRegistry::default();
		let provider = OidcProvider::new(name(), ProviderConfig::default(), helper());
		let status = provider.init(&registry).await.expect("Unconfigured init is not an error.");

		assert_eq!(status, ProviderStatus::Uninitialized);
		assert!(!registry.is_ready("oidc"));
		assert!(matches!(provider.auth_url("s1"), Err(Error::NotReady { .. })));
		assert!(matches!(provider.token("code").await, Err(Error::NotReady { .. })));
		assert!(matches!(provider.user("token").await, Err(Error::NotReady { .. })));
		assert!(matches!(provider.logout_url(None), Err(Error::NotReady { .. })));
	}

	#[cfg(feature = "reqwest")]
	#[tokio::test]
	async fn invalid_issuer_fails_startup() {
		let registry = ProviderRegistry::default();
		let config = ProviderConfig::new("not a url", "app", "secret");
		let provider = OidcProvider::new(name(), config, helper());
		let err = provider.init(&registry).await.expect_err("Invalid issuer must fail startup.");

		assert!(matches!(err, Error::Config(ConfigError::InvalidIssuer { .. })));
		assert_eq!(provider.status(), ProviderStatus::Uninitialized);
		assert!(registry.ready_providers().is_empty());
	}
}
