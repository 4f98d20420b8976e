//! Capability interface implemented by registered OAuth providers.

// self
use crate::{
	_prelude::*,
	auth::{ProviderId, TokenResult, UserIdentity},
};

/// Boxed future returned by [`OAuthProvider`] network operations.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Operations the hosting application's login routes call on a provider.
///
/// State generation and callback routing stay with the caller; implementors only build the
/// redirect, exchange the returned code, and resolve the user.
pub trait OAuthProvider
where
	Self: Send + Sync,
{
	/// Name tag the provider is registered under.
	fn provider_name(&self) -> &ProviderId;

	/// Builds the authorization URL for the caller-generated `state`.
	fn auth_url(&self, state: &str) -> Result<Url>;

	/// Exchanges the authorization `code` returned on the callback.
	fn token<'a>(&'a self, code: &'a str) -> ProviderFuture<'a, TokenResult>;

	/// Resolves the user behind `access_token`.
	fn user<'a>(&'a self, access_token: &'a str) -> ProviderFuture<'a, UserIdentity>;
}

/// Readiness hook a provider calls once it can serve requests (e.g. to enable its callback
/// route).
pub trait ProviderRegistration
where
	Self: Send + Sync,
{
	/// Marks `provider` as ready.
	fn mark_ready(&self, provider: &ProviderId);
}
