//! OpenID Connect protocol client.
//!
//! [`OidcClient`] is built once from a successful discovery fetch and is immutable afterwards.
//! It owns the discovered endpoints plus the client credentials and performs the three
//! relying-party operations: building the authorization URL, exchanging an authorization
//! code, and fetching userinfo claims. Every network response goes through the same
//! classification: 4xx is [`Error::ClientRequest`], any other non-2xx is
//! [`Error::ProviderIntegration`], and a 2xx body that fails its schema is
//! [`Error::ContractViolation`].

// crates.io
use oauth2::{
	HttpRequest, HttpResponse,
	http::{
		Method, Request,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
	},
};
// self
use crate::{
	_prelude::*,
	auth::{ClaimKey, ClaimsMap, Secret, TokenResult, UserIdentity},
	config::{Credentials, ProviderConfig},
	error::ConfigError,
	http::{self, OidcHttpClient},
	obs::{self, OperationKind},
	schema::{self, DiscoveryDocument, Schema, TokenResponse, UserInfoClaims},
	url_helper::UrlHelper,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// Application path the provider redirects back to.
pub const CALLBACK_PATH: &str = "/oauth/callback";
/// Scope requested when the provider arguments do not override it.
pub const DEFAULT_SCOPE: &str = "openid profile email";
/// Discovery document path relative to the issuer.
pub const DISCOVERY_PATH: &str = "/.well-known/openid-configuration";

const MIME_JSON: &str = "application/json";
const MIME_FORM: &str = "application/x-www-form-urlencoded";
const BODY_PREVIEW_LIMIT: usize = 512;

#[cfg(feature = "reqwest")]
/// Protocol client specialized for the crate's default reqwest transport.
pub type ReqwestOidcClient = OidcClient<ReqwestHttpClient>;

/// Provider endpoints contacted over the network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
	/// `/.well-known/openid-configuration`.
	Discovery,
	/// Token endpoint.
	Token,
	/// Userinfo endpoint.
	UserInfo,
}
impl Endpoint {
	/// Returns a stable label for messages and logs.
	pub const fn as_str(self) -> &'static str {
		match self {
			Endpoint::Discovery => "discovery",
			Endpoint::Token => "token",
			Endpoint::UserInfo => "userinfo",
		}
	}
}
impl Display for Endpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Discovered provider bound to one set of client credentials.
pub struct OidcClient<C>
where
	C: OidcHttpClient,
{
	client_id: String,
	client_secret: Secret,
	args: BTreeMap<String, String>,
	claims: ClaimsMap,
	discovery: DiscoveryDocument,
	url_helper: Arc<dyn UrlHelper>,
	http_client: Arc<C>,
}
impl<C> OidcClient<C>
where
	C: OidcHttpClient,
{
	/// Fetches the issuer's discovery document and binds it to the configured credentials.
	///
	/// Fails with [`ConfigError::MissingCredentials`] or [`ConfigError::InvalidIssuer`]
	/// before any request is issued when the configuration is unusable.
	pub async fn discover(
		config: &ProviderConfig,
		url_helper: Arc<dyn UrlHelper>,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self> {
		let http_client = http_client.into();

		obs::observe(OperationKind::Discovery, "discover", async {
			let credentials = config.credentials()?;

			if !url_helper.is_valid_url(&credentials.issuer) {
				return Err(ConfigError::InvalidIssuer { issuer: credentials.issuer }.into());
			}

			let request = Request::builder()
				.method(Method::GET)
				.uri(discovery_url(&credentials.issuer))
				.header(ACCEPT, MIME_JSON)
				.body(Vec::new())
				.map_err(ConfigError::from)?;
			let discovery: DiscoveryDocument =
				send(http_client.as_ref(), Endpoint::Discovery, request).await?;

			Ok(Self::from_discovery(
				credentials,
				config.args.clone(),
				discovery,
				url_helper.clone(),
				http_client.clone(),
			))
		})
		.await
	}

	/// Builds a client from an already validated discovery document.
	pub fn from_discovery(
		credentials: Credentials,
		args: BTreeMap<String, String>,
		discovery: DiscoveryDocument,
		url_helper: Arc<dyn UrlHelper>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		let claims = ClaimsMap::from_args(&args);

		Self {
			client_id: credentials.client_id,
			client_secret: credentials.client_secret,
			args,
			claims,
			discovery,
			url_helper,
			http_client: http_client.into(),
		}
	}

	/// Discovered endpoints.
	pub fn discovery(&self) -> &DiscoveryDocument {
		&self.discovery
	}

	/// OAuth client identifier.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// Active claim-name mapping.
	pub fn claims(&self) -> &ClaimsMap {
		&self.claims
	}

	/// Scope sent with authorization requests.
	pub fn scope(&self) -> &str {
		self.args
			.get("scope")
			.map(String::as_str)
			.filter(|scope| !scope.is_empty())
			.unwrap_or(DEFAULT_SCOPE)
	}

	/// Builds the authorization-request URL carrying `state` unchanged.
	///
	/// Parameters are applied as `client_id`, `redirect_uri`, `response_type`, the provider
	/// arguments without the claim overrides, `scope`, then `state`; a later write to an
	/// existing key replaces it in place. No I/O is performed.
	pub fn authorize(&self, state: &str) -> Result<Url> {
		obs::observe_sync(OperationKind::Authorize, "authorize", || {
			let redirect_uri = self.redirect_uri()?;
			let mut params = self.existing_query(&self.discovery.authorization_endpoint);

			params.set("client_id", &self.client_id);
			params.set("redirect_uri", redirect_uri.as_str());
			params.set("response_type", "code");

			for (key, value) in &self.args {
				if !ClaimKey::is_override_arg(key) {
					params.set(key, value);
				}
			}

			params.set("scope", self.scope());
			params.set("state", state);

			Ok(self.with_query(&self.discovery.authorization_endpoint, &params))
		})
	}

	/// Exchanges an authorization code at the token endpoint.
	pub async fn exchange_token(&self, code: &str) -> Result<TokenResult> {
		obs::observe(OperationKind::TokenExchange, "exchange_token", async {
			let redirect_uri = self.redirect_uri()?;
			let body = self.url_helper.encode_query(&[
				("code", code),
				("client_id", self.client_id.as_str()),
				("client_secret", self.client_secret.expose()),
				("redirect_uri", redirect_uri.as_str()),
				("grant_type", "authorization_code"),
			]);
			let request = Request::builder()
				.method(Method::POST)
				.uri(self.discovery.token_endpoint.as_str())
				.header(CONTENT_TYPE, MIME_FORM)
				.header(ACCEPT, MIME_JSON)
				.body(body.into_bytes())
				.map_err(ConfigError::from)?;
			let response: TokenResponse =
				send(self.http_client.as_ref(), Endpoint::Token, request).await?;

			TokenResult::from_response(response, OffsetDateTime::now_utc())
				.map_err(|source| Error::ContractViolation { endpoint: Endpoint::Token, source })
		})
		.await
	}

	/// Fetches userinfo claims with `access_token` and maps them onto `{id, email}`.
	pub async fn fetch_user(&self, access_token: &str) -> Result<UserIdentity> {
		obs::observe(OperationKind::UserInfo, "fetch_user", async {
			let request = Request::builder()
				.method(Method::GET)
				.uri(self.discovery.userinfo_endpoint.as_str())
				.header(AUTHORIZATION, format!("Bearer {access_token}"))
				.header(ACCEPT, MIME_JSON)
				.body(Vec::new())
				.map_err(ConfigError::from)?;
			let claims: UserInfoClaims =
				send(self.http_client.as_ref(), Endpoint::UserInfo, request).await?;
			let mapped = claims.map(&self.claims).map_err(|source| Error::ContractViolation {
				endpoint: Endpoint::UserInfo,
				source,
			})?;

			Ok(UserIdentity::from(mapped))
		})
		.await
	}

	/// Builds an RP-initiated logout URL against the discovered end-session endpoint.
	pub fn end_session_url(&self, post_logout_redirect: Option<&Url>) -> Url {
		let mut params = self.existing_query(&self.discovery.end_session_endpoint);

		params.set("client_id", &self.client_id);

		if let Some(redirect) = post_logout_redirect {
			params.set("post_logout_redirect_uri", redirect.as_str());
		}

		self.with_query(&self.discovery.end_session_endpoint, &params)
	}

	fn redirect_uri(&self) -> Result<Url> {
		self.url_helper.link(CALLBACK_PATH)
	}

	fn existing_query(&self, endpoint: &Url) -> QueryParams {
		let pairs = endpoint.query().map(|query| self.url_helper.decode_query(query));

		QueryParams(pairs.unwrap_or_default())
	}

	fn with_query(&self, endpoint: &Url, params: &QueryParams) -> Url {
		let mut url = endpoint.clone();
		let pairs = params.as_pairs();

		url.set_query(Some(&self.url_helper.encode_query(&pairs)));

		url
	}
}
impl<C> Debug for OidcClient<C>
where
	C: OidcHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OidcClient")
			.field("client_id", &self.client_id)
			.field("client_secret", &self.client_secret)
			.field("args", &self.args)
			.field("discovery", &self.discovery)
			.finish()
	}
}

/// Ordered query parameters where writing an existing key replaces its value in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct QueryParams(Vec<(String, String)>);
impl QueryParams {
	fn set(&mut self, key: &str, value: &str) {
		match self.0.iter_mut().find(|(existing, _)| existing == key) {
			Some((_, slot)) => *slot = value.to_owned(),
			None => self.0.push((key.to_owned(), value.to_owned())),
		}
	}

	fn as_pairs(&self) -> Vec<(&str, &str)> {
		self.0.iter().map(|(key, value)| (key.as_str(), value.as_str())).collect()
	}
}

/// Classifies a provider response, returning the body of a 2xx answer.
pub fn classify_response(endpoint: Endpoint, response: HttpResponse) -> Result<Vec<u8>> {
	let status = response.status();
	let body = response.into_body();

	if status.is_success() {
		return Ok(body);
	}

	let detail = body_preview(&body);
	let status = status.as_u16();

	if (400..500).contains(&status) {
		Err(Error::ClientRequest { endpoint, status, detail })
	} else {
		Err(Error::ProviderIntegration { endpoint, status, detail })
	}
}

async fn send<C, T>(http_client: &C, endpoint: Endpoint, request: HttpRequest) -> Result<T>
where
	C: OidcHttpClient,
	T: Schema,
{
	let response = http::execute(http_client, request).await?;
	let body = classify_response(endpoint, response)?;

	schema::validate(&body).map_err(|source| Error::ContractViolation { endpoint, source })
}

fn discovery_url(issuer: &str) -> String {
	format!("{}{DISCOVERY_PATH}", issuer.trim_end_matches('/'))
}

fn body_preview(body: &[u8]) -> String {
	let text = String::from_utf8_lossy(body);

	if text.chars().count() <= BODY_PREVIEW_LIMIT {
		return text.into_owned();
	}

	let mut buf = text.chars().take(BODY_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	buf
}
