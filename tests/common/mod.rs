#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use oidc_relying_party::{
	config::ProviderConfig,
	http::ReqwestHttpClient,
	oidc::{DISCOVERY_PATH, ReqwestOidcClient},
	reqwest::Client,
	url::Url,
	url_helper::{BaseUrlHelper, UrlHelper},
};

pub const CLIENT_ID: &str = "client-it";
pub const CLIENT_SECRET: &str = "secret-it";
pub const APP_BASE: &str = "https://app.example.com";
pub const CALLBACK: &str = "https://app.example.com/oauth/callback";

/// Reqwest transport that accepts the self-signed certificates served by `httpmock`.
pub fn test_http_client() -> ReqwestHttpClient {
	let client = Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Failed to build insecure reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

pub fn url_helper() -> Arc<dyn UrlHelper> {
	Arc::new(BaseUrlHelper::new(Url::parse(APP_BASE).expect("App base URL should parse.")))
}

pub fn provider_config(server: &MockServer) -> ProviderConfig {
	ProviderConfig::new(server.base_url(), CLIENT_ID, CLIENT_SECRET)
}

pub fn discovery_document(server: &MockServer) -> serde_json::Value {
	json!({
		"issuer": server.base_url(),
		"authorization_endpoint": server.url("/authorize"),
		"token_endpoint": server.url("/token"),
		"userinfo_endpoint": server.url("/userinfo"),
		"end_session_endpoint": server.url("/logout"),
		"jwks_uri": server.url("/jwks"),
	})
}

pub async fn mock_discovery(server: &MockServer) -> httpmock::Mock<'_> {
	let document = discovery_document(server);

	server
		.mock_async(|when, then| {
			when.method(GET).path(DISCOVERY_PATH).header("accept", "application/json");
			then.status(200).header("content-type", "application/json").json_body(document);
		})
		.await
}

pub async fn discover(config: &ProviderConfig) -> ReqwestOidcClient {
	ReqwestOidcClient::discover(config, url_helper(), test_http_client())
		.await
		.expect("Discovery against the mock provider should succeed.")
}
