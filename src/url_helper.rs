//! Application URL helper used to validate issuers, build callback links, and encode queries.

// crates.io
use url::form_urlencoded;
// self
use crate::{_prelude::*, error::ConfigError};

/// Link, validation, and query-string helpers supplied by the hosting application.
pub trait UrlHelper
where
	Self: Send + Sync,
{
	/// Returns `true` when `candidate` is an acceptable absolute URL.
	fn is_valid_url(&self, candidate: &str) -> bool;

	/// Builds an absolute application link for `path`.
	fn link(&self, path: &str) -> Result<Url>;

	/// Encodes `pairs` as an `application/x-www-form-urlencoded` string, preserving order.
	fn encode_query(&self, pairs: &[(&str, &str)]) -> String {
		form_urlencoded::Serializer::new(String::new()).extend_pairs(pairs).finish()
	}

	/// Decodes a form-urlencoded query string into ordered pairs.
	fn decode_query(&self, query: &str) -> Vec<(String, String)> {
		form_urlencoded::parse(query.as_bytes()).into_owned().collect()
	}
}

/// [`UrlHelper`] that resolves links against the application's public base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrlHelper {
	base: Url,
}
impl BaseUrlHelper {
	/// Creates a helper rooted at `base`; its path becomes the prefix of every link.
	pub fn new(base: Url) -> Self {
		let mut base = base;

		if !base.path().ends_with('/') {
			let path = format!("{}/", base.path());

			base.set_path(&path);
		}

		base.set_query(None);
		base.set_fragment(None);

		Self { base }
	}

	/// Base URL links are resolved against.
	pub fn base(&self) -> &Url {
		&self.base
	}
}
impl UrlHelper for BaseUrlHelper {
	fn is_valid_url(&self, candidate: &str) -> bool {
		is_http_url(candidate)
	}

	fn link(&self, path: &str) -> Result<Url> {
		self.base.join(path.trim_start_matches('/')).map_err(|source| {
			ConfigError::InvalidLink { path: path.to_owned(), source }.into()
		})
	}
}

/// Returns `true` for absolute `http`/`https` URLs with a host.
pub fn is_http_url(candidate: &str) -> bool {
	match Url::parse(candidate) {
		Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
		Err(_) => false,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn helper(base: &str) -> BaseUrlHelper {
		BaseUrlHelper::new(Url::parse(base).expect("Base URL fixture should parse."))
	}

	#[test]
	fn links_keep_the_base_path_prefix() {
		let root = helper("https://app.example.com");
		let nested = helper("https://app.example.com/portal?x=1");

		assert_eq!(
			root.link("/oauth/callback").expect("Root link should resolve.").as_str(),
			"https://app.example.com/oauth/callback"
		);
		assert_eq!(
			nested.link("/oauth/callback").expect("Nested link should resolve.").as_str(),
			"https://app.example.com/portal/oauth/callback"
		);
	}

	#[test]
	fn validity_requires_http_and_host() {
		let helper = helper("https://app.example.com");

		assert!(helper.is_valid_url("https://id.example.com/realms/main"));
		assert!(helper.is_valid_url("http://localhost:8080"));
		assert!(!helper.is_valid_url("id.example.com"));
		assert!(!helper.is_valid_url("ftp://id.example.com"));
		assert!(!helper.is_valid_url("not a url"));
	}

	#[test]
	fn query_encoding_is_form_urlencoded() {
		let helper = helper("https://app.example.com");
		let encoded = helper.encode_query(&[("scope", "openid profile"), ("next", "/a&b")]);

		assert_eq!(encoded, "scope=openid+profile&next=%2Fa%26b");
		assert_eq!(
			helper.decode_query(&encoded),
			vec![
				("scope".to_owned(), "openid profile".to_owned()),
				("next".to_owned(), "/a&b".to_owned()),
			]
		);
	}
}
