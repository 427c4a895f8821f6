//! GitHub App provider: signs an App JWT and trades it for an installation access token.

// std
use std::io::Write;
// crates.io
use reqwest::{
	StatusCode,
	header::{ACCEPT, CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	config::{self, API_URL_ENV, API_URL_INPUT},
	error::{ConfigError, TransportError},
	host::{ActionsHost, Host, InputOptions},
	http::ReqwestHttpClient,
	identity::{AppIdentity, InstallationId},
	provider::{AuthProvider, InstallationTokenRequest, ProviderFuture, jwt::AppJwt},
	token::InstallationToken,
};

/// Public GitHub REST API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";
const MEDIA_TYPE: &str = "application/vnd.github+json";

#[derive(Serialize)]
struct AccessTokenBody<'a> {
	#[serde(skip_serializing_if = "Option::is_none")]
	repositories: Option<&'a [String]>,
}

#[derive(Deserialize)]
struct ErrorBody {
	message: Option<String>,
	documentation_url: Option<String>,
}

/// Reqwest-backed [`AuthProvider`] talking to github.com or a GitHub Enterprise Server.
#[derive(Clone, Debug)]
pub struct GitHubAppProvider {
	http_client: ReqwestHttpClient,
	api_url: Url,
}
impl GitHubAppProvider {
	/// Creates a provider for `api_url` with the default HTTP client.
	pub fn new(api_url: Url) -> Result<Self> {
		let http_client = ReqwestHttpClient::new()?;

		Self::with_http_client(api_url, http_client)
	}

	/// Creates a provider for the API root configured on the runner.
	///
	/// The `github-api-url` input wins over the runner's `GITHUB_API_URL`, which wins over
	/// [`DEFAULT_API_URL`].
	pub fn from_actions_host<W>(host: &ActionsHost<W>) -> Result<Self>
	where
		W: Write + Send,
	{
		let input = host.input(API_URL_INPUT, InputOptions::default())?;
		let api_url = config::resolve_api_url(&input, host.env(API_URL_ENV), DEFAULT_API_URL)?;

		Self::new(api_url)
	}

	/// Creates a provider that reuses the caller-provided HTTP client.
	pub fn with_http_client(api_url: Url, http_client: ReqwestHttpClient) -> Result<Self> {
		match api_url.scheme() {
			"http" | "https" => Ok(Self { http_client, api_url }),
			scheme => Err(ConfigError::UnsupportedScheme { scheme: scheme.to_owned() }.into()),
		}
	}

	/// API root this provider talks to.
	pub fn api_url(&self) -> &Url {
		&self.api_url
	}

	/// `POST` target for minting a token for `installation_id`.
	pub fn access_tokens_url(&self, installation_id: InstallationId) -> Result<Url> {
		let raw = format!(
			"{}/app/installations/{installation_id}/access_tokens",
			self.api_url.as_str().trim_end_matches('/'),
		);

		Url::parse(&raw)
			.map_err(|source| ConfigError::InvalidApiUrl { value: raw, source }.into())
	}

	async fn request_token(
		&self,
		identity: &AppIdentity,
		request: &InstallationTokenRequest,
	) -> Result<InstallationToken> {
		let url = self.access_tokens_url(identity.installation_id)?;
		let jwt = AppJwt::sign(&identity.app_id, &identity.private_key, OffsetDateTime::now_utc())?;
		let repositories =
			(!request.repositories.is_empty()).then_some(request.repositories.as_slice());
		let body =
			serde_json::to_vec(&AccessTokenBody { repositories }).map_err(ConfigError::from)?;

		tracing::debug!(
			installation_id = %identity.installation_id,
			repositories = request.repositories.len(),
			"requesting installation access token"
		);

		let response = self
			.http_client
			.post(url)
			.bearer_auth(jwt.token.expose())
			.header(ACCEPT, MEDIA_TYPE)
			.header(API_VERSION_HEADER, API_VERSION)
			.header(CONTENT_TYPE, "application/json")
			.body(body)
			.send()
			.await
			.map_err(TransportError::from)?;
		let status = response.status();
		let bytes = response.bytes().await.map_err(TransportError::from)?;

		if status.is_success() {
			InstallationToken::from_json(&bytes, Some(status.as_u16()))
		} else {
			Err(rejection(status, &bytes))
		}
	}
}
impl AuthProvider for GitHubAppProvider {
	fn installation_token<'a>(
		&'a self,
		identity: &'a AppIdentity,
		request: &'a InstallationTokenRequest,
	) -> ProviderFuture<'a, InstallationToken> {
		Box::pin(self.request_token(identity, request))
	}
}

/// Maps an error response to the message GitHub reported, e.g.
/// `Bad credentials - https://docs.github.com/rest`.
fn rejection(status: StatusCode, body: &[u8]) -> Error {
	let parsed = serde_json::from_slice::<ErrorBody>(body).ok();
	let message = match parsed {
		Some(ErrorBody { message: Some(message), documentation_url: Some(url) }) =>
			format!("{message} - {url}"),
		Some(ErrorBody { message: Some(message), documentation_url: None }) => message,
		_ => format!("GitHub API responded with status {}.", status.as_u16()),
	};

	Error::Rejected { status: Some(status.as_u16()), message }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn provider(api_url: &str) -> GitHubAppProvider {
		GitHubAppProvider::new(Url::parse(api_url).expect("API URL fixture should parse."))
			.expect("Provider should build for http(s) URLs.")
	}

	#[test]
	fn access_tokens_url_respects_enterprise_prefix() {
		let id = InstallationId::new(42);

		assert_eq!(
			provider(DEFAULT_API_URL).access_tokens_url(id).expect("URL should build.").as_str(),
			"https://api.github.com/app/installations/42/access_tokens"
		);
		assert_eq!(
			provider("https://ghe.example.com/api/v3/")
				.access_tokens_url(id)
				.expect("URL should build.")
				.as_str(),
			"https://ghe.example.com/api/v3/app/installations/42/access_tokens"
		);
	}

	#[test]
	fn runner_configuration_selects_api_root() {
		let api_url = |env: &[(&str, &str)]| {
			let host = ActionsHost::new(
				env.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())),
				Vec::<u8>::new(),
			);

			GitHubAppProvider::from_actions_host(&host)
				.expect("Provider should build from runner configuration.")
				.api_url()
				.to_string()
		};

		assert_eq!(api_url(&[]), "https://api.github.com/");
		assert_eq!(
			api_url(&[(API_URL_ENV, "https://ghe.example.com/api/v3")]),
			"https://ghe.example.com/api/v3"
		);
		assert_eq!(
			api_url(&[
				("INPUT_GITHUB-API-URL", "http://127.0.0.1:8080"),
				(API_URL_ENV, "https://ghe.example.com/api/v3"),
			]),
			"http://127.0.0.1:8080/"
		);
	}

	#[test]
	fn runner_configuration_rejects_unusable_api_root() {
		let host = ActionsHost::new(
			[("INPUT_GITHUB-API-URL".to_owned(), "ftp://example.com".to_owned())],
			Vec::<u8>::new(),
		);
		let err = GitHubAppProvider::from_actions_host(&host)
			.expect_err("FTP endpoints should be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::UnsupportedScheme { .. })));
	}

	#[test]
	fn non_http_schemes_are_rejected() {
		let url = Url::parse("ftp://example.com").expect("URL fixture should parse.");
		let err = GitHubAppProvider::new(url).expect_err("FTP endpoints should be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::UnsupportedScheme { .. })));
	}

	#[test]
	fn request_body_omits_missing_repository_list() {
		let repositories = vec!["octo-repo".to_owned()];
		let empty = serde_json::to_string(&AccessTokenBody { repositories: None })
			.expect("Body should serialize.");
		let scoped =
			serde_json::to_string(&AccessTokenBody { repositories: Some(repositories.as_slice()) })
				.expect("Body should serialize.");

		assert_eq!(empty, "{}");
		assert_eq!(scoped, r#"{"repositories":["octo-repo"]}"#);
	}

	#[test]
	fn rejection_prefers_github_message() {
		let err = rejection(
			StatusCode::UNAUTHORIZED,
			br#"{"message":"Bad credentials","documentation_url":"https://docs.github.com/rest"}"#,
		);

		assert_eq!(err.to_string(), "Bad credentials - https://docs.github.com/rest");
		assert!(matches!(err, Error::Rejected { status: Some(401), .. }));

		let err = rejection(StatusCode::NOT_FOUND, br#"{"message":"Not Found"}"#);

		assert_eq!(err.to_string(), "Not Found");

		let err = rejection(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>");

		assert_eq!(err.to_string(), "GitHub API responded with status 502.");
	}
}
