//! Action input names and the values derived from them.

// self
use crate::{_prelude::*, error::ConfigError};

/// GitHub App identifier input.
pub const APP_ID_INPUT: &str = "app-id";
/// PEM private key input.
pub const PRIVATE_KEY_INPUT: &str = "private-key";
/// Installation identifier input.
pub const INSTALLATION_ID_INPUT: &str = "installation-id";
/// Optional API root input for GitHub Enterprise Server.
pub const API_URL_INPUT: &str = "github-api-url";
/// Optional repository list input.
pub const REPOSITORIES_INPUT: &str = "repositories";
/// Output carrying the installation access token.
pub const TOKEN_OUTPUT: &str = "token";
/// Runner-provided API root, used when [`API_URL_INPUT`] is empty.
pub const API_URL_ENV: &str = "GITHUB_API_URL";
/// Log filter variable read by the binary.
pub const LOG_FILTER_ENV: &str = "GITHUB_APP_TOKEN_LOG";

/// Picks the API root: explicit input, then the runner's `GITHUB_API_URL`, then github.com.
pub fn resolve_api_url(input: &str, env: Option<&str>, default: &str) -> Result<Url> {
	let raw = [Some(input), env]
		.into_iter()
		.flatten()
		.map(str::trim)
		.find(|value| !value.is_empty())
		.unwrap_or(default);

	Url::parse(raw)
		.map_err(|source| ConfigError::InvalidApiUrl { value: raw.to_owned(), source }.into())
}

/// Splits a comma or newline separated repository list, dropping blanks.
pub fn parse_repositories(raw: &str) -> Vec<String> {
	raw.split([',', '\n'])
		.map(str::trim)
		.filter(|name| !name.is_empty())
		.map(ToOwned::to_owned)
		.collect()
}
