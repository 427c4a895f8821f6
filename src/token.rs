//! Installation access token model and its redacting secret wrapper.

// self
use crate::_prelude::*;

/// Redacted token secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Short-lived credential scoped to one App installation.
///
/// Only [`token`](Self::token) is required; GitHub also reports the expiry, the granted
/// permissions, and whether the token covers all or selected repositories.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct InstallationToken {
	/// Access token secret.
	pub token: TokenSecret,
	/// Expiry instant reported by GitHub.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub expires_at: Option<OffsetDateTime>,
	/// Permission name to access level (`read`, `write`, `admin`).
	#[serde(default)]
	pub permissions: BTreeMap<String, String>,
	/// `all` or `selected`.
	#[serde(default)]
	pub repository_selection: Option<String>,
}
impl InstallationToken {
	/// Creates a token carrying only the secret.
	pub fn new(token: impl Into<String>) -> Self {
		Self {
			token: TokenSecret::new(token),
			expires_at: None,
			permissions: BTreeMap::new(),
			repository_selection: None,
		}
	}

	/// Parses an access-token endpoint body, reporting the JSON path of any mismatch.
	pub fn from_json(body: &[u8], status: Option<u16>) -> Result<Self> {
		let mut de = serde_json::Deserializer::from_slice(body);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| Error::ResponseParse { source, status })
	}
}
